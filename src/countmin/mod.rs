// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Count-Min frequency table for cache admission and eviction.
//!
//! The table estimates how often a 64-bit key has been seen. Estimates
//! never undercount before a counter saturates, and overcount only with a
//! probability bounded by the table's width and depth.
//!
//! Three counter widths are provided, trading memory for headroom before
//! saturation:
//!
//! - [`CountMinSketch8`]: 8-bit counters
//! - [`CountMinSketch16`]: 16-bit counters
//! - [`CountMinSketch`]: 32-bit counters
//!
//! # Usage
//!
//! ```rust
//! use cachesketch::countmin::CountMinSketch;
//!
//! let mut sketch = CountMinSketch::new(4, 2).unwrap();
//!
//! sketch.increment(0xA);
//! sketch.increment(0xA);
//! assert_eq!(sketch.count(0xA), 2);
//!
//! sketch.reset_count(0xA);
//! assert_eq!(sketch.count(0xA), 0);
//! ```
//!
//! # Aging
//!
//! ```rust
//! use cachesketch::countmin::CountMinSketch8;
//!
//! let mut sketch = CountMinSketch8::with_error_bounds(0.01, 0.9, 0, 0).unwrap();
//! sketch.increment_item("hot");
//! sketch.increment_item("hot");
//!
//! sketch.decay_counts_by(0.5);
//! assert_eq!(sketch.count_item("hot"), 1);
//! ```

mod builder;
mod counter;
mod serialization;
mod sketch;

pub use self::builder::CountMinSketchBuilder;
pub use self::counter::Counter;
pub use self::sketch::CountMinSketchBase;

/// Count-Min table with 32-bit counters.
pub type CountMinSketch = CountMinSketchBase<u32>;

/// Count-Min table with 8-bit counters.
pub type CountMinSketch8 = CountMinSketchBase<u8>;

/// Count-Min table with 16-bit counters.
pub type CountMinSketch16 = CountMinSketchBase<u16>;
