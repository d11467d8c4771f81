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

//! # cachesketch
//!
//! A fixed-capacity Count-Min frequency table for cache admission and
//! eviction policies.
//!
//! The table approximates how many times a 64-bit key has been observed
//! without storing the keys. Estimates never undercount (until a counter
//! saturates) and overcount only with a probability bounded by the table's
//! width and depth.
//!
//! ```rust
//! use cachesketch::countmin::CountMinSketch8;
//!
//! let mut sketch = CountMinSketch8::with_error_bounds(0.01, 0.99, 0, 0).unwrap();
//! assert_eq!(sketch.width(), 200);
//! assert_eq!(sketch.depth(), 7);
//!
//! sketch.increment(42);
//! sketch.increment(42);
//! assert!(sketch.count(42) >= 2);
//! ```
//!
//! The table performs no synchronization of its own. Every mutating method
//! takes `&mut self`, so sharing a table between threads requires an
//! external lock, typically the one already guarding the owning cache
//! shard.

mod codec;

pub mod countmin;
pub mod error;
pub mod hash;
