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

use crate::countmin::counter::Counter;
use crate::countmin::sketch::CountMinSketchBase;
use crate::error::Error;

const DEFAULT_ERROR: f64 = 0.01;
const DEFAULT_PROBABILITY: f64 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Sizing {
    ErrorBounds { error: f64, probability: f64 },
    Explicit { width: u32, depth: u32 },
}

/// Builder for Count-Min tables.
///
/// A table is sized either from error bounds, optionally capped, or from an
/// explicit width and depth. Validation happens in [`build`](Self::build).
///
/// # Examples
///
/// ```
/// use cachesketch::countmin::CountMinSketchBuilder;
///
/// // By accuracy, capped to keep the table small
/// let sketch = CountMinSketchBuilder::with_error_bounds(0.001, 0.99)
///     .max_width(1024)
///     .build::<u16>()
///     .unwrap();
/// assert_eq!(sketch.width(), 1024);
/// assert_eq!(sketch.depth(), 7);
///
/// // By size
/// let sketch = CountMinSketchBuilder::with_size(4, 2).build::<u8>().unwrap();
/// assert_eq!(sketch.byte_size(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct CountMinSketchBuilder {
    sizing: Sizing,
    max_width: u32,
    max_depth: u32,
}

impl Default for CountMinSketchBuilder {
    fn default() -> Self {
        Self::with_error_bounds(DEFAULT_ERROR, DEFAULT_PROBABILITY)
    }
}

impl CountMinSketchBuilder {
    /// Sizes the table for a relative `error` and a confidence `probability`.
    pub fn with_error_bounds(error: f64, probability: f64) -> Self {
        Self {
            sizing: Sizing::ErrorBounds { error, probability },
            max_width: 0,
            max_depth: 0,
        }
    }

    /// Sizes the table explicitly.
    pub fn with_size(width: u32, depth: u32) -> Self {
        Self {
            sizing: Sizing::Explicit { width, depth },
            max_width: 0,
            max_depth: 0,
        }
    }

    /// Caps the width derived from error bounds. Zero means no cap.
    ///
    /// Ignored for explicitly sized tables.
    pub fn max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    /// Caps the depth derived from error bounds. Zero means no cap.
    ///
    /// Ignored for explicitly sized tables.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builds a table with counters of type `C`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if the configured parameters are out of range.
    pub fn build<C: Counter>(self) -> Result<CountMinSketchBase<C>, Error> {
        match self.sizing {
            Sizing::ErrorBounds { error, probability } => CountMinSketchBase::with_error_bounds(
                error,
                probability,
                self.max_width,
                self.max_depth,
            ),
            Sizing::Explicit { width, depth } => CountMinSketchBase::new(width, depth),
        }
    }
}
