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

use std::fmt;
use std::hash::Hash;

use tracing::debug;
use tracing::trace;

use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::countmin::counter::Counter;
use crate::countmin::serialization::*;
use crate::error::Error;
use crate::hash::combine_hashes;
use crate::hash::hash_int;
use crate::hash::hash_item;

/// A Count-Min frequency table with counters of type `C`.
///
/// The table is `depth` rows of `width` counters. Each key selects one
/// counter per row; [`increment`](Self::increment) bumps all of them and
/// [`count`](Self::count) reports the smallest. Hash collisions only ever add
/// to a counter, so the estimate never undercounts until a counter saturates
/// at [`max_count`](Self::max_count).
///
/// The table does not synchronize access. Callers that share it between
/// threads must hold an exclusive lock around mutating calls, and around
/// reads as well when they need a consistent view.
///
/// Tables are moved, never implicitly copied. [`take`](Self::take) moves the
/// counters out and leaves an empty table behind.
#[derive(PartialEq, Eq)]
pub struct CountMinSketchBase<C: Counter> {
    width: u32,
    depth: u32,
    saturated: u64,
    table: Vec<C>,
}

impl<C: Counter> CountMinSketchBase<C> {
    /// Creates a table sized for a relative error and a confidence level.
    ///
    /// `error` is the tolerated overcount as a fraction of the total number
    /// of increments and `probability` is the certainty that an estimate
    /// stays within it. Both must lie in the open interval (0, 1). Non-zero
    /// `max_width` and `max_depth` cap the derived dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if `error` or `probability` is out of range, or if the derived width
    /// does not fit in a `u32`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachesketch::countmin::CountMinSketch;
    ///
    /// let sketch = CountMinSketch::with_error_bounds(0.01, 0.99, 0, 0).unwrap();
    /// assert_eq!(sketch.width(), 200);
    /// assert_eq!(sketch.depth(), 7);
    ///
    /// let capped = CountMinSketch::with_error_bounds(0.01, 0.99, 64, 4).unwrap();
    /// assert_eq!(capped.width(), 64);
    /// assert_eq!(capped.depth(), 4);
    /// ```
    pub fn with_error_bounds(
        error: f64,
        probability: f64,
        max_width: u32,
        max_depth: u32,
    ) -> Result<Self, Error> {
        let width = Self::suggest_width(error, max_width)?;
        let depth = Self::suggest_depth(probability, max_depth)?;
        Self::new(width, depth)
    }

    /// Creates a table with explicit dimensions and all counters at zero.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if `width` or `depth` is zero, or if the table cannot be addressed or
    /// allocated on this platform.
    pub fn new(width: u32, depth: u32) -> Result<Self, Error> {
        if width == 0 {
            return Err(Error::invalid_argument(format!(
                "width must be greater than 0. width: {width}"
            )));
        }
        if depth == 0 {
            return Err(Error::invalid_argument(format!(
                "depth must be greater than 0. depth: {depth}"
            )));
        }

        let too_large = || {
            Error::invalid_argument("table does not fit in memory")
                .with_context("width", width)
                .with_context("depth", depth)
                .with_context("counter_bytes", C::BYTES)
        };
        let num_cells = (width as usize)
            .checked_mul(depth as usize)
            .ok_or_else(too_large)?;
        let num_bytes = num_cells.checked_mul(C::BYTES).ok_or_else(too_large)?;
        if num_bytes > isize::MAX as usize {
            return Err(too_large());
        }

        let mut table = Vec::new();
        table
            .try_reserve_exact(num_cells)
            .map_err(|err| too_large().set_source(err))?;
        table.resize(num_cells, C::ZERO);

        debug!(width, depth, counter_bytes = C::BYTES, "created count-min table");
        Ok(Self {
            width,
            depth,
            saturated: 0,
            table,
        })
    }

    /// Creates the empty, inert table.
    ///
    /// It has no rows: every count is zero and every update is a no-op.
    pub const fn empty() -> Self {
        Self {
            width: 0,
            depth: 0,
            saturated: 0,
            table: Vec::new(),
        }
    }

    /// Returns the width for a relative error, capped by a non-zero `max_width`.
    ///
    /// The width is `ceil(2 / error)`, following Cormode and Muthukrishnan,
    /// "Approximating Data with the Count-Min Data Structure".
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if `error` is not in (0, 1) or the result does not fit in a `u32`.
    pub fn suggest_width(error: f64, max_width: u32) -> Result<u32, Error> {
        if !(error > 0.0 && error < 1.0) {
            return Err(Error::invalid_argument(format!(
                "error should be greater than 0 and less than 1. error: {error}"
            )));
        }

        let mut width = (2.0 / error).ceil();
        if max_width > 0 {
            width = width.min(max_width as f64);
        }
        if width > u32::MAX as f64 {
            return Err(Error::invalid_argument(format!(
                "error is too small for a u32 width. error: {error}"
            ))
            .with_context("width", width));
        }
        Ok(width as u32)
    }

    /// Returns the depth for a confidence level, capped by a non-zero `max_depth`.
    ///
    /// The depth is `ceil(|ln(1 - probability) / ln(2)|)` and at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if `probability` is not in (0, 1).
    pub fn suggest_depth(probability: f64, max_depth: u32) -> Result<u32, Error> {
        if !(probability > 0.0 && probability < 1.0) {
            return Err(Error::invalid_argument(format!(
                "probability should be greater than 0 and less than 1. probability: {probability}"
            )));
        }

        // at most 54 for any probability below 1.0, so the cast is exact
        let mut depth = ((1.0 - probability).ln() / 2f64.ln()).abs().ceil() as u32;
        depth = depth.max(1);
        if max_depth > 0 {
            depth = depth.min(max_depth);
        }
        Ok(depth)
    }

    // ========================================================================
    // Update Operations
    // ========================================================================

    /// Counts one occurrence of `key`.
    ///
    /// Counters already at [`max_count`](Self::max_count) stay there; each
    /// counter that reaches it adds one to
    /// [`saturated_counts`](Self::saturated_counts).
    ///
    /// # Examples
    ///
    /// ```
    /// use cachesketch::countmin::CountMinSketch8;
    ///
    /// let mut sketch = CountMinSketch8::new(4, 2).unwrap();
    /// for _ in 0..300 {
    ///     sketch.increment(7);
    /// }
    /// assert_eq!(sketch.count(7), 255);
    /// assert_eq!(sketch.saturated_counts(), 2);
    /// ```
    pub fn increment(&mut self, key: u64) {
        for row in 0..self.depth {
            let index = self.index(row, key);
            let cell = &mut self.table[index];
            if *cell < C::MAX {
                *cell = *cell + C::ONE;
                if *cell == C::MAX {
                    self.saturated += 1;
                    trace!(row, index, "count-min cell saturated");
                }
            }
        }
    }

    /// Counts one occurrence of a hashable item.
    ///
    /// The item is reduced to a key with [`hash_item`].
    pub fn increment_item<T: Hash + ?Sized>(&mut self, item: &T) {
        self.increment(hash_item(item));
    }

    /// Drives the estimate for `key` to zero.
    ///
    /// The current estimate is subtracted from each of the key's counters.
    /// Other keys sharing some of those counters lose part of their count.
    pub fn reset_count(&mut self, key: u64) {
        let count = self.count(key);
        if count == C::ZERO {
            return;
        }
        for row in 0..self.depth {
            let index = self.index(row, key);
            // every cell of the key holds at least the minimum
            self.table[index] = self.table[index] - count;
        }
    }

    /// Drives the estimate for a hashable item to zero.
    pub fn reset_count_item<T: Hash + ?Sized>(&mut self, item: &T) {
        self.reset_count(hash_item(item));
    }

    /// Multiplies every counter by `decay`, truncating toward zero.
    ///
    /// Results are clamped to `[0, max_count]`. The saturated tally is left
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachesketch::countmin::CountMinSketch;
    ///
    /// let mut sketch = CountMinSketch::new(64, 3).unwrap();
    /// for _ in 0..10 {
    ///     sketch.increment(1);
    /// }
    /// sketch.decay_counts_by(0.5);
    /// assert_eq!(sketch.count(1), 5);
    /// ```
    pub fn decay_counts_by(&mut self, decay: f64) {
        for cell in &mut self.table {
            *cell = C::narrow_from_f64(cell.to_f64() * decay);
        }
        debug!(decay, width = self.width, depth = self.depth, "decayed count-min table");
    }

    /// Sets every counter to zero.
    ///
    /// The saturated tally is a historical count and is left unchanged.
    pub fn reset(&mut self) {
        self.table.fill(C::ZERO);
        debug!(width = self.width, depth = self.depth, "reset count-min table");
    }

    /// Moves the counters out, leaving the empty table in `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachesketch::countmin::CountMinSketch;
    ///
    /// let mut sketch = CountMinSketch::new(16, 2).unwrap();
    /// sketch.increment(3);
    ///
    /// let moved = sketch.take();
    /// assert_eq!(moved.count(3), 1);
    /// assert!(sketch.is_empty());
    /// assert_eq!(sketch.count(3), 0);
    /// ```
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    /// Returns the estimated number of occurrences of `key`.
    ///
    /// The estimate is never below the true count unless a counter has
    /// saturated. The empty table always reports zero.
    pub fn count(&self, key: u64) -> C {
        if self.depth == 0 {
            return C::ZERO;
        }
        let mut count = C::MAX;
        for row in 0..self.depth {
            count = count.min(self.table[self.index(row, key)]);
        }
        count
    }

    /// Returns the estimated number of occurrences of a hashable item.
    pub fn count_item<T: Hash + ?Sized>(&self, item: &T) -> C {
        self.count(hash_item(item))
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns the number of counters per row.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the number of rows.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns the memory held by the counters, in bytes.
    pub fn byte_size(&self) -> u64 {
        self.width as u64 * self.depth as u64 * C::BYTES as u64
    }

    /// Returns the largest value a counter can hold.
    pub fn max_count(&self) -> C {
        C::MAX
    }

    /// Returns how many counters have reached [`max_count`](Self::max_count).
    ///
    /// Neither [`reset`](Self::reset) nor [`decay_counts_by`](Self::decay_counts_by)
    /// lowers this tally.
    pub fn saturated_counts(&self) -> u64 {
        self.saturated
    }

    /// Returns whether the table has no counters, as after [`empty`](Self::empty).
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Flat position of the counter for `key` in `row`.
    #[inline]
    fn index(&self, row: u32, key: u64) -> usize {
        let width = self.width as u64;
        let column = combine_hashes(hash_int(row as u64), key) % width;
        (row as u64 * width + column) as usize
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serializes the table to a byte vector.
    ///
    /// The snapshot is meant for restoring a table within the same
    /// deployment, for instance across a restart. It is not an interchange
    /// format.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachesketch::countmin::CountMinSketch16;
    ///
    /// let mut sketch = CountMinSketch16::new(32, 3).unwrap();
    /// sketch.increment(11);
    ///
    /// let bytes = sketch.serialize();
    /// let restored = CountMinSketch16::deserialize(&bytes).unwrap();
    /// assert_eq!(restored.count(11), 1);
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let is_empty = self.is_empty();
        let capacity = PREAMBLE_BYTES + self.table.len() * C::BYTES;
        let mut bytes = SketchBytes::with_capacity(capacity);

        bytes.write_u8(PREAMBLE_LONGS);
        bytes.write_u8(SERIAL_VERSION);
        bytes.write_u8(COUNTMIN_TABLE_FAMILY_ID);
        bytes.write_u8(if is_empty { FLAGS_IS_EMPTY } else { 0 });
        bytes.write_u8(C::BYTES as u8);
        bytes.write(&[0u8; 3]);
        bytes.write_u32_le(self.width);
        bytes.write_u32_le(self.depth);
        bytes.write_u64_le(self.saturated);

        for &cell in &self.table {
            bytes.write_uint_le(cell.into(), C::BYTES);
        }

        bytes.into_bytes()
    }

    /// Deserializes a table produced by [`serialize`](Self::serialize).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MalformedDeserializeData`](crate::error::ErrorKind::MalformedDeserializeData)
    /// if the bytes are truncated, carry a different family, version or
    /// counter width, set unknown flags or reserved bytes, or describe
    /// inconsistent dimensions.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        fn make_error(tag: &'static str) -> impl FnOnce(std::io::Error) -> Error {
            move |err| Error::insufficient_data(tag).set_source(err)
        }

        let mut cursor = SketchSlice::new(bytes);

        let preamble_longs = cursor.read_u8().map_err(make_error("preamble_longs"))?;
        let serial_version = cursor.read_u8().map_err(make_error("serial_version"))?;
        let family_id = cursor.read_u8().map_err(make_error("family_id"))?;
        let flags = cursor.read_u8().map_err(make_error("flags"))?;
        let counter_bytes = cursor.read_u8().map_err(make_error("counter_bytes"))?;
        let mut reserved = [0u8; 3];
        for byte in &mut reserved {
            *byte = cursor.read_u8().map_err(make_error("unused"))?;
        }

        if family_id != COUNTMIN_TABLE_FAMILY_ID {
            return Err(Error::invalid_family(
                COUNTMIN_TABLE_FAMILY_ID,
                family_id,
                "CountMinTable",
            ));
        }
        if serial_version != SERIAL_VERSION {
            return Err(Error::unsupported_serial_version(
                SERIAL_VERSION,
                serial_version,
            ));
        }
        if preamble_longs != PREAMBLE_LONGS {
            return Err(Error::invalid_preamble_longs(PREAMBLE_LONGS, preamble_longs));
        }
        if flags & !FLAGS_IS_EMPTY != 0 {
            return Err(Error::deserial(format!("unknown flags: {flags:#04x}")));
        }
        if reserved != [0u8; 3] {
            return Err(Error::deserial(format!(
                "reserved bytes must be zero, got {reserved:?}"
            )));
        }
        if counter_bytes as usize != C::BYTES {
            return Err(Error::deserial(format!(
                "counter width mismatch: expected {} bytes, got {counter_bytes}",
                C::BYTES
            )));
        }

        let width = cursor.read_u32_le().map_err(make_error("width"))?;
        let depth = cursor.read_u32_le().map_err(make_error("depth"))?;
        let saturated = cursor.read_u64_le().map_err(make_error("saturated"))?;

        let is_empty = (flags & FLAGS_IS_EMPTY) != 0;
        if is_empty {
            if width != 0 || depth != 0 {
                return Err(Error::deserial("empty flag set on a table with cells")
                    .with_context("width", width)
                    .with_context("depth", depth));
            }
            if saturated != 0 {
                return Err(Error::deserial("empty table with a saturated tally")
                    .with_context("saturated", saturated));
            }
            if cursor.remaining() != 0 {
                return Err(Error::deserial("trailing bytes after empty table"));
            }
            return Ok(Self::empty());
        }
        if width == 0 || depth == 0 {
            return Err(Error::deserial("non-empty table with zero width or depth")
                .with_context("width", width)
                .with_context("depth", depth));
        }

        let num_cells = (width as usize)
            .checked_mul(depth as usize)
            .ok_or_else(|| Error::deserial("table dimensions overflow"))?;
        let expected = num_cells
            .checked_mul(C::BYTES)
            .ok_or_else(|| Error::deserial("table dimensions overflow"))?;
        if cursor.remaining() != expected {
            return Err(Error::deserial(format!(
                "counter payload size mismatch: expected {expected} bytes, got {}",
                cursor.remaining()
            )));
        }

        let mut table = Vec::with_capacity(num_cells);
        for _ in 0..num_cells {
            let value = cursor
                .read_uint_le(C::BYTES)
                .map_err(make_error("counters"))?;
            let cell = C::try_from(value)
                .map_err(|_| Error::deserial(format!("counter out of range: {value}")))?;
            table.push(cell);
        }

        Ok(Self {
            width,
            depth,
            saturated,
            table,
        })
    }
}

impl<C: Counter> Default for CountMinSketchBase<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C: Counter> fmt::Debug for CountMinSketchBase<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountMinSketchBase")
            .field("width", &self.width)
            .field("depth", &self.depth)
            .field("counter_bytes", &C::BYTES)
            .field("saturated", &self.saturated)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_stays_in_row() {
        let sketch = CountMinSketchBase::<u32>::new(37, 5).unwrap();
        for key in 0..1_000u64 {
            for row in 0..sketch.depth {
                let index = sketch.index(row, key);
                let start = (row * sketch.width) as usize;
                assert!((start..start + sketch.width as usize).contains(&index));
            }
        }
    }

    #[test]
    fn test_index_is_row_salted() {
        // the same key should not land on the same column in every row
        let sketch = CountMinSketchBase::<u8>::new(1 << 16, 4).unwrap();
        let spread = (0..100u64)
            .filter(|&key| {
                let first = sketch.index(0, key);
                (1..sketch.depth)
                    .all(|row| sketch.index(row, key) - (row * sketch.width) as usize == first)
            })
            .count();
        assert_eq!(spread, 0);
    }

    #[test]
    fn test_table_len_matches_dimensions() {
        let sketch = CountMinSketchBase::<u16>::new(10, 3).unwrap();
        assert_eq!(sketch.table.len(), 30);
        assert_eq!(sketch.byte_size(), 60);
    }

    #[test]
    fn test_debug_omits_counters() {
        let sketch = CountMinSketchBase::<u8>::new(4, 2).unwrap();
        let rendered = format!("{sketch:?}");
        assert!(rendered.contains("width: 4"));
        assert!(!rendered.contains("table"));
    }
}
