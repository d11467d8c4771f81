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
use std::ops::Add;
use std::ops::Sub;

mod private {
    pub trait Sealed {}

    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// Fixed-width unsigned counter stored in each table cell.
///
/// Implemented for `u8`, `u16` and `u32`. Narrower counters use less memory
/// but saturate sooner.
pub trait Counter:
    private::Sealed
    + Copy
    + Default
    + Ord
    + fmt::Debug
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Into<u64>
    + TryFrom<u64>
    + 'static
{
    /// Zero.
    const ZERO: Self;
    /// One.
    const ONE: Self;
    /// Largest representable count; a cell holding it is saturated.
    const MAX: Self;
    /// Size of one counter in bytes.
    const BYTES: usize;

    /// Narrows a floating-point value into the counter range.
    ///
    /// Truncates toward zero and clamps to `[0, MAX]`. NaN becomes zero.
    fn narrow_from_f64(value: f64) -> Self;

    /// Widens the counter to `f64` without loss.
    fn to_f64(self) -> f64;
}

macro_rules! impl_counter {
    ($($ty:ty),*) => {
        $(
            impl Counter for $ty {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MAX: Self = <$ty>::MAX;
                const BYTES: usize = size_of::<$ty>();

                #[inline]
                fn narrow_from_f64(value: f64) -> Self {
                    // float-to-int `as` saturates at both ends and maps NaN to 0
                    value as $ty
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_counter!(u8, u16, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_truncates() {
        assert_eq!(u8::narrow_from_f64(127.5), 127);
        assert_eq!(u16::narrow_from_f64(0.99), 0);
        assert_eq!(u32::narrow_from_f64(41.999), 41);
    }

    #[test]
    fn test_narrow_clamps() {
        assert_eq!(u8::narrow_from_f64(300.0), 255);
        assert_eq!(u16::narrow_from_f64(1e9), u16::MAX);
        assert_eq!(u32::narrow_from_f64(-3.0), 0);
        assert_eq!(u8::narrow_from_f64(f64::NAN), 0);
        assert_eq!(u32::narrow_from_f64(f64::INFINITY), u32::MAX);
    }

    #[test]
    fn test_widths() {
        assert_eq!(<u8 as Counter>::BYTES, 1);
        assert_eq!(<u16 as Counter>::BYTES, 2);
        assert_eq!(<u32 as Counter>::BYTES, 4);
        assert_eq!(<u8 as Counter>::MAX.to_f64(), 255.0);
    }
}
