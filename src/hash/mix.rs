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

// Multiplier of the 128-to-64 bit reduction from CityHash.
const K_MUL: u64 = 0x9DDF_EA08_EB38_2D69;

/// Thomas Wang's 64-bit integer mix.
///
/// A bijection on `u64` with good avalanche behavior, cheap enough to be
/// evaluated once per table row on every update.
#[inline]
pub fn hash_int(key: u64) -> u64 {
    let mut key = (!key).wrapping_add(key << 21);
    key ^= key >> 24;
    key = key.wrapping_add(key << 3).wrapping_add(key << 8);
    key ^= key >> 14;
    key = key.wrapping_add(key << 2).wrapping_add(key << 4);
    key ^= key >> 28;
    key.wrapping_add(key << 31)
}

/// Combines two 64-bit hashes into one.
///
/// The combination is order dependent: `combine_hashes(a, b)` and
/// `combine_hashes(b, a)` differ in general.
#[inline]
pub fn combine_hashes(upper: u64, lower: u64) -> u64 {
    let mut a = (lower ^ upper).wrapping_mul(K_MUL);
    a ^= a >> 47;
    let mut b = (upper ^ a).wrapping_mul(K_MUL);
    b ^= b >> 47;
    b.wrapping_mul(K_MUL)
}
