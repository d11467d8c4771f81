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

use std::hash::Hash;

/// Seed used by [`hash_item`].
pub const DEFAULT_ITEM_SEED: u32 = 9001;

/// Hashes an arbitrary item to a 64-bit table key with MurmurHash3 x64/128.
///
/// Only the lower 64 bits of the 128-bit digest are kept. Two processes
/// hashing the same item with the same [`Hash`] implementation produce the
/// same key.
///
/// # Examples
///
/// ```
/// use cachesketch::hash::hash_item;
///
/// assert_eq!(hash_item(&"apple"), hash_item(&"apple"));
/// assert_ne!(hash_item(&"apple"), hash_item(&"banana"));
/// ```
pub fn hash_item<T: Hash + ?Sized>(item: &T) -> u64 {
    let mut hasher = mur3::Hasher128::with_seed(DEFAULT_ITEM_SEED);
    item.hash(&mut hasher);
    let (h1, _) = hasher.finish128();
    h1
}
