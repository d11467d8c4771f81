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

//! Hash primitives used to place keys in the frequency table.
//!
//! [`hash_int`] and [`combine_hashes`] derive one row-specific hash function
//! per table row from a single integer mixer salted with the row number.
//! [`hash_item`] turns any hashable value into a 64-bit key.

mod mix;
mod murmurhash;

pub use self::mix::combine_hashes;
pub use self::mix::hash_int;
pub use self::murmurhash::DEFAULT_ITEM_SEED;
pub use self::murmurhash::hash_item;
