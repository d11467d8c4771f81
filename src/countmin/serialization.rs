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

// Snapshot layout, all fields little-endian:
//
// byte 0      preamble longs
// byte 1      serial version
// byte 2      family id
// byte 3      flags
// byte 4      counter width in bytes
// bytes 5-7   unused
// bytes 8-11  width
// bytes 12-15 depth
// bytes 16-23 saturated cell tally
// bytes 24-   width * depth counters, absent when the empty flag is set

pub(super) const PREAMBLE_LONGS: u8 = 3;
pub(super) const SERIAL_VERSION: u8 = 1;
pub(super) const COUNTMIN_TABLE_FAMILY_ID: u8 = 0x43;
pub(super) const FLAGS_IS_EMPTY: u8 = 1 << 0;
pub(super) const LONG_SIZE_BYTES: usize = 8;
pub(super) const PREAMBLE_BYTES: usize = PREAMBLE_LONGS as usize * LONG_SIZE_BYTES;
