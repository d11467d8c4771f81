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

use std::io;
use std::io::Cursor;

use byteorder::ByteOrder;
use byteorder::LittleEndian;
use byteorder::ReadBytesExt;

pub(crate) struct SketchBytes {
    bytes: Vec<u8>,
}

impl SketchBytes {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write(&mut self, buf: &[u8]) {
        self.bytes.extend_from_slice(buf);
    }

    pub fn write_u8(&mut self, n: u8) {
        self.bytes.push(n);
    }

    pub fn write_u32_le(&mut self, n: u32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, n);
        self.write(&buf);
    }

    pub fn write_u64_le(&mut self, n: u64) {
        let mut buf = [0u8; 8];
        LittleEndian::write_u64(&mut buf, n);
        self.write(&buf);
    }

    /// Writes the low `nbytes` bytes of `n`; `n` must fit in `nbytes`.
    pub fn write_uint_le(&mut self, n: u64, nbytes: usize) {
        let mut buf = [0u8; 8];
        LittleEndian::write_uint(&mut buf, n, nbytes);
        self.write(&buf[..nbytes]);
    }
}

pub(crate) struct SketchSlice<'a> {
    slice: Cursor<&'a [u8]>,
}

impl SketchSlice<'_> {
    pub fn new(slice: &[u8]) -> SketchSlice<'_> {
        SketchSlice {
            slice: Cursor::new(slice),
        }
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        self.slice.read_u8()
    }

    pub fn read_u32_le(&mut self) -> io::Result<u32> {
        self.slice.read_u32::<LittleEndian>()
    }

    pub fn read_u64_le(&mut self) -> io::Result<u64> {
        self.slice.read_u64::<LittleEndian>()
    }

    pub fn read_uint_le(&mut self, nbytes: usize) -> io::Result<u64> {
        self.slice.read_uint::<LittleEndian>(nbytes)
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        let len = self.slice.get_ref().len();
        len.saturating_sub(self.slice.position() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_width_fields() {
        let mut bytes = SketchBytes::with_capacity(16);
        bytes.write_u8(7);
        bytes.write_u32_le(0x0102_0304);
        bytes.write_uint_le(0xBEEF, 2);
        bytes.write_u64_le(u64::MAX - 1);
        let bytes = bytes.into_bytes();
        assert_eq!(bytes.len(), 1 + 4 + 2 + 8);
        assert_eq!(&bytes[1..5], &[0x04, 0x03, 0x02, 0x01]);

        let mut slice = SketchSlice::new(&bytes);
        assert_eq!(slice.read_u8().unwrap(), 7);
        assert_eq!(slice.read_u32_le().unwrap(), 0x0102_0304);
        assert_eq!(slice.read_uint_le(2).unwrap(), 0xBEEF);
        assert_eq!(slice.remaining(), 8);
        assert_eq!(slice.read_u64_le().unwrap(), u64::MAX - 1);
        assert_eq!(slice.remaining(), 0);
    }

    #[test]
    fn test_read_past_end_fails() {
        let bytes = [1u8, 2, 3];
        let mut slice = SketchSlice::new(&bytes);
        let err = slice.read_u32_le().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
