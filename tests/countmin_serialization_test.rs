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

use cachesketch::countmin::CountMinSketch;
use cachesketch::countmin::CountMinSketch8;
use cachesketch::countmin::CountMinSketch16;
use cachesketch::countmin::CountMinSketchBase;
use cachesketch::countmin::Counter;
use cachesketch::error::ErrorKind;
use googletest::assert_that;
use googletest::prelude::contains_substring;

fn populated<C: Counter>(width: u32, depth: u32) -> CountMinSketchBase<C> {
    let mut sketch = CountMinSketchBase::<C>::new(width, depth).unwrap();
    for key in 0..300u64 {
        for _ in 0..(key % 5) {
            sketch.increment(key);
        }
    }
    for _ in 0..300 {
        sketch.increment(1_000);
    }
    sketch
}

#[test]
fn test_snapshot_restores_counts() {
    let sketch = populated::<u8>(64, 4);
    let bytes = sketch.serialize();
    assert_eq!(bytes.len(), 24 + 64 * 4);

    let restored = CountMinSketch8::deserialize(&bytes).unwrap();
    assert_eq!(restored, sketch);
    assert_eq!(restored.saturated_counts(), sketch.saturated_counts());
    for key in 0..300u64 {
        assert_eq!(restored.count(key), sketch.count(key));
    }
    assert_eq!(restored.count(1_000), 255);
}

#[test]
fn test_snapshot_counter_widths() {
    let sketch = populated::<u16>(50, 3);
    let bytes = sketch.serialize();
    assert_eq!(bytes.len(), 24 + 50 * 3 * 2);
    assert_eq!(CountMinSketch16::deserialize(&bytes).unwrap(), sketch);

    let sketch = populated::<u32>(50, 3);
    let bytes = sketch.serialize();
    assert_eq!(bytes.len(), 24 + 50 * 3 * 4);
    assert_eq!(CountMinSketch::deserialize(&bytes).unwrap(), sketch);
}

#[test]
fn test_snapshot_of_empty_table() {
    let sketch = CountMinSketch::default();
    let bytes = sketch.serialize();
    assert_eq!(bytes.len(), 24);

    let restored = CountMinSketch::deserialize(&bytes).unwrap();
    assert!(restored.is_empty());
    assert_eq!(restored.count(1), 0);
}

#[test]
fn test_restored_table_keeps_counting() {
    let mut sketch = CountMinSketch16::new(16, 2).unwrap();
    sketch.increment(5);
    let mut restored = CountMinSketch16::deserialize(&sketch.serialize()).unwrap();
    restored.increment(5);
    assert_eq!(restored.count(5), 2);
}

#[test]
fn test_rejects_counter_width_mismatch() {
    let bytes = populated::<u8>(16, 2).serialize();
    let err = CountMinSketch16::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("counter width mismatch"));
}

#[test]
fn test_rejects_truncated_snapshot() {
    let bytes = populated::<u32>(16, 2).serialize();

    let err = CountMinSketch::deserialize(&bytes[..10]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("insufficient data"));

    let err = CountMinSketch::deserialize(&bytes[..bytes.len() - 1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("payload size mismatch"));

    let err = CountMinSketch::deserialize(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
}

#[test]
fn test_rejects_trailing_bytes() {
    let mut bytes = populated::<u8>(16, 2).serialize();
    bytes.push(0);
    let err = CountMinSketch8::deserialize(&bytes).unwrap_err();
    assert_that!(err.message(), contains_substring("payload size mismatch"));
}

#[test]
fn test_rejects_corrupt_preamble() {
    let bytes = populated::<u8>(16, 2).serialize();

    let mut bad_family = bytes.clone();
    bad_family[2] = 18;
    let err = CountMinSketch8::deserialize(&bad_family).unwrap_err();
    assert_that!(err.message(), contains_substring("invalid family"));

    let mut bad_version = bytes.clone();
    bad_version[1] = 9;
    let err = CountMinSketch8::deserialize(&bad_version).unwrap_err();
    assert_that!(err.message(), contains_substring("unsupported serial version"));

    let mut bad_preamble = bytes.clone();
    bad_preamble[0] = 2;
    let err = CountMinSketch8::deserialize(&bad_preamble).unwrap_err();
    assert_that!(err.message(), contains_substring("invalid preamble longs"));

    let mut unknown_flag = bytes.clone();
    unknown_flag[3] = 1 << 3;
    let err = CountMinSketch8::deserialize(&unknown_flag).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("unknown flags"));

    for offset in 5..8 {
        let mut dirty_reserved = bytes.clone();
        dirty_reserved[offset] = 0x7f;
        let err = CountMinSketch8::deserialize(&dirty_reserved).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
        assert_that!(err.message(), contains_substring("reserved bytes must be zero"));
    }
}

#[test]
fn test_rejects_inconsistent_dimensions() {
    let bytes = populated::<u8>(16, 2).serialize();

    // empty flag on a table that has cells
    let mut flagged = bytes.clone();
    flagged[3] = 1;
    let err = CountMinSketch8::deserialize(&flagged).unwrap_err();
    assert_that!(err.message(), contains_substring("empty flag"));

    // empty table carrying a saturated tally
    let mut empty = CountMinSketch8::default().serialize();
    empty[16..24].copy_from_slice(&3u64.to_le_bytes());
    let err = CountMinSketch8::deserialize(&empty).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("saturated tally"));

    // zero depth without the empty flag
    let mut zero_depth = bytes.clone();
    zero_depth[12..16].copy_from_slice(&0u32.to_le_bytes());
    let err = CountMinSketch8::deserialize(&zero_depth).unwrap_err();
    assert_that!(err.message(), contains_substring("zero width or depth"));
}
