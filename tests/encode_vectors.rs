use cbor_det::{encode, encode_with, BigInt, CborMap, EncodeOptions, ErrorKind, KeyOrder, Value};

#[test]
fn encode_uint_boundaries() {
    assert_eq!(encode(&Value::Int(0)).unwrap(), vec![0x00]);
    assert_eq!(encode(&Value::Int(23)).unwrap(), vec![0x17]);
    assert_eq!(encode(&Value::Int(24)).unwrap(), vec![0x18, 0x18]);
    assert_eq!(encode(&Value::Int(255)).unwrap(), vec![0x18, 0xff]);
    assert_eq!(encode(&Value::Int(256)).unwrap(), vec![0x19, 0x01, 0x00]);
    assert_eq!(encode(&Value::Int(65_535)).unwrap(), vec![0x19, 0xff, 0xff]);
    assert_eq!(
        encode(&Value::Int(65_536)).unwrap(),
        vec![0x1a, 0x00, 0x01, 0x00, 0x00]
    );
    assert_eq!(
        encode(&Value::Int(4_294_967_295)).unwrap(),
        vec![0x1a, 0xff, 0xff, 0xff, 0xff]
    );
    assert_eq!(
        encode(&Value::from(1u64 << 32)).unwrap(),
        vec![0x1b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(
        encode(&Value::from(u64::MAX)).unwrap(),
        vec![0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
}

#[test]
fn encode_negint_boundaries() {
    assert_eq!(encode(&Value::Int(-1)).unwrap(), vec![0x20]);
    assert_eq!(encode(&Value::Int(-24)).unwrap(), vec![0x37]);
    assert_eq!(encode(&Value::Int(-25)).unwrap(), vec![0x38, 0x18]);
    assert_eq!(encode(&Value::Int(-256)).unwrap(), vec![0x38, 0xff]);
    assert_eq!(encode(&Value::Int(-257)).unwrap(), vec![0x39, 0x01, 0x00]);
    let mut expected = vec![0x3b];
    expected.extend_from_slice(&0x7fff_ffff_ffff_ffffu64.to_be_bytes());
    assert_eq!(encode(&Value::Int(i64::MIN)).unwrap(), expected);
}

#[test]
fn encode_bigint_beyond_argument_range_requires_tag() {
    let big = BigInt::from_u128(false, 1u128 << 64).unwrap();
    let err = encode(&Value::BigInt(big)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::BigIntRequiresTag);
}

#[test]
fn encode_bigint_within_argument_range_uses_major_types() {
    let big = BigInt::from_u128(false, u128::from(u64::MAX)).unwrap();
    assert_eq!(
        encode(&Value::BigInt(big)).unwrap(),
        vec![0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );

    // -(2^64) is the most negative value major type 1 can carry.
    let big = BigInt::from_u128(true, u128::from(u64::MAX)).unwrap();
    assert_eq!(
        encode(&Value::BigInt(big)).unwrap(),
        vec![0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
}

#[test]
fn encode_text_and_bytes_length_boundaries() {
    for &len in &[0usize, 23, 24, 255, 256] {
        let s = "a".repeat(len);
        let mut expected = Vec::new();
        if len < 24 {
            expected.push(0x60 | u8::try_from(len).unwrap());
        } else if len <= 0xff {
            expected.push(0x78);
            expected.push(u8::try_from(len).unwrap());
        } else {
            expected.push(0x79);
            expected.extend_from_slice(&u16::try_from(len).unwrap().to_be_bytes());
        }
        expected.extend_from_slice(s.as_bytes());
        assert_eq!(encode(&Value::Text(s)).unwrap(), expected);

        let b = vec![0u8; len];
        let mut expected = Vec::new();
        if len < 24 {
            expected.push(0x40 | u8::try_from(len).unwrap());
        } else if len <= 0xff {
            expected.push(0x58);
            expected.push(u8::try_from(len).unwrap());
        } else {
            expected.push(0x59);
            expected.extend_from_slice(&u16::try_from(len).unwrap().to_be_bytes());
        }
        expected.extend_from_slice(&b);
        assert_eq!(encode(&Value::Bytes(b)).unwrap(), expected);
    }
}

#[test]
fn encode_text_length_counts_utf8_bytes() {
    assert_eq!(
        encode(&Value::text("😀")).unwrap(),
        vec![0x64, 0xf0, 0x9f, 0x98, 0x80]
    );
}

#[test]
fn encode_simple_values() {
    assert_eq!(encode(&Value::Bool(false)).unwrap(), vec![0xf4]);
    assert_eq!(encode(&Value::Bool(true)).unwrap(), vec![0xf5]);
    assert_eq!(encode(&Value::Null).unwrap(), vec![0xf6]);
    assert_eq!(encode(&Value::Undefined).unwrap(), vec![0xf7]);
}

#[test]
fn encode_float_minimization() {
    assert_eq!(encode(&Value::Float(0.5)).unwrap(), vec![0xf9, 0x38, 0x00]);
    assert_eq!(encode(&Value::Float(1.5)).unwrap(), vec![0xf9, 0x3e, 0x00]);
    assert_eq!(
        encode(&Value::Float(f64::INFINITY)).unwrap(),
        vec![0xf9, 0x7c, 0x00]
    );
    assert_eq!(
        encode(&Value::Float(f64::NEG_INFINITY)).unwrap(),
        vec![0xf9, 0xfc, 0x00]
    );
    assert_eq!(encode(&Value::Float(-0.0)).unwrap(), vec![0xf9, 0x80, 0x00]);

    // smallest f16 subnormal
    assert_eq!(
        encode(&Value::Float(5.960_464_477_539_063e-8)).unwrap(),
        vec![0xf9, 0x00, 0x01]
    );

    // exactly representable in f32 but not f16
    let mut expected = vec![0xfa];
    expected.extend_from_slice(&f32::MAX.to_bits().to_be_bytes());
    assert_eq!(encode(&Value::Float(f64::from(f32::MAX))).unwrap(), expected);

    // needs the full 64 bits
    let mut expected = vec![0xfb];
    expected.extend_from_slice(&1.1f64.to_bits().to_be_bytes());
    assert_eq!(encode(&Value::Float(1.1)).unwrap(), expected);
}

#[test]
fn encode_float_nan_is_canonical() {
    assert_eq!(encode(&Value::Float(f64::NAN)).unwrap(), vec![0xf9, 0x7e, 0x00]);
    let other_nan = f64::from_bits(0x7ff8_dead_beef_0000);
    assert_eq!(encode(&Value::Float(other_nan)).unwrap(), vec![0xf9, 0x7e, 0x00]);
}

#[test]
fn encode_integral_floats_normalize_to_integers() {
    assert_eq!(encode(&Value::Float(0.0)).unwrap(), vec![0x00]);
    assert_eq!(encode(&Value::Float(5.0)).unwrap(), encode(&Value::Int(5)).unwrap());
    assert_eq!(
        encode(&Value::Float(-1024.0)).unwrap(),
        encode(&Value::Int(-1024)).unwrap()
    );
    // 2^63 does not fit i64, so it stays a float (f32-exact as a power of two)
    assert_eq!(
        encode(&Value::Float(9.223_372_036_854_776e18)).unwrap(),
        vec![0xfa, 0x5f, 0x00, 0x00, 0x00]
    );
}

#[test]
fn encode_float64_option_pins_width_only() {
    let options = EncodeOptions {
        float64: true,
        ..EncodeOptions::default()
    };
    let mut expected = vec![0xfb];
    expected.extend_from_slice(&0.5f64.to_bits().to_be_bytes());
    assert_eq!(encode_with(&Value::Float(0.5), &options).unwrap(), expected);

    let mut expected = vec![0xfb];
    expected.extend_from_slice(&0x7ff8_0000_0000_0000u64.to_be_bytes());
    assert_eq!(
        encode_with(&Value::Float(f64::NAN), &options).unwrap(),
        expected
    );

    // integral floats still normalize
    assert_eq!(encode_with(&Value::Float(5.0), &options).unwrap(), vec![0x05]);
}

#[test]
fn encode_empty_containers() {
    assert_eq!(encode(&Value::Bytes(Vec::new())).unwrap(), vec![0x40]);
    assert_eq!(encode(&Value::text("")).unwrap(), vec![0x60]);
    assert_eq!(encode(&Value::Array(Vec::new())).unwrap(), vec![0x80]);
    assert_eq!(encode(&Value::Map(CborMap::new())).unwrap(), vec![0xa0]);
}

#[test]
fn encode_sorts_map_keys_by_encoded_bytes() {
    let mut map = CborMap::new();
    map.insert(Value::from("b"), Value::Int(1));
    map.insert(Value::from("a"), Value::Int(2));
    let bytes = encode(&Value::Map(map)).unwrap();
    assert_eq!(bytes, vec![0xa2, 0x61, 0x61, 0x02, 0x61, 0x62, 0x01]);
}

#[test]
fn encode_sorts_shorter_keys_first() {
    let mut map = CborMap::new();
    map.insert(Value::from("aaa"), Value::Int(1));
    map.insert(Value::from("ab"), Value::Int(2));
    let bytes = encode(&Value::Map(map)).unwrap();
    assert_eq!(
        bytes,
        vec![0xa2, 0x62, 0x61, 0x62, 0x02, 0x63, 0x61, 0x61, 0x61, 0x01]
    );
}

#[test]
fn bytewise_order_diverges_on_mixed_key_widths() {
    // 500 encodes as 19 01 f4 (3 bytes), "zz" as 62 7a 7a (3 bytes as well),
    // so use "z" (2 bytes): length-first puts "z" before 500, bytewise the
    // integer first because 0x19 < 0x61.
    let mut map = CborMap::new();
    map.insert(Value::Int(500), Value::Int(1));
    map.insert(Value::from("z"), Value::Int(2));

    let bytes = encode(&Value::Map(map.clone())).unwrap();
    assert_eq!(bytes, vec![0xa2, 0x61, 0x7a, 0x02, 0x19, 0x01, 0xf4, 0x01]);

    let options = EncodeOptions {
        key_order: KeyOrder::Bytewise,
        ..EncodeOptions::default()
    };
    let bytes = encode_with(&Value::Map(map), &options).unwrap();
    assert_eq!(bytes, vec![0xa2, 0x19, 0x01, 0xf4, 0x01, 0x61, 0x7a, 0x02]);
}

#[test]
fn encode_rejects_duplicate_keys() {
    let map = CborMap::from_entries(vec![
        (Value::from("a"), Value::Int(1)),
        (Value::from("a"), Value::Int(2)),
    ]);
    let err = encode(&Value::Map(map)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateMapKey);
}

#[test]
fn encode_tagged_values() {
    let v = Value::tag(42, Value::text("inner"));
    assert_eq!(
        encode(&v).unwrap(),
        vec![0xd8, 0x2a, 0x65, 0x69, 0x6e, 0x6e, 0x65, 0x72]
    );
}

#[test]
fn encode_depth_limit() {
    let mut v = Value::Int(1);
    for _ in 0..100 {
        v = Value::Array(vec![v]);
    }
    let err = encode(&v).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MaxDepthExceeded);

    let options = EncodeOptions {
        max_depth: 128,
        ..EncodeOptions::default()
    };
    encode_with(&v, &options).unwrap();
}
