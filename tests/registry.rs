use std::borrow::Cow;

use cbor_det::{
    decode, decode_with, encode, encode_with, BigInt, DecodeOptions, EncodeOptions, ErrorKind,
    LogicalType, TagRegistry, Token, TypeEncoders, Value,
};

#[test]
fn type_encoder_overrides_default_emitter() {
    let type_encoders = TypeEncoders::new().with(LogicalType::Bool, |v| {
        let Value::Bool(b) = v else { return Ok(None) };
        Ok(Some(vec![Token::Uint(u64::from(*b))]))
    });
    let options = EncodeOptions {
        type_encoders,
        ..EncodeOptions::default()
    };

    assert_eq!(encode_with(&Value::Bool(true), &options).unwrap(), vec![0x01]);
    assert_eq!(
        encode_with(&Value::Bool(false), &options).unwrap(),
        vec![0x00]
    );
    // other types are untouched
    assert_eq!(encode_with(&Value::Null, &options).unwrap(), vec![0xf6]);
}

#[test]
fn type_encoder_none_defers_to_default() {
    let type_encoders = TypeEncoders::new().with(LogicalType::Uint, |v| {
        if v.as_i64() == Some(7) {
            Ok(Some(vec![Token::Text(Cow::Borrowed("seven"))]))
        } else {
            Ok(None)
        }
    });
    let options = EncodeOptions {
        type_encoders,
        ..EncodeOptions::default()
    };

    assert_eq!(
        encode_with(&Value::Int(7), &options).unwrap(),
        vec![0x65, 0x73, 0x65, 0x76, 0x65, 0x6e]
    );
    assert_eq!(encode_with(&Value::Int(8), &options).unwrap(), vec![0x08]);
}

#[test]
fn type_encoder_empty_list_omits_value() {
    let type_encoders = TypeEncoders::new().with(LogicalType::Null, |_| Ok(Some(Vec::new())));
    let options = EncodeOptions {
        type_encoders,
        ..EncodeOptions::default()
    };

    // the array count is the caller's responsibility and no longer matches
    let v = Value::Array(vec![Value::Int(1), Value::Null, Value::Int(2)]);
    assert_eq!(encode_with(&v, &options).unwrap(), vec![0x83, 0x01, 0x02]);
}

#[test]
fn type_encoder_errors_propagate() {
    let type_encoders = TypeEncoders::new().with(LogicalType::Undefined, |_| {
        Err(cbor_det::CborError::new(ErrorKind::UndefinedNotAllowed, 0))
    });
    let options = EncodeOptions {
        type_encoders,
        ..EncodeOptions::default()
    };
    let err = encode_with(&Value::Undefined, &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UndefinedNotAllowed);
}

#[test]
fn type_encoder_sees_negint_and_uint_separately() {
    let type_encoders = TypeEncoders::new().with(LogicalType::NegInt, |_| {
        Ok(Some(vec![Token::Text(Cow::Borrowed("neg"))]))
    });
    let options = EncodeOptions {
        type_encoders,
        ..EncodeOptions::default()
    };
    assert_eq!(
        encode_with(&Value::Int(-5), &options).unwrap(),
        vec![0x63, 0x6e, 0x65, 0x67]
    );
    assert_eq!(encode_with(&Value::Int(5), &options).unwrap(), vec![0x05]);
}

#[test]
fn logical_type_classifier() {
    assert_eq!(LogicalType::of(&Value::Int(1)), LogicalType::Uint);
    assert_eq!(LogicalType::of(&Value::Int(-1)), LogicalType::NegInt);
    assert_eq!(LogicalType::of(&Value::Float(1.5)), LogicalType::Float);
    assert_eq!(LogicalType::of(&Value::text("x")), LogicalType::String);
    assert_eq!(LogicalType::of(&Value::tag(1, Value::Null)), LogicalType::Tag);
    assert_eq!(LogicalType::Uint.name(), "uint");
    assert_eq!(LogicalType::BigInt.name(), "bigint");
}

#[test]
fn tag_decoder_receives_decoded_inner_value() {
    let tags = TagRegistry::new().with(42, |inner| {
        // the inner item arrives as a value, not raw bytes
        assert_eq!(inner, Value::Array(vec![Value::Int(1), Value::Int(2)]));
        Ok(Value::text("dispatched"))
    });
    let options = DecodeOptions {
        tags,
        ..DecodeOptions::default()
    };

    let v = decode_with(&[0xd8, 0x2a, 0x82, 0x01, 0x02], &options).unwrap();
    assert_eq!(v, Value::text("dispatched"));
}

#[test]
fn tag_decoder_errors_propagate() {
    let tags = TagRegistry::new().with(1, |_| {
        Err(cbor_det::CborError::new(ErrorKind::UnknownTag, 0))
    });
    let options = DecodeOptions {
        tags,
        ..DecodeOptions::default()
    };
    let err = decode_with(&[0xc1, 0x00], &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownTag);
}

#[test]
fn bignum_tags_round_trip_oversized_integers() {
    let encode_options = EncodeOptions {
        type_encoders: TypeEncoders::with_bignum_tags(),
        ..EncodeOptions::default()
    };
    let decode_options = DecodeOptions {
        tags: TagRegistry::with_bignums(),
        ..DecodeOptions::default()
    };

    // 2^64 needs tag 2
    let big = Value::BigInt(BigInt::from_u128(false, 1u128 << 64).unwrap());
    let bytes = encode_with(&big, &encode_options).unwrap();
    assert_eq!(
        bytes,
        vec![0xc2, 0x49, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(decode_with(&bytes, &decode_options).unwrap(), big);

    // -(2^64) - 1 needs tag 3 (magnitude 2^64)
    let big = Value::BigInt(BigInt::from_u128(true, 1u128 << 64).unwrap());
    let bytes = encode_with(&big, &encode_options).unwrap();
    assert_eq!(bytes[0], 0xc3);
    assert_eq!(decode_with(&bytes, &decode_options).unwrap(), big);
}

#[test]
fn bignum_tag_encoder_defers_for_in_range_values() {
    let options = EncodeOptions {
        type_encoders: TypeEncoders::with_bignum_tags(),
        ..EncodeOptions::default()
    };
    // u64::MAX fits major type 0, so no tag is emitted
    let big = Value::BigInt(BigInt::from_u128(false, u128::from(u64::MAX)).unwrap());
    assert_eq!(
        encode_with(&big, &options).unwrap(),
        vec![0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
}

#[test]
fn bignum_tag_decoder_rejects_malformed_content() {
    let tags = TagRegistry::with_bignums();
    let options = DecodeOptions {
        tags,
        ..DecodeOptions::default()
    };

    // leading zero in the magnitude
    let err = decode_with(&[0xc2, 0x42, 0x00, 0x01], &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NonCanonicalEncoding);

    // empty magnitude
    let err = decode_with(&[0xc2, 0x40], &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NonCanonicalEncoding);

    // non-bytes content
    let err = decode_with(&[0xc2, 0x01], &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NonCanonicalEncoding);
}

#[test]
fn tag_registry_lookup() {
    let tags = TagRegistry::with_bignums();
    assert!(tags.contains(2));
    assert!(tags.contains(3));
    assert!(!tags.contains(4));
}

#[test]
fn unknown_tag_still_fails_with_partial_registry() {
    let options = DecodeOptions {
        tags: TagRegistry::with_bignums(),
        ..DecodeOptions::default()
    };
    let err = decode_with(&[0xc1, 0x00], &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownTag);
}

#[test]
fn nested_tag_values_encode_and_dispatch() {
    let tags = TagRegistry::new().with(7, Ok);
    let options = DecodeOptions {
        tags,
        ..DecodeOptions::default()
    };
    let bytes = encode(&Value::tag(7, Value::Int(3))).unwrap();
    assert_eq!(bytes, vec![0xc7, 0x03]);
    assert_eq!(decode_with(&bytes, &options).unwrap(), Value::Int(3));
    assert_eq!(decode(&bytes).unwrap_err().kind, ErrorKind::UnknownTag);
}
