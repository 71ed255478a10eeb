//! # cbor-det
//!
//! Strict, deterministic CBOR (RFC 8949) encoding and decoding, built for
//! content-addressed storage where byte-for-byte stability matters.
//!
//! ## Design principles
//!
//! - **One value, one byte sequence.**
//!   [`encode`] emits the unique canonical form: smallest-form integer and
//!   length arguments, smallest exact float width, map entries sorted by
//!   their encoded key bytes. Structurally equal values always produce
//!   identical bytes.
//! - **Strictness is opt-in on decode.**
//!   [`decode`] accepts any well-formed item in the supported subset;
//!   `strict` mode additionally rejects every non-canonical encoding, so
//!   `encode(decode(bytes)) == bytes` for all accepted inputs.
//! - **Two extension points, nothing else open.**
//!   The value model is a closed sum type; [`TypeEncoders`] (encode side)
//!   and [`TagRegistry`] (decode side) are the only dispatch hooks.
//!
//! ## Layers
//!
//! The token layer ([`tokenize`]/[`serialize`]) exposes the neutral
//! [`Token`] stream between the binary layout and the value model, for
//! callers who want to intercept below [`encode`]/[`decode`].
//!
//! ## Feature flags
//!
//! - `sha2` *(default)*: SHA-256 hashing on [`CanonicalCbor`].
//! - `simdutf8`: SIMD-accelerated UTF-8 validation.
//!
//! ## Safety
//!
//! This crate forbids `unsafe` code.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod canonical;
mod decode;
mod encode;
mod error;
mod float;
mod jump;
mod order;
mod registry;
mod token;
mod utf8;
mod value;
mod wire;

pub use crate::canonical::CanonicalCbor;
pub use crate::decode::{decode, decode_with, DecodeOptions};
pub use crate::encode::{encode, encode_with, EncodeOptions};
pub use crate::error::{CborError, ErrorKind};
pub use crate::order::{cmp_encoded_keys, is_strictly_ascending, KeyOrder};
pub use crate::registry::{LogicalType, TagDecoderFn, TagRegistry, TypeEncoderFn, TypeEncoders};
pub use crate::token::{serialize, tokenize, Token, TokenType, Tokenizer};
pub use crate::value::{BigInt, CborMap, Value};

/// Default maximum container nesting depth for both encode and decode.
pub const DEFAULT_MAX_DEPTH: usize = 64;
