use crate::decode::{decode_with, DecodeOptions};
use crate::encode::encode;
use crate::value::Value;
use crate::CborError;

/// An owned CBOR item proven to be in canonical form.
///
/// For content-addressed storage these bytes *are* the value: structurally
/// equal values produce identical bytes, so semantic equality reduces to
/// byte equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCbor {
    bytes: Vec<u8>,
}

impl CanonicalCbor {
    /// Encode a value into its canonical representation.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails (see [`encode`]).
    pub fn from_value(value: &Value) -> Result<Self, CborError> {
        Ok(Self {
            bytes: encode(value)?,
        })
    }

    /// Validate and wrap an owned buffer without copying.
    ///
    /// Validation decodes the bytes under [`DecodeOptions::canonical`]:
    /// strict smallest-form rules with indefinite lengths forbidden.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not one canonical CBOR item.
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self, CborError> {
        decode_with(&bytes, &DecodeOptions::canonical())?;
        Ok(Self { bytes })
    }

    /// Validate and copy `bytes` into an owned canonical representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not one canonical CBOR item.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CborError> {
        Self::from_vec(bytes.to_vec())
    }

    /// Borrow the canonical bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume and return the canonical bytes.
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Length in bytes of the canonical representation.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` iff the buffer is empty (never the case for a valid item).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Compute the SHA-256 digest of the canonical bytes.
    #[cfg(feature = "sha2")]
    #[must_use]
    pub fn sha256(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        let out = hasher.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(out.as_slice());
        digest
    }
}

impl AsRef<[u8]> for CanonicalCbor {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
