//! 32-byte transaction identifier.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::ID_LEN;

/// A 32-byte identifier for a transaction in the simulated DAG.
///
/// Ids are drawn from the simulation RNG at creation time and never
/// reused. All preference and acceptance bookkeeping compares ids by
/// value; nothing in the engine relies on memory identity.
///
/// # String Representation
///
/// Ids render as lowercase hex.
///
/// # Examples
///
/// ```
/// use snowdag_ids::TxId;
///
/// let id = TxId::from_bytes([0u8; 32]);
/// assert!(id.is_zero());
///
/// let parsed: TxId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct TxId([u8; ID_LEN]);

/// Errors that can occur when parsing an id.
#[derive(Debug, Error)]
pub enum IdError {
    /// The hex decoding failed.
    #[error("hex decoding failed: {0}")]
    Hex(#[from] hex::FromHexError),

    /// The decoded bytes have the wrong length.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

impl TxId {
    /// The zero id.
    pub const ZERO: Self = Self([0u8; ID_LEN]);

    /// Creates an id from a 32-byte array.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Creates an id from a slice, returning an error if the length is wrong.
    ///
    /// # Errors
    ///
    /// Returns `IdError::InvalidLength` if the slice is not exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdError> {
        if bytes.len() != ID_LEN {
            return Err(IdError::InvalidLength {
                expected: ID_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; ID_LEN];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Draws a fresh id from the given RNG.
    ///
    /// The simulator passes its seeded master RNG here so that id
    /// assignment is reproducible across runs.
    #[must_use]
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; ID_LEN];
        rng.fill(&mut bytes[..]);
        Self(bytes)
    }

    /// Returns the id as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Returns true if this is the zero id.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ID_LEN]
    }

    /// Returns the hex-encoded representation of this id.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First four bytes are plenty to tell ids apart in logs.
        write!(f, "TxId({}..)", hex::encode(&self.0[..4]))
    }
}

impl FromStr for TxId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl AsRef<[u8]> for TxId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ID_LEN]> for TxId {
    fn from(bytes: [u8; ID_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<TxId> for [u8; ID_LEN] {
    fn from(id: TxId) -> Self {
        id.0
    }
}

impl Serialize for TxId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for TxId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            Self::from_slice(&bytes).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_zero_id() {
        let id = TxId::ZERO;
        assert!(id.is_zero());
        assert_eq!(id.as_bytes(), &[0u8; 32]);
    }

    #[test]
    fn test_from_bytes() {
        let bytes = [42u8; 32];
        let id = TxId::from_bytes(bytes);
        assert_eq!(id.as_bytes(), &bytes);
        assert!(!id.is_zero());
    }

    #[test]
    fn test_from_slice() {
        let bytes = [42u8; 32];
        let id = TxId::from_slice(&bytes).unwrap();
        assert_eq!(id.as_bytes(), &bytes);

        // Wrong length should fail
        assert!(TxId::from_slice(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_random_is_deterministic_per_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(TxId::random(&mut a), TxId::random(&mut b));

        let mut c = StdRng::seed_from_u64(8);
        assert_ne!(TxId::random(&mut a), TxId::random(&mut c));
    }

    #[test]
    fn test_string_roundtrip() {
        let id = TxId::from_bytes([42u8; 32]);
        let s = id.to_string();
        let parsed: TxId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_hex() {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&[0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0]);
        let id = TxId::from_bytes(bytes);
        assert!(id.to_hex().starts_with("123456789abcdef0"));
    }

    #[test]
    fn test_ordering() {
        let id1 = TxId::from_bytes([0u8; 32]);
        let id2 = TxId::from_bytes([1u8; 32]);
        assert!(id1 < id2);
    }

    #[test]
    fn test_json_serialization() {
        let id = TxId::from_bytes([42u8; 32]);
        let json = serde_json::to_string(&id).unwrap();
        let parsed: TxId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
