use crate::foundation::util::encoding::parse_hex_fixed;
use crate::foundation::RegsyncError;
use alloy::primitives::{Bytes, B256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const BLS_PUBLIC_KEY_SIZE: usize = 48;
pub const BLS_SIGNATURE_SIZE: usize = 96;

macro_rules! define_fixed_bytes_type {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
        pub struct $name([u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            pub const fn new(value: [u8; $len]) -> Self {
                Self(value)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn to_bytes(&self) -> Bytes {
                Bytes::copy_from_slice(&self.0)
            }

            pub fn from_slice(bytes: &[u8]) -> Result<Self, RegsyncError> {
                let value: [u8; $len] = bytes.try_into().map_err(|_| RegsyncError::EncodingError(format!(
                    "{} expects {} bytes, got {}",
                    stringify!($name),
                    $len,
                    bytes.len()
                )))?;
                Ok(Self(value))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self([0u8; $len])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = RegsyncError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(parse_hex_fixed::<$len>(s)?))
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(value: [u8; $len]) -> Self {
                Self(value)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::from_str(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_fixed_bytes_type!(
    /// Validator BLS public key; the reconciliation key across both authorities.
    BlsPublicKey,
    BLS_PUBLIC_KEY_SIZE
);

define_fixed_bytes_type!(
    /// BLS signature over a validator registration message.
    BlsSignature,
    BLS_SIGNATURE_SIZE
);

/// Representative-scoped ECDSA signature in the `(v, r, s)` layout the delegation ledger expects.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct EcdsaSignature {
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl EcdsaSignature {
    pub fn new(v: u8, r: B256, s: B256) -> Self {
        Self { v, r, s }
    }

    /// Build from a 65-byte `r || s || v` blob. Accepts `v` as 0/1 or 27/28.
    pub fn from_rsv_bytes(bytes: &[u8]) -> Result<Self, RegsyncError> {
        if bytes.len() != 65 {
            return Err(RegsyncError::EncodingError(format!("ecdsa signature expects 65 bytes, got {}", bytes.len())));
        }
        let r = B256::from_slice(&bytes[..32]);
        let s = B256::from_slice(&bytes[32..64]);
        let v = match bytes[64] {
            0 | 1 => bytes[64] + 27,
            other => other,
        };
        Ok(Self { v, r, s })
    }
}
