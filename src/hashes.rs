use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

macro_rules! fixed_hash {
    ($name:ident, $len:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            pub fn from_bytes(bytes: &[u8]) -> Result<$name> {
                if bytes.len() != $len {
                    return Err(Error::ValueRange(format!(
                        "{} expects {} bytes, got {}",
                        stringify!($name),
                        $len,
                        bytes.len()
                    )));
                }
                let mut buf = [0u8; $len];
                buf.copy_from_slice(bytes);
                Ok($name(buf))
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }
        }

        impl fmt::Display for $name {
            /// uppercase hex, the canonical text form
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode_upper(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<$name> {
                let bytes = hex::decode(s)?;
                $name::from_bytes(&bytes)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> $name {
                $name(bytes)
            }
        }
    };
}

fixed_hash!(Hash128, 16, "A 128-bit opaque identifier (e.g. EmailHash).");
fixed_hash!(Hash160, 20, "A 160-bit value: currency codes and order-book keys.");
fixed_hash!(
    Hash256,
    32,
    "A 256-bit identifier: ledger indexes, transaction hashes, channel ids."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash256_hex_roundtrip() {
        let text = "E3FE6EA3D48F0C2B639448020EA4F03D4F4F8FFDB243A852A0F59177921B4879";
        let hash: Hash256 = text.parse().unwrap();
        assert_eq!(hash.to_string(), text);
    }

    #[test]
    fn wrong_length_rejected() {
        assert!(Hash128::from_bytes(&[0u8; 20]).is_err());
        assert!(Hash256::from_bytes(&[0u8; 31]).is_err());
        assert!("ABCD".parse::<Hash160>().is_err());
    }

    #[test]
    fn zero_detection() {
        assert!(Hash256::from([0u8; 32]).is_zero());
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        assert!(!Hash256::from(bytes).is_zero());
    }
}
