use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::base58::{decode_versioned, encode_versioned, VERSION_ACCOUNT};
use crate::crypto::account_digest;
use crate::error::{Error, Result};

/// A 20-byte account identifier, derived from a public key by hashing
/// (SHA-256 then RIPEMD-160). Equality and ordering are byte-exact;
/// the byte ordering is what multi-signer lists are sorted by.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 20]);

impl AccountId {
    pub const LEN: usize = 20;

    pub fn from_bytes(bytes: &[u8]) -> Result<AccountId> {
        if bytes.len() != 20 {
            return Err(Error::ValueRange(format!(
                "account id expects 20 bytes, got {}",
                bytes.len()
            )));
        }
        let mut buf = [0u8; 20];
        buf.copy_from_slice(bytes);
        Ok(AccountId(buf))
    }

    /// Derive the account id of a public key (33-byte compressed
    /// secp256k1 or 0xED-prefixed ed25519, both hash the same way).
    pub fn from_public_key(public_key: &[u8]) -> AccountId {
        AccountId(account_digest(public_key))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The canonical base58 text form (`r...`).
    pub fn to_address(&self) -> String {
        encode_versioned(VERSION_ACCOUNT, &self.0)
    }

    pub fn from_address(address: &str) -> Result<AccountId> {
        let payload = decode_versioned(VERSION_ACCOUNT, address)?;
        AccountId::from_bytes(&payload)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_address())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_address())
    }
}

impl FromStr for AccountId {
    type Err = Error;

    fn from_str(s: &str) -> Result<AccountId> {
        AccountId::from_address(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_roundtrip() {
        let account = AccountId([0x5eu8; 20]);
        let address = account.to_address();
        assert!(address.starts_with('r'));
        assert_eq!(AccountId::from_address(&address).unwrap(), account);
    }

    #[test]
    fn known_genesis_address() {
        // account digest of the well-known root public key maps to the
        // network's genesis address
        let pubkey =
            hex::decode("0330E7FC9D56BB25D6893BA3F317AE5BCF33B3291BD63DB32654A313222F7FD020")
                .unwrap();
        let account = AccountId::from_public_key(&pubkey);
        assert_eq!(account.to_address(), "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");
    }

    #[test]
    fn ordering_is_byte_exact() {
        let low = AccountId([0x01u8; 20]);
        let high = AccountId([0xffu8; 20]);
        assert!(low < high);
    }

    #[test]
    fn malformed_addresses_rejected() {
        assert!(AccountId::from_address("not an address").is_err());
        assert!(AccountId::from_address("").is_err());
    }
}
