//! Text codec for addresses and seeds: the network's base58 alphabet
//! with a leading version byte and a 4-byte double-SHA256 checksum.

use bs58::Alphabet;

use crate::crypto::checksum;
use crate::error::{Error, Result};

/// Version byte for account addresses (the familiar `r...` form).
pub const VERSION_ACCOUNT: u8 = 0x00;
/// Version byte for family seeds (`s...`).
pub const VERSION_SEED: u8 = 0x21;

/// Encode `payload` under `version` with the trailing checksum.
pub fn encode_versioned(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 5);
    data.push(version);
    data.extend_from_slice(payload);
    let check = checksum(&data);
    data.extend_from_slice(&check);
    bs58::encode(data).with_alphabet(Alphabet::RIPPLE).into_string()
}

/// Decode a versioned base58 string, verifying the checksum and the
/// expected version byte. Returns the raw payload.
pub fn decode_versioned(version: u8, text: &str) -> Result<Vec<u8>> {
    let data = bs58::decode(text)
        .with_alphabet(Alphabet::RIPPLE)
        .into_vec()
        .map_err(|e| Error::BadEncoding(format!("base58: {}", e)))?;
    if data.len() < 5 {
        return Err(Error::BadEncoding("base58 payload too short".to_string()));
    }
    let (body, check) = data.split_at(data.len() - 4);
    if checksum(body) != check {
        return Err(Error::BadEncoding("base58 checksum mismatch".to_string()));
    }
    if body[0] != version {
        return Err(Error::BadEncoding(format!(
            "base58 version byte {:#04x}, expected {:#04x}",
            body[0], version
        )));
    }
    Ok(body[1..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_zero_is_the_canonical_null_address() {
        // the 20-byte zero account has a fixed well-known text form
        let addr = encode_versioned(VERSION_ACCOUNT, &[0u8; 20]);
        assert_eq!(addr, "rrrrrrrrrrrrrrrrrrrrrhoLvTp");
        assert_eq!(decode_versioned(VERSION_ACCOUNT, &addr).unwrap(), vec![0u8; 20]);
    }

    #[test]
    fn corrupted_text_is_rejected() {
        let addr = encode_versioned(VERSION_ACCOUNT, &[7u8; 20]);
        let mut chars: Vec<char> = addr.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == 'r' { 'p' } else { 'r' };
        let corrupted: String = chars.into_iter().collect();
        assert!(decode_versioned(VERSION_ACCOUNT, &corrupted).is_err());
    }

    #[test]
    fn version_byte_is_enforced() {
        let seed = encode_versioned(VERSION_SEED, &[1u8; 16]);
        assert!(seed.starts_with('s'));
        assert!(decode_versioned(VERSION_ACCOUNT, &seed).is_err());
        assert_eq!(decode_versioned(VERSION_SEED, &seed).unwrap(), vec![1u8; 16]);
    }
}
