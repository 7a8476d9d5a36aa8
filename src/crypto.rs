use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

use crate::hashes::Hash256;

/// The protocol's "half hash": SHA-512 truncated to its first 256 bits.
/// Used for every identifier in the system (ledger indexes, transaction
/// hashes, key derivation).
pub fn sha512_half(data: &[u8]) -> Hash256 {
    let digest = Sha512::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..32]);
    Hash256(out)
}

/// SHA-256 then RIPEMD-160, producing the 20-byte account digest of a
/// public key.
pub fn account_digest(public_key: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(public_key);
    let ripe = Ripemd160::digest(sha);
    let mut out = [0u8; 20];
    out.copy_from_slice(&ripe);
    out
}

/// First four bytes of double SHA-256, appended to every base58 text
/// form as a checksum.
pub fn checksum(data: &[u8]) -> [u8; 4] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; 4];
    out.copy_from_slice(&second[..4]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha512_half_is_deterministic() {
        let a = sha512_half(b"canonical bytes");
        let b = sha512_half(b"canonical bytes");
        assert_eq!(a, b);
        assert_ne!(a, sha512_half(b"canonical byteZ"));
    }

    #[test]
    fn sha512_half_known_vector() {
        // SHA-512("") truncated to 32 bytes
        assert_eq!(
            sha512_half(b"").to_string(),
            "CF83E1357EEFB8BDF1542850D66D8007D620E4050B5715DC83F4A921D36CE9CE"
        );
    }

    #[test]
    fn account_digest_is_20_bytes_and_stable() {
        let key = [0x02u8; 33];
        assert_eq!(account_digest(&key), account_digest(&key));
        assert_ne!(account_digest(&key), account_digest(&[0x03u8; 33]));
    }

    #[test]
    fn checksum_known_vector() {
        // double-SHA256("") starts with 5df6e0e2
        assert_eq!(checksum(b""), [0x5d, 0xf6, 0xe0, 0xe2]);
    }
}
