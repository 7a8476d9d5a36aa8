use ed25519_dalek::{Signer, Verifier};
use rand::RngCore;
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};

use crate::account::AccountId;
use crate::base58::{decode_versioned, encode_versioned, VERSION_SEED};
use crate::crypto::sha512_half;
use crate::error::{Error, Result};

/// The two signature algorithms the network accepts. The key type is
/// recoverable from the public key's leading byte: 0xED flags ed25519,
/// 0x02/0x03 a compressed secp256k1 point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Secp256k1,
    Ed25519,
}

enum KeyMaterial {
    Secp256k1 {
        secret_key: SecretKey,
        public_key: PublicKey,
    },
    Ed25519 {
        signing_key: ed25519_dalek::SigningKey,
    },
}

/// A signing keypair for either supported algorithm.
///
/// secp256k1 signatures are DER-encoded ECDSA over the sha512-half of
/// the pre-image; ed25519 signatures are the raw 64 bytes over the
/// pre-image itself. Both facts are wire-visible and fixed by the
/// network.
pub struct Keypair {
    material: KeyMaterial,
}

impl Keypair {
    /// Generate a random secp256k1 keypair.
    pub fn generate_secp256k1() -> Keypair {
        let mut entropy = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut entropy);
        // fresh entropy always yields a valid scalar within a few scans
        Keypair::from_entropy(&entropy, KeyType::Secp256k1)
            .expect("random entropy produces a valid key")
    }

    /// Generate a random ed25519 keypair.
    pub fn generate_ed25519() -> Keypair {
        let mut entropy = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut entropy);
        Keypair::from_entropy(&entropy, KeyType::Ed25519)
            .expect("random entropy produces a valid key")
    }

    /// Rebuild a keypair from a base58 family seed (`s...`).
    pub fn from_seed(seed: &str, key_type: KeyType) -> Result<Keypair> {
        let entropy = decode_versioned(VERSION_SEED, seed)?;
        if entropy.len() != 16 {
            return Err(Error::Signing(format!(
                "seed carries {} bytes of entropy, expected 16",
                entropy.len()
            )));
        }
        Keypair::from_entropy(&entropy, key_type)
    }

    /// Derive a keypair from 16 bytes of seed entropy.
    ///
    /// secp256k1 follows the network's family derivation: scan for a
    /// valid root scalar, then offset it by an intermediate scalar
    /// bound to the root public key. ed25519 hashes the entropy
    /// directly into the signing key.
    pub fn from_entropy(entropy: &[u8], key_type: KeyType) -> Result<Keypair> {
        if entropy.len() != 16 {
            return Err(Error::Signing(format!(
                "expected 16 bytes of entropy, got {}",
                entropy.len()
            )));
        }
        match key_type {
            KeyType::Secp256k1 => {
                let root_secret = scan_scalar(|sequence| {
                    let mut buf = Vec::with_capacity(20);
                    buf.extend(entropy);
                    buf.extend(&sequence.to_be_bytes());
                    buf
                })?;
                let root_public = PublicKey::from_secret_key(&SECP256K1, &root_secret);

                let intermediate = scan_scalar(|sequence| {
                    let mut buf = Vec::with_capacity(41);
                    buf.extend(&root_public.serialize());
                    buf.extend(&0u32.to_be_bytes());
                    buf.extend(&sequence.to_be_bytes());
                    buf
                })?;

                let mut secret_key = root_secret;
                secret_key
                    .add_assign(&intermediate[..])
                    .map_err(|e| Error::Signing(format!("key derivation: {}", e)))?;
                let public_key = PublicKey::from_secret_key(&SECP256K1, &secret_key);
                Ok(Keypair {
                    material: KeyMaterial::Secp256k1 {
                        secret_key,
                        public_key,
                    },
                })
            }
            KeyType::Ed25519 => {
                let digest = sha512_half(entropy);
                let signing_key = ed25519_dalek::SigningKey::from_bytes(digest.as_bytes());
                Ok(Keypair {
                    material: KeyMaterial::Ed25519 { signing_key },
                })
            }
        }
    }

    /// Rebuild a secp256k1 keypair from a raw 32-byte secret.
    pub fn from_secret_slice(slice: &[u8]) -> Result<Keypair> {
        let secret_key = SecretKey::from_slice(slice)
            .map_err(|e| Error::Signing(format!("secp256k1 secret: {}", e)))?;
        let public_key = PublicKey::from_secret_key(&SECP256K1, &secret_key);
        Ok(Keypair {
            material: KeyMaterial::Secp256k1 {
                secret_key,
                public_key,
            },
        })
    }

    /// Rebuild a secp256k1 keypair from a hex-encoded secret.
    pub fn from_secret_hex(secret_hex: &str) -> Result<Keypair> {
        let bytes = hex::decode(secret_hex)?;
        Keypair::from_secret_slice(&bytes)
    }

    pub fn key_type(&self) -> KeyType {
        match &self.material {
            KeyMaterial::Secp256k1 { .. } => KeyType::Secp256k1,
            KeyMaterial::Ed25519 { .. } => KeyType::Ed25519,
        }
    }

    /// The wire form of the public key: 33 compressed bytes for
    /// secp256k1, 0xED plus 32 bytes for ed25519.
    pub fn public_key_bytes(&self) -> Vec<u8> {
        match &self.material {
            KeyMaterial::Secp256k1 { public_key, .. } => public_key.serialize().to_vec(),
            KeyMaterial::Ed25519 { signing_key } => {
                let mut bytes = vec![0xed];
                bytes.extend(signing_key.verifying_key().as_bytes());
                bytes
            }
        }
    }

    /// The account this keypair controls.
    pub fn account_id(&self) -> AccountId {
        AccountId::from_public_key(&self.public_key_bytes())
    }

    /// Sign a pre-image, returning the wire-form signature bytes.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        match &self.material {
            KeyMaterial::Secp256k1 { secret_key, .. } => {
                let digest = sha512_half(message);
                let msg = Message::from_slice(digest.as_bytes())
                    .map_err(|e| Error::Signing(format!("digest: {}", e)))?;
                let signature = SECP256K1.sign(&msg, secret_key);
                Ok(signature.serialize_der().to_vec())
            }
            KeyMaterial::Ed25519 { signing_key } => {
                Ok(signing_key.sign(message).to_bytes().to_vec())
            }
        }
    }

    /// Verify a signature produced by [`Keypair::sign`] over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match &self.material {
            KeyMaterial::Secp256k1 { public_key, .. } => {
                let digest = sha512_half(message);
                let msg = match Message::from_slice(digest.as_bytes()) {
                    Ok(msg) => msg,
                    Err(_) => return false,
                };
                let sig = match secp256k1::Signature::from_der(signature) {
                    Ok(sig) => sig,
                    Err(_) => return false,
                };
                SECP256K1.verify(&msg, &sig, public_key).is_ok()
            }
            KeyMaterial::Ed25519 { signing_key } => {
                let sig_bytes: [u8; 64] = match signature.try_into() {
                    Ok(bytes) => bytes,
                    Err(_) => return false,
                };
                let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);
                signing_key
                    .verifying_key()
                    .verify(message, &sig)
                    .is_ok()
            }
        }
    }

    /// Encode 16 bytes of entropy as a base58 family seed.
    pub fn encode_seed(entropy: &[u8; 16]) -> String {
        encode_versioned(VERSION_SEED, entropy)
    }
}

/// Verify a wire-form signature given only the wire-form public key.
/// The key's leading byte selects the algorithm; malformed keys or
/// signatures simply fail verification.
pub fn verify_signature(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    match public_key.first() {
        Some(0xed) => {
            let key_bytes: [u8; 32] = match public_key[1..].try_into() {
                Ok(bytes) => bytes,
                Err(_) => return false,
            };
            let verifying_key = match ed25519_dalek::VerifyingKey::from_bytes(&key_bytes) {
                Ok(key) => key,
                Err(_) => return false,
            };
            let sig_bytes: [u8; 64] = match signature.try_into() {
                Ok(bytes) => bytes,
                Err(_) => return false,
            };
            let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);
            verifying_key.verify(message, &sig).is_ok()
        }
        Some(0x02) | Some(0x03) => {
            let public_key = match PublicKey::from_slice(public_key) {
                Ok(key) => key,
                Err(_) => return false,
            };
            let digest = sha512_half(message);
            let msg = match Message::from_slice(digest.as_bytes()) {
                Ok(msg) => msg,
                Err(_) => return false,
            };
            let sig = match secp256k1::Signature::from_der(signature) {
                Ok(sig) => sig,
                Err(_) => return false,
            };
            SECP256K1.verify(&msg, &sig, &public_key).is_ok()
        }
        _ => false,
    }
}

/// Scan hash inputs until one produces a valid curve scalar. The first
/// candidate almost always succeeds; the loop bound only guards against
/// malicious fixed inputs.
fn scan_scalar<F: Fn(u32) -> Vec<u8>>(candidate: F) -> Result<SecretKey> {
    for sequence in 0..128u32 {
        let digest = sha512_half(&candidate(sequence));
        if let Ok(secret) = SecretKey::from_slice(digest.as_bytes()) {
            return Ok(secret);
        }
    }
    Err(Error::Signing(
        "no valid scalar within scan bound".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    // the network's well-known genesis seed
    const GENESIS_SEED: &str = "snoPBrXtMeMyMHUVTgbuqAfg1SUTb";

    #[test]
    fn genesis_seed_derives_known_account() {
        let keypair = Keypair::from_seed(GENESIS_SEED, KeyType::Secp256k1).unwrap();
        assert_eq!(
            hex::encode_upper(keypair.public_key_bytes()),
            "0330E7FC9D56BB25D6893BA3F317AE5BCF33B3291BD63DB32654A313222F7FD020"
        );
        assert_eq!(
            keypair.account_id().to_address(),
            "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"
        );
    }

    #[test]
    fn secp256k1_sign_verify_roundtrip() {
        let keypair = Keypair::generate_secp256k1();
        let signature = keypair.sign(b"exact bytes or nothing").unwrap();
        assert!(keypair.verify(b"exact bytes or nothing", &signature));
        assert!(!keypair.verify(b"different bytes", &signature));
    }

    #[test]
    fn ed25519_sign_verify_roundtrip() {
        let keypair = Keypair::generate_ed25519();
        assert_eq!(keypair.key_type(), KeyType::Ed25519);
        assert_eq!(keypair.public_key_bytes()[0], 0xed);
        assert_eq!(keypair.public_key_bytes().len(), 33);

        let signature = keypair.sign(b"pre-image").unwrap();
        assert_eq!(signature.len(), 64);
        assert!(keypair.verify(b"pre-image", &signature));
        assert!(!keypair.verify(b"pre-imagE", &signature));
    }

    #[test]
    fn seed_text_roundtrip() {
        let entropy = [0x42u8; 16];
        let seed = Keypair::encode_seed(&entropy);
        let a = Keypair::from_seed(&seed, KeyType::Ed25519).unwrap();
        let b = Keypair::from_entropy(&entropy, KeyType::Ed25519).unwrap();
        assert_eq!(a.public_key_bytes(), b.public_key_bytes());
    }

    #[test]
    fn malformed_key_material_reported_up_front() {
        assert!(Keypair::from_secret_hex("").is_err());
        assert!(Keypair::from_secret_hex("zz").is_err());
        assert!(Keypair::from_secret_slice(&[0u8; 32]).is_err());
        assert!(Keypair::from_seed("not a seed", KeyType::Secp256k1).is_err());
    }
}
