use crate::crypto::sha512_half;
use crate::error::{Error, Result};
use crate::hashes::Hash256;
use crate::keypair::Keypair;
use crate::transaction::{Signer, Transaction};

/// Domain tag prefixed to a single-signature pre-image ("STX\0").
pub const PREFIX_TX_SIGN: [u8; 4] = [0x53, 0x54, 0x58, 0x00];

/// Domain tag prefixed to a multi-signature pre-image ("SMT\0").
pub const PREFIX_TX_MULTISIGN: [u8; 4] = [0x53, 0x4d, 0x54, 0x00];

/// Domain tag prefixed when hashing a signed transaction into its
/// identifier ("TXN\0").
pub const PREFIX_TX_ID: [u8; 4] = [0x54, 0x58, 0x4e, 0x00];

/// The output of a signing pipeline run: the bytes to submit and the
/// identifier the network will know the transaction by.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    pub tx_blob: Vec<u8>,
    pub hash: Hash256,
}

/// The identifier of an already-signed transaction blob.
pub fn transaction_id(tx_blob: &[u8]) -> Hash256 {
    let mut pre_image = Vec::with_capacity(4 + tx_blob.len());
    pre_image.extend(PREFIX_TX_ID);
    pre_image.extend(tx_blob);
    sha512_half(&pre_image)
}

/// Single-signer pipeline. Clears any prior signature state, stamps the
/// signer's public key, signs the tagged pre-image and stores the
/// signature, then produces the final bytes and their identifier. The
/// transaction is left in its signed state.
pub fn sign(tx: &mut Transaction, keypair: &Keypair) -> Result<SignedTransaction> {
    tx.common_mut().clear_signatures();
    tx.common_mut()
        .set_signing_pub_key(keypair.public_key_bytes());

    let mut pre_image = Vec::from(PREFIX_TX_SIGN);
    pre_image.extend(tx.serialize(true)?);
    let signature = keypair.sign(&pre_image)?;
    tx.common_mut().set_txn_signature(signature);

    let tx_blob = tx.serialize(false)?;
    let hash = transaction_id(&tx_blob);
    tracing::debug!(hash = %hash, bytes = tx_blob.len(), "transaction signed");
    Ok(SignedTransaction { tx_blob, hash })
}

/// Multi-signer pipeline. Each signer signs its own pre-image: the
/// multi-sign tag, the shared signing body, then that signer's account
/// bytes. The top-level SigningPubKey is present but empty, and the
/// collected signers are ordered by ascending account bytes so every
/// participant assembles the same final blob.
pub fn sign_multi(tx: &mut Transaction, keypairs: &[&Keypair]) -> Result<SignedTransaction> {
    if keypairs.is_empty() {
        return Err(Error::Signing("no signers supplied".to_string()));
    }

    tx.common_mut().clear_signatures();
    tx.common_mut().set_signing_pub_key(vec![]);
    let body = tx.serialize(true)?;

    let mut signers = Vec::with_capacity(keypairs.len());
    for keypair in keypairs {
        let account = keypair.account_id();
        let mut pre_image =
            Vec::with_capacity(4 + body.len() + account.as_bytes().len());
        pre_image.extend(PREFIX_TX_MULTISIGN);
        pre_image.extend(&body);
        pre_image.extend(account.as_bytes());
        signers.push(Signer {
            account,
            signing_pub_key: keypair.public_key_bytes(),
            txn_signature: keypair.sign(&pre_image)?,
        });
    }

    signers.sort_by(|a, b| a.account.cmp(&b.account));
    if signers.windows(2).any(|w| w[0].account == w[1].account) {
        return Err(Error::Signing(
            "duplicate signer account".to_string(),
        ));
    }
    tx.common_mut().set_signers(signers);

    let tx_blob = tx.serialize(false)?;
    let hash = transaction_id(&tx_blob);
    tracing::debug!(hash = %hash, signers = keypairs.len(), "transaction multi-signed");
    Ok(SignedTransaction { tx_blob, hash })
}

/// Check a single signature against the transaction's stored signing
/// public key. Multi-signed transactions are checked per [`Signer`]
/// entry with [`verify_signer`].
pub fn verify(tx: &Transaction) -> Result<bool> {
    let public_key = tx
        .common()
        .signing_pub_key()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| Error::Signing("no signing public key".to_string()))?;
    let signature = tx
        .common()
        .txn_signature()
        .ok_or_else(|| Error::Signing("no signature to verify".to_string()))?;

    let mut pre_image = Vec::from(PREFIX_TX_SIGN);
    pre_image.extend(tx.serialize(true)?);
    Ok(verify_bytes(public_key, &pre_image, signature))
}

/// Check one collected multi-signature.
pub fn verify_signer(tx: &Transaction, signer: &Signer) -> Result<bool> {
    let mut pre_image = Vec::from(PREFIX_TX_MULTISIGN);
    pre_image.extend(tx.serialize(true)?);
    pre_image.extend(signer.account.as_bytes());
    Ok(verify_bytes(
        &signer.signing_pub_key,
        &pre_image,
        &signer.txn_signature,
    ))
}

fn verify_bytes(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    crate::keypair::verify_signature(public_key, message, signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountId;
    use crate::amount::Amount;

    fn unsigned_payment(keypair: &Keypair) -> Transaction {
        let mut tx = Transaction::payment(
            keypair.account_id(),
            AccountId([0x77u8; 20]),
            Amount::drops(2_000_000).unwrap(),
        );
        tx.common_mut().set_fee(Amount::drops(12).unwrap());
        tx.common_mut().set_sequence(5);
        tx
    }

    #[test]
    fn single_sign_produces_verifiable_blob() {
        let keypair = Keypair::generate_secp256k1();
        let mut tx = unsigned_payment(&keypair);
        let signed = sign(&mut tx, &keypair).unwrap();

        assert_eq!(
            tx.common().signing_pub_key().unwrap(),
            &keypair.public_key_bytes()[..]
        );
        assert!(verify(&tx).unwrap());
        assert_eq!(tx.hash().unwrap(), signed.hash);
        assert_eq!(tx.serialize(false).unwrap(), signed.tx_blob);
    }

    #[test]
    fn ed25519_single_sign_verifies() {
        let keypair = Keypair::generate_ed25519();
        let mut tx = unsigned_payment(&keypair);
        sign(&mut tx, &keypair).unwrap();
        assert!(verify(&tx).unwrap());
    }

    #[test]
    fn signature_is_excluded_from_its_own_pre_image() {
        let keypair = Keypair::generate_secp256k1();
        let mut tx = unsigned_payment(&keypair);
        let before = {
            let mut t = tx.clone();
            t.common_mut().set_signing_pub_key(keypair.public_key_bytes());
            t.serialize(true).unwrap()
        };
        sign(&mut tx, &keypair).unwrap();
        // the pre-image is unchanged by the stored signature
        assert_eq!(tx.serialize(true).unwrap(), before);
    }

    #[test]
    fn resigning_replaces_previous_signature() {
        let first = Keypair::generate_secp256k1();
        let second = Keypair::generate_secp256k1();
        let mut tx = unsigned_payment(&first);
        sign(&mut tx, &first).unwrap();
        sign(&mut tx, &second).unwrap();
        assert_eq!(
            tx.common().signing_pub_key().unwrap(),
            &second.public_key_bytes()[..]
        );
        assert!(verify(&tx).unwrap());
    }

    #[test]
    fn multi_sign_orders_signers_by_account_bytes() {
        let keypairs: Vec<Keypair> =
            (0..4).map(|_| Keypair::generate_secp256k1()).collect();
        let refs: Vec<&Keypair> = keypairs.iter().collect();

        let mut tx = unsigned_payment(&keypairs[0]);
        sign_multi(&mut tx, &refs).unwrap();

        let accounts: Vec<AccountId> =
            tx.common().signers().iter().map(|s| s.account).collect();
        let mut sorted = accounts.clone();
        sorted.sort();
        assert_eq!(accounts, sorted);

        assert_eq!(tx.common().signing_pub_key().unwrap(), &[] as &[u8]);
        for signer in tx.common().signers() {
            assert!(verify_signer(&tx, signer).unwrap());
        }
    }

    #[test]
    fn multi_sign_assembly_is_order_independent() {
        let a = Keypair::generate_secp256k1();
        let b = Keypair::generate_ed25519();

        let template = unsigned_payment(&a);
        let mut forward = template.clone();
        let mut reversed = template;
        let blob_fwd = sign_multi(&mut forward, &[&a, &b]).unwrap();
        let blob_rev = sign_multi(&mut reversed, &[&b, &a]).unwrap();
        assert_eq!(blob_fwd, blob_rev);
    }

    #[test]
    fn duplicate_signers_rejected() {
        let keypair = Keypair::generate_secp256k1();
        let mut tx = unsigned_payment(&keypair);
        assert!(sign_multi(&mut tx, &[&keypair, &keypair]).is_err());
    }

    #[test]
    fn identifier_is_tag_plus_blob() {
        let keypair = Keypair::generate_secp256k1();
        let mut tx = unsigned_payment(&keypair);
        let signed = sign(&mut tx, &keypair).unwrap();

        let mut pre_image = Vec::from(PREFIX_TX_ID);
        pre_image.extend(&signed.tx_blob);
        assert_eq!(signed.hash, sha512_half(&pre_image));
    }

    #[test]
    fn tampered_blob_fails_verification() {
        let keypair = Keypair::generate_secp256k1();
        let mut tx = unsigned_payment(&keypair);
        sign(&mut tx, &keypair).unwrap();

        tx.common_mut().set_sequence(6);
        assert!(!verify(&tx).unwrap());
    }
}
