use std::collections::HashMap;

use serde_json::{json, Value};

use crate::account::AccountId;
use crate::amount::Amount;
use crate::error::{Error, Result};
use crate::hashes::{Hash128, Hash256};
use crate::keypair::Keypair;
use crate::pathset::{PathSet, PathStep};
use crate::reader::CanonicalReader;
use crate::registry::FIELD_REGISTRY;
use crate::signing::{self, SignedTransaction};
use crate::value::{FieldValue, StObject};
use crate::writer::CanonicalWriter;

/// One memo attached to a transaction. All three parts are free-form
/// bytes; the network carries them opaquely.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Memo {
    pub memo_type: Option<Vec<u8>>,
    pub memo_data: Option<Vec<u8>>,
    pub memo_format: Option<Vec<u8>>,
}

/// A (account, weight) entry of a signer list.
#[derive(Debug, Clone, PartialEq)]
pub struct SignerEntry {
    pub account: AccountId,
    pub weight: u16,
}

/// One collected multi-signature: who signed, with which key, and the
/// signature bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Signer {
    pub account: AccountId,
    pub signing_pub_key: Vec<u8>,
    pub txn_signature: Vec<u8>,
}

/// Fields shared by every transaction kind.
#[derive(Debug, Clone, PartialEq)]
pub struct TxCommon {
    account: AccountId,
    fee: Option<Amount>,
    sequence: Option<u32>,
    flags: Option<u32>,
    source_tag: Option<u32>,
    last_ledger_sequence: Option<u32>,
    account_txn_id: Option<Hash256>,
    ticket_sequence: Option<u32>,
    memos: Vec<Memo>,
    signing_pub_key: Option<Vec<u8>>,
    txn_signature: Option<Vec<u8>>,
    signers: Vec<Signer>,
}

impl TxCommon {
    pub fn new(account: AccountId) -> TxCommon {
        TxCommon {
            account,
            fee: None,
            sequence: None,
            flags: None,
            source_tag: None,
            last_ledger_sequence: None,
            account_txn_id: None,
            ticket_sequence: None,
            memos: vec![],
            signing_pub_key: None,
            txn_signature: None,
            signers: vec![],
        }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn fee(&self) -> Option<&Amount> {
        self.fee.as_ref()
    }

    pub fn sequence(&self) -> Option<u32> {
        self.sequence
    }

    pub fn signing_pub_key(&self) -> Option<&[u8]> {
        self.signing_pub_key.as_deref()
    }

    pub fn txn_signature(&self) -> Option<&[u8]> {
        self.txn_signature.as_deref()
    }

    pub fn signers(&self) -> &[Signer] {
        &self.signers
    }

    pub fn set_fee(&mut self, fee: Amount) {
        self.fee = Some(fee);
    }

    pub fn set_sequence(&mut self, sequence: u32) {
        self.sequence = Some(sequence);
    }

    pub fn set_flags(&mut self, flags: u32) {
        self.flags = Some(flags);
    }

    pub fn set_source_tag(&mut self, tag: u32) {
        self.source_tag = Some(tag);
    }

    pub fn set_last_ledger_sequence(&mut self, sequence: u32) {
        self.last_ledger_sequence = Some(sequence);
    }

    pub fn set_ticket_sequence(&mut self, sequence: u32) {
        self.ticket_sequence = Some(sequence);
    }

    pub fn add_memo(&mut self, memo: Memo) {
        self.memos.push(memo);
    }

    pub fn set_signing_pub_key(&mut self, key: Vec<u8>) {
        self.signing_pub_key = Some(key);
    }

    pub fn set_txn_signature(&mut self, signature: Vec<u8>) {
        self.txn_signature = Some(signature);
    }

    pub fn set_signers(&mut self, signers: Vec<Signer>) {
        self.signers = signers;
    }

    /// Drop any signature state before re-signing.
    pub fn clear_signatures(&mut self) {
        self.signing_pub_key = None;
        self.txn_signature = None;
        self.signers.clear();
    }
}

/// Variant payloads, one per operation kind. A closed set: the network
/// only ever adds kinds through schema updates, never removes them.
#[derive(Debug, Clone, PartialEq)]
pub enum TxKind {
    Payment {
        destination: AccountId,
        amount: Amount,
        destination_tag: Option<u32>,
        invoice_id: Option<Hash256>,
        send_max: Option<Amount>,
        deliver_min: Option<Amount>,
        paths: Option<PathSet>,
    },
    TrustSet {
        limit_amount: Amount,
        quality_in: Option<u32>,
        quality_out: Option<u32>,
    },
    AccountSet {
        set_flag: Option<u32>,
        clear_flag: Option<u32>,
        domain: Option<Vec<u8>>,
        email_hash: Option<Hash128>,
        message_key: Option<Vec<u8>>,
        transfer_rate: Option<u32>,
        tick_size: Option<u8>,
    },
    AccountDelete {
        destination: AccountId,
        destination_tag: Option<u32>,
    },
    OfferCreate {
        taker_gets: Amount,
        taker_pays: Amount,
        expiration: Option<u32>,
        offer_sequence: Option<u32>,
    },
    OfferCancel {
        offer_sequence: u32,
    },
    EscrowCreate {
        amount: Amount,
        destination: AccountId,
        destination_tag: Option<u32>,
        cancel_after: Option<u32>,
        finish_after: Option<u32>,
        condition: Option<Vec<u8>>,
    },
    EscrowFinish {
        owner: AccountId,
        offer_sequence: u32,
        condition: Option<Vec<u8>>,
        fulfillment: Option<Vec<u8>>,
    },
    EscrowCancel {
        owner: AccountId,
        offer_sequence: u32,
    },
    PaymentChannelCreate {
        amount: Amount,
        destination: AccountId,
        settle_delay: u32,
        public_key: Vec<u8>,
        cancel_after: Option<u32>,
        destination_tag: Option<u32>,
    },
    PaymentChannelFund {
        channel: Hash256,
        amount: Amount,
        expiration: Option<u32>,
    },
    PaymentChannelClaim {
        channel: Hash256,
        balance: Option<Amount>,
        amount: Option<Amount>,
        signature: Option<Vec<u8>>,
        public_key: Option<Vec<u8>>,
    },
    CheckCreate {
        destination: AccountId,
        send_max: Amount,
        destination_tag: Option<u32>,
        expiration: Option<u32>,
        invoice_id: Option<Hash256>,
    },
    CheckCash {
        check_id: Hash256,
        amount: Option<Amount>,
        deliver_min: Option<Amount>,
    },
    CheckCancel {
        check_id: Hash256,
    },
    SignerListSet {
        signer_quorum: u32,
        signer_entries: Vec<SignerEntry>,
    },
    SetRegularKey {
        regular_key: Option<AccountId>,
    },
    TicketCreate {
        ticket_count: u32,
    },
    DepositPreauth {
        authorize: Option<AccountId>,
        unauthorize: Option<AccountId>,
    },
}

impl TxKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            TxKind::Payment { .. } => "Payment",
            TxKind::TrustSet { .. } => "TrustSet",
            TxKind::AccountSet { .. } => "AccountSet",
            TxKind::AccountDelete { .. } => "AccountDelete",
            TxKind::OfferCreate { .. } => "OfferCreate",
            TxKind::OfferCancel { .. } => "OfferCancel",
            TxKind::EscrowCreate { .. } => "EscrowCreate",
            TxKind::EscrowFinish { .. } => "EscrowFinish",
            TxKind::EscrowCancel { .. } => "EscrowCancel",
            TxKind::PaymentChannelCreate { .. } => "PaymentChannelCreate",
            TxKind::PaymentChannelFund { .. } => "PaymentChannelFund",
            TxKind::PaymentChannelClaim { .. } => "PaymentChannelClaim",
            TxKind::CheckCreate { .. } => "CheckCreate",
            TxKind::CheckCash { .. } => "CheckCash",
            TxKind::CheckCancel { .. } => "CheckCancel",
            TxKind::SignerListSet { .. } => "SignerListSet",
            TxKind::SetRegularKey { .. } => "SetRegularKey",
            TxKind::TicketCreate { .. } => "TicketCreate",
            TxKind::DepositPreauth { .. } => "DepositPreauth",
        }
    }

    pub fn type_code(&self) -> u16 {
        FIELD_REGISTRY
            .transaction_type_code(self.type_name())
            .expect("every kind is in the embedded schema")
    }
}

/// A transaction: common fields plus the operation-specific payload.
///
/// Lifecycle: construct (or parse), populate, serialize for signing,
/// sign, serialize for transmission, hash. Serialization with a
/// mandatory field missing is an invariant violation surfaced as an
/// error immediately, never a silently short buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    common: TxCommon,
    kind: TxKind,
}

impl Transaction {
    pub fn new(account: AccountId, kind: TxKind) -> Transaction {
        Transaction {
            common: TxCommon::new(account),
            kind,
        }
    }

    /// Convenience constructor for the most common kind.
    pub fn payment(account: AccountId, destination: AccountId, amount: Amount) -> Transaction {
        Transaction::new(
            account,
            TxKind::Payment {
                destination,
                amount,
                destination_tag: None,
                invoice_id: None,
                send_max: None,
                deliver_min: None,
                paths: None,
            },
        )
    }

    pub fn common(&self) -> &TxCommon {
        &self.common
    }

    pub fn common_mut(&mut self) -> &mut TxCommon {
        &mut self.common
    }

    pub fn kind(&self) -> &TxKind {
        &self.kind
    }

    /// Serialize to canonical bytes. With `for_signing` set, the
    /// signature-bearing fields are excluded, producing the signing
    /// pre-image body.
    pub fn serialize(&self, for_signing: bool) -> Result<Vec<u8>> {
        let object = self.to_object()?;
        let mut writer = CanonicalWriter::new();
        for (name, value) in object.fields() {
            writer.push(name, value.clone())?;
        }
        writer.finish(for_signing)
    }

    /// Parse a transaction from its canonical byte form.
    pub fn deserialize(bytes: &[u8]) -> Result<Transaction> {
        let object = CanonicalReader::new(bytes).read_all()?;
        Transaction::from_object(&object)
    }

    /// The transaction identifier: sha512-half over the final signed
    /// bytes behind the transaction-ID domain tag.
    pub fn hash(&self) -> Result<Hash256> {
        if self.common.txn_signature.is_none() && self.common.signers.is_empty() {
            return Err(Error::Signing(
                "unsigned transaction has no identifier".to_string(),
            ));
        }
        Ok(signing::transaction_id(&self.serialize(false)?))
    }

    /// Single-signer signing pipeline; see [`signing::sign`].
    pub fn sign(&mut self, keypair: &Keypair) -> Result<SignedTransaction> {
        signing::sign(self, keypair)
    }

    /// Multi-signer signing pipeline; see [`signing::sign_multi`].
    pub fn sign_multi(&mut self, keypairs: &[&Keypair]) -> Result<SignedTransaction> {
        signing::sign_multi(self, keypairs)
    }

    fn require<T: Clone>(
        &self,
        field: &'static str,
        value: &Option<T>,
    ) -> Result<T> {
        value.clone().ok_or(Error::MissingField {
            object: self.kind.type_name(),
            field,
        })
    }

    /// Flatten into the generic field set the writer consumes.
    pub fn to_object(&self) -> Result<StObject> {
        let mut object = StObject::new();
        let common = &self.common;

        object.set("TransactionType", FieldValue::UInt16(self.kind.type_code()))?;
        object.set("Account", FieldValue::Account(common.account))?;
        object.set(
            "Fee",
            FieldValue::Amount(self.require("Fee", &common.fee)?),
        )?;
        object.set(
            "Sequence",
            FieldValue::UInt32(self.require("Sequence", &common.sequence)?),
        )?;
        if let Some(flags) = common.flags {
            object.set("Flags", FieldValue::UInt32(flags))?;
        }
        if let Some(tag) = common.source_tag {
            object.set("SourceTag", FieldValue::UInt32(tag))?;
        }
        if let Some(sequence) = common.last_ledger_sequence {
            object.set("LastLedgerSequence", FieldValue::UInt32(sequence))?;
        }
        if let Some(hash) = common.account_txn_id {
            object.set("AccountTxnID", FieldValue::Hash256(hash))?;
        }
        if let Some(sequence) = common.ticket_sequence {
            object.set("TicketSequence", FieldValue::UInt32(sequence))?;
        }
        if !common.memos.is_empty() {
            let mut elements = vec![];
            for memo in &common.memos {
                let mut inner = StObject::new();
                if let Some(memo_type) = &memo.memo_type {
                    inner.set("MemoType", FieldValue::Blob(memo_type.clone()))?;
                }
                if let Some(memo_data) = &memo.memo_data {
                    inner.set("MemoData", FieldValue::Blob(memo_data.clone()))?;
                }
                if let Some(memo_format) = &memo.memo_format {
                    inner.set("MemoFormat", FieldValue::Blob(memo_format.clone()))?;
                }
                elements.push(("Memo".to_string(), inner));
            }
            object.set("Memos", FieldValue::Array(elements))?;
        }
        if let Some(key) = &common.signing_pub_key {
            object.set("SigningPubKey", FieldValue::Blob(key.clone()))?;
        }
        if let Some(signature) = &common.txn_signature {
            object.set("TxnSignature", FieldValue::Blob(signature.clone()))?;
        }
        if !common.signers.is_empty() {
            let mut elements = vec![];
            for signer in &common.signers {
                let mut inner = StObject::new();
                inner.set("Account", FieldValue::Account(signer.account))?;
                inner.set(
                    "SigningPubKey",
                    FieldValue::Blob(signer.signing_pub_key.clone()),
                )?;
                inner.set(
                    "TxnSignature",
                    FieldValue::Blob(signer.txn_signature.clone()),
                )?;
                elements.push(("Signer".to_string(), inner));
            }
            object.set("Signers", FieldValue::Array(elements))?;
        }

        self.kind_fields(&mut object)?;
        Ok(object)
    }

    fn kind_fields(&self, object: &mut StObject) -> Result<()> {
        match &self.kind {
            TxKind::Payment {
                destination,
                amount,
                destination_tag,
                invoice_id,
                send_max,
                deliver_min,
                paths,
            } => {
                object.set("Destination", FieldValue::Account(*destination))?;
                object.set("Amount", FieldValue::Amount(amount.clone()))?;
                if let Some(tag) = destination_tag {
                    object.set("DestinationTag", FieldValue::UInt32(*tag))?;
                }
                if let Some(invoice) = invoice_id {
                    object.set("InvoiceID", FieldValue::Hash256(*invoice))?;
                }
                if let Some(send_max) = send_max {
                    object.set("SendMax", FieldValue::Amount(send_max.clone()))?;
                }
                if let Some(deliver_min) = deliver_min {
                    object.set("DeliverMin", FieldValue::Amount(deliver_min.clone()))?;
                }
                if let Some(paths) = paths {
                    object.set("Paths", FieldValue::PathSet(paths.clone()))?;
                }
            }
            TxKind::TrustSet {
                limit_amount,
                quality_in,
                quality_out,
            } => {
                object.set("LimitAmount", FieldValue::Amount(limit_amount.clone()))?;
                if let Some(quality) = quality_in {
                    object.set("QualityIn", FieldValue::UInt32(*quality))?;
                }
                if let Some(quality) = quality_out {
                    object.set("QualityOut", FieldValue::UInt32(*quality))?;
                }
            }
            TxKind::AccountSet {
                set_flag,
                clear_flag,
                domain,
                email_hash,
                message_key,
                transfer_rate,
                tick_size,
            } => {
                if let Some(flag) = set_flag {
                    object.set("SetFlag", FieldValue::UInt32(*flag))?;
                }
                if let Some(flag) = clear_flag {
                    object.set("ClearFlag", FieldValue::UInt32(*flag))?;
                }
                if let Some(domain) = domain {
                    object.set("Domain", FieldValue::Blob(domain.clone()))?;
                }
                if let Some(hash) = email_hash {
                    object.set("EmailHash", FieldValue::Hash128(*hash))?;
                }
                if let Some(key) = message_key {
                    object.set("MessageKey", FieldValue::Blob(key.clone()))?;
                }
                if let Some(rate) = transfer_rate {
                    object.set("TransferRate", FieldValue::UInt32(*rate))?;
                }
                if let Some(size) = tick_size {
                    object.set("TickSize", FieldValue::UInt8(*size))?;
                }
            }
            TxKind::AccountDelete {
                destination,
                destination_tag,
            } => {
                object.set("Destination", FieldValue::Account(*destination))?;
                if let Some(tag) = destination_tag {
                    object.set("DestinationTag", FieldValue::UInt32(*tag))?;
                }
            }
            TxKind::OfferCreate {
                taker_gets,
                taker_pays,
                expiration,
                offer_sequence,
            } => {
                object.set("TakerGets", FieldValue::Amount(taker_gets.clone()))?;
                object.set("TakerPays", FieldValue::Amount(taker_pays.clone()))?;
                if let Some(expiration) = expiration {
                    object.set("Expiration", FieldValue::UInt32(*expiration))?;
                }
                if let Some(sequence) = offer_sequence {
                    object.set("OfferSequence", FieldValue::UInt32(*sequence))?;
                }
            }
            TxKind::OfferCancel { offer_sequence } => {
                object.set("OfferSequence", FieldValue::UInt32(*offer_sequence))?;
            }
            TxKind::EscrowCreate {
                amount,
                destination,
                destination_tag,
                cancel_after,
                finish_after,
                condition,
            } => {
                object.set("Amount", FieldValue::Amount(amount.clone()))?;
                object.set("Destination", FieldValue::Account(*destination))?;
                if let Some(tag) = destination_tag {
                    object.set("DestinationTag", FieldValue::UInt32(*tag))?;
                }
                if let Some(time) = cancel_after {
                    object.set("CancelAfter", FieldValue::UInt32(*time))?;
                }
                if let Some(time) = finish_after {
                    object.set("FinishAfter", FieldValue::UInt32(*time))?;
                }
                if let Some(condition) = condition {
                    object.set("Condition", FieldValue::Blob(condition.clone()))?;
                }
            }
            TxKind::EscrowFinish {
                owner,
                offer_sequence,
                condition,
                fulfillment,
            } => {
                object.set("Owner", FieldValue::Account(*owner))?;
                object.set("OfferSequence", FieldValue::UInt32(*offer_sequence))?;
                if let Some(condition) = condition {
                    object.set("Condition", FieldValue::Blob(condition.clone()))?;
                }
                if let Some(fulfillment) = fulfillment {
                    object.set("Fulfillment", FieldValue::Blob(fulfillment.clone()))?;
                }
            }
            TxKind::EscrowCancel {
                owner,
                offer_sequence,
            } => {
                object.set("Owner", FieldValue::Account(*owner))?;
                object.set("OfferSequence", FieldValue::UInt32(*offer_sequence))?;
            }
            TxKind::PaymentChannelCreate {
                amount,
                destination,
                settle_delay,
                public_key,
                cancel_after,
                destination_tag,
            } => {
                object.set("Amount", FieldValue::Amount(amount.clone()))?;
                object.set("Destination", FieldValue::Account(*destination))?;
                object.set("SettleDelay", FieldValue::UInt32(*settle_delay))?;
                object.set("PublicKey", FieldValue::Blob(public_key.clone()))?;
                if let Some(time) = cancel_after {
                    object.set("CancelAfter", FieldValue::UInt32(*time))?;
                }
                if let Some(tag) = destination_tag {
                    object.set("DestinationTag", FieldValue::UInt32(*tag))?;
                }
            }
            TxKind::PaymentChannelFund {
                channel,
                amount,
                expiration,
            } => {
                object.set("Channel", FieldValue::Hash256(*channel))?;
                object.set("Amount", FieldValue::Amount(amount.clone()))?;
                if let Some(expiration) = expiration {
                    object.set("Expiration", FieldValue::UInt32(*expiration))?;
                }
            }
            TxKind::PaymentChannelClaim {
                channel,
                balance,
                amount,
                signature,
                public_key,
            } => {
                object.set("Channel", FieldValue::Hash256(*channel))?;
                if let Some(balance) = balance {
                    object.set("Balance", FieldValue::Amount(balance.clone()))?;
                }
                if let Some(amount) = amount {
                    object.set("Amount", FieldValue::Amount(amount.clone()))?;
                }
                if let Some(signature) = signature {
                    object.set("Signature", FieldValue::Blob(signature.clone()))?;
                }
                if let Some(key) = public_key {
                    object.set("PublicKey", FieldValue::Blob(key.clone()))?;
                }
            }
            TxKind::CheckCreate {
                destination,
                send_max,
                destination_tag,
                expiration,
                invoice_id,
            } => {
                object.set("Destination", FieldValue::Account(*destination))?;
                object.set("SendMax", FieldValue::Amount(send_max.clone()))?;
                if let Some(tag) = destination_tag {
                    object.set("DestinationTag", FieldValue::UInt32(*tag))?;
                }
                if let Some(expiration) = expiration {
                    object.set("Expiration", FieldValue::UInt32(*expiration))?;
                }
                if let Some(invoice) = invoice_id {
                    object.set("InvoiceID", FieldValue::Hash256(*invoice))?;
                }
            }
            TxKind::CheckCash {
                check_id,
                amount,
                deliver_min,
            } => {
                object.set("CheckID", FieldValue::Hash256(*check_id))?;
                if let Some(amount) = amount {
                    object.set("Amount", FieldValue::Amount(amount.clone()))?;
                }
                if let Some(deliver_min) = deliver_min {
                    object.set("DeliverMin", FieldValue::Amount(deliver_min.clone()))?;
                }
            }
            TxKind::CheckCancel { check_id } => {
                object.set("CheckID", FieldValue::Hash256(*check_id))?;
            }
            TxKind::SignerListSet {
                signer_quorum,
                signer_entries,
            } => {
                object.set("SignerQuorum", FieldValue::UInt32(*signer_quorum))?;
                if !signer_entries.is_empty() {
                    let mut elements = vec![];
                    for entry in signer_entries {
                        let mut inner = StObject::new();
                        inner.set("Account", FieldValue::Account(entry.account))?;
                        inner.set("SignerWeight", FieldValue::UInt16(entry.weight))?;
                        elements.push(("SignerEntry".to_string(), inner));
                    }
                    object.set("SignerEntries", FieldValue::Array(elements))?;
                }
            }
            TxKind::SetRegularKey { regular_key } => {
                if let Some(key) = regular_key {
                    object.set("RegularKey", FieldValue::Account(*key))?;
                }
            }
            TxKind::TicketCreate { ticket_count } => {
                object.set("TicketCount", FieldValue::UInt32(*ticket_count))?;
            }
            TxKind::DepositPreauth {
                authorize,
                unauthorize,
            } => {
                if let Some(account) = authorize {
                    object.set("Authorize", FieldValue::Account(*account))?;
                }
                if let Some(account) = unauthorize {
                    object.set("Unauthorize", FieldValue::Account(*account))?;
                }
            }
        }
        Ok(())
    }

    /// Rebuild a transaction from a generic decoded field set.
    pub fn from_object(object: &StObject) -> Result<Transaction> {
        let mut fields = Extractor::new(object);

        let type_code = fields.u16("TransactionType")?;
        let type_name = FIELD_REGISTRY
            .transaction_type_name(type_code)
            .ok_or_else(|| {
                Error::UnexpectedField(format!("transaction type code {}", type_code))
            })?
            .to_string();

        let account = fields.account("Account")?;
        let mut common = TxCommon::new(account);
        common.fee = fields.opt_amount("Fee")?;
        common.sequence = fields.opt_u32("Sequence")?;
        common.flags = fields.opt_u32("Flags")?;
        common.source_tag = fields.opt_u32("SourceTag")?;
        common.last_ledger_sequence = fields.opt_u32("LastLedgerSequence")?;
        common.account_txn_id = fields.opt_hash256("AccountTxnID")?;
        common.ticket_sequence = fields.opt_u32("TicketSequence")?;
        common.signing_pub_key = fields.opt_blob("SigningPubKey")?;
        common.txn_signature = fields.opt_blob("TxnSignature")?;
        if let Some(elements) = fields.opt_array("Memos")? {
            for (name, inner) in elements {
                if name != "Memo" {
                    return Err(Error::UnexpectedField(format!(
                        "{} inside Memos array",
                        name
                    )));
                }
                let mut memo = Extractor::new(&inner);
                common.memos.push(Memo {
                    memo_type: memo.opt_blob("MemoType")?,
                    memo_data: memo.opt_blob("MemoData")?,
                    memo_format: memo.opt_blob("MemoFormat")?,
                });
                memo.finish()?;
            }
        }
        if let Some(elements) = fields.opt_array("Signers")? {
            for (name, inner) in elements {
                if name != "Signer" {
                    return Err(Error::UnexpectedField(format!(
                        "{} inside Signers array",
                        name
                    )));
                }
                let mut signer = Extractor::new(&inner);
                common.signers.push(Signer {
                    account: signer.account("Account")?,
                    signing_pub_key: signer.blob("SigningPubKey")?,
                    txn_signature: signer.blob("TxnSignature")?,
                });
                signer.finish()?;
            }
        }

        let kind = match type_name.as_str() {
            "Payment" => TxKind::Payment {
                destination: fields.account("Destination")?,
                amount: fields.amount("Amount")?,
                destination_tag: fields.opt_u32("DestinationTag")?,
                invoice_id: fields.opt_hash256("InvoiceID")?,
                send_max: fields.opt_amount("SendMax")?,
                deliver_min: fields.opt_amount("DeliverMin")?,
                paths: fields.opt_pathset("Paths")?,
            },
            "TrustSet" => TxKind::TrustSet {
                limit_amount: fields.amount("LimitAmount")?,
                quality_in: fields.opt_u32("QualityIn")?,
                quality_out: fields.opt_u32("QualityOut")?,
            },
            "AccountSet" => TxKind::AccountSet {
                set_flag: fields.opt_u32("SetFlag")?,
                clear_flag: fields.opt_u32("ClearFlag")?,
                domain: fields.opt_blob("Domain")?,
                email_hash: fields.opt_hash128("EmailHash")?,
                message_key: fields.opt_blob("MessageKey")?,
                transfer_rate: fields.opt_u32("TransferRate")?,
                tick_size: fields.opt_u8("TickSize")?,
            },
            "AccountDelete" => TxKind::AccountDelete {
                destination: fields.account("Destination")?,
                destination_tag: fields.opt_u32("DestinationTag")?,
            },
            "OfferCreate" => TxKind::OfferCreate {
                taker_gets: fields.amount("TakerGets")?,
                taker_pays: fields.amount("TakerPays")?,
                expiration: fields.opt_u32("Expiration")?,
                offer_sequence: fields.opt_u32("OfferSequence")?,
            },
            "OfferCancel" => TxKind::OfferCancel {
                offer_sequence: fields.u32("OfferSequence")?,
            },
            "EscrowCreate" => TxKind::EscrowCreate {
                amount: fields.amount("Amount")?,
                destination: fields.account("Destination")?,
                destination_tag: fields.opt_u32("DestinationTag")?,
                cancel_after: fields.opt_u32("CancelAfter")?,
                finish_after: fields.opt_u32("FinishAfter")?,
                condition: fields.opt_blob("Condition")?,
            },
            "EscrowFinish" => TxKind::EscrowFinish {
                owner: fields.account("Owner")?,
                offer_sequence: fields.u32("OfferSequence")?,
                condition: fields.opt_blob("Condition")?,
                fulfillment: fields.opt_blob("Fulfillment")?,
            },
            "EscrowCancel" => TxKind::EscrowCancel {
                owner: fields.account("Owner")?,
                offer_sequence: fields.u32("OfferSequence")?,
            },
            "PaymentChannelCreate" => TxKind::PaymentChannelCreate {
                amount: fields.amount("Amount")?,
                destination: fields.account("Destination")?,
                settle_delay: fields.u32("SettleDelay")?,
                public_key: fields.blob("PublicKey")?,
                cancel_after: fields.opt_u32("CancelAfter")?,
                destination_tag: fields.opt_u32("DestinationTag")?,
            },
            "PaymentChannelFund" => TxKind::PaymentChannelFund {
                channel: fields.hash256("Channel")?,
                amount: fields.amount("Amount")?,
                expiration: fields.opt_u32("Expiration")?,
            },
            "PaymentChannelClaim" => TxKind::PaymentChannelClaim {
                channel: fields.hash256("Channel")?,
                balance: fields.opt_amount("Balance")?,
                amount: fields.opt_amount("Amount")?,
                signature: fields.opt_blob("Signature")?,
                public_key: fields.opt_blob("PublicKey")?,
            },
            "CheckCreate" => TxKind::CheckCreate {
                destination: fields.account("Destination")?,
                send_max: fields.amount("SendMax")?,
                destination_tag: fields.opt_u32("DestinationTag")?,
                expiration: fields.opt_u32("Expiration")?,
                invoice_id: fields.opt_hash256("InvoiceID")?,
            },
            "CheckCash" => TxKind::CheckCash {
                check_id: fields.hash256("CheckID")?,
                amount: fields.opt_amount("Amount")?,
                deliver_min: fields.opt_amount("DeliverMin")?,
            },
            "CheckCancel" => TxKind::CheckCancel {
                check_id: fields.hash256("CheckID")?,
            },
            "SignerListSet" => {
                let mut entries = vec![];
                if let Some(elements) = fields.opt_array("SignerEntries")? {
                    for (name, inner) in elements {
                        if name != "SignerEntry" {
                            return Err(Error::UnexpectedField(format!(
                                "{} inside SignerEntries array",
                                name
                            )));
                        }
                        let mut entry = Extractor::new(&inner);
                        entries.push(SignerEntry {
                            account: entry.account("Account")?,
                            weight: entry.u16("SignerWeight")?,
                        });
                        entry.finish()?;
                    }
                }
                TxKind::SignerListSet {
                    signer_quorum: fields.u32("SignerQuorum")?,
                    signer_entries: entries,
                }
            }
            "SetRegularKey" => TxKind::SetRegularKey {
                regular_key: fields.opt_account("RegularKey")?,
            },
            "TicketCreate" => TxKind::TicketCreate {
                ticket_count: fields.u32("TicketCount")?,
            },
            "DepositPreauth" => TxKind::DepositPreauth {
                authorize: fields.opt_account("Authorize")?,
                unauthorize: fields.opt_account("Unauthorize")?,
            },
            other => {
                return Err(Error::UnexpectedField(format!(
                    "unsupported transaction type {}",
                    other
                )))
            }
        };

        fields.finish()?;
        Ok(Transaction { common, kind })
    }

    /// Map to the JSON representation used by the network's APIs.
    pub fn to_json(&self) -> Result<Value> {
        let object = self.to_object()?;
        let mut map = serde_json::Map::new();
        for (name, value) in object.fields() {
            let json = match (name.as_str(), value) {
                ("TransactionType", FieldValue::UInt16(code)) => {
                    json!(FIELD_REGISTRY.transaction_type_name(*code))
                }
                (_, value) => field_value_to_json(value),
            };
            map.insert(name.clone(), json);
        }
        Ok(Value::Object(map))
    }

    /// Build a transaction from the loosely-typed JSON representation.
    pub fn from_json(json: &Value) -> Result<Transaction> {
        let map = json
            .as_object()
            .ok_or_else(|| Error::InvalidJson("transaction must be an object".to_string()))?;
        let mut object = StObject::new();
        for (name, value) in map {
            let info = FIELD_REGISTRY.get(name)?;
            let field_value = json_to_field_value(name, info.id().type_code(), value)?;
            object.set(name, field_value)?;
        }
        Transaction::from_object(&object)
    }
}

/// Pulls typed values out of a decoded object, tracking which fields
/// have been consumed so leftovers can be reported.
pub(crate) struct Extractor {
    fields: HashMap<String, FieldValue>,
}

impl Extractor {
    pub(crate) fn new(object: &StObject) -> Extractor {
        Extractor {
            fields: object
                .fields()
                .iter()
                .map(|(n, v)| (n.clone(), v.clone()))
                .collect(),
        }
    }

    pub(crate) fn finish(self) -> Result<()> {
        if let Some(name) = self.fields.keys().next() {
            return Err(Error::UnexpectedField(name.clone()));
        }
        Ok(())
    }

    pub(crate) fn take(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    pub(crate) fn missing(name: &str) -> Error {
        Error::UnexpectedField(format!("required field {} absent", name))
    }

    pub(crate) fn mismatch(name: &str, value: &FieldValue) -> Error {
        Error::UnexpectedField(format!("{} decoded as {:?}", name, value))
    }

    pub(crate) fn u16(&mut self, name: &str) -> Result<u16> {
        match self.take(name) {
            Some(FieldValue::UInt16(v)) => Ok(v),
            Some(v) => Err(Self::mismatch(name, &v)),
            None => Err(Self::missing(name)),
        }
    }

    pub(crate) fn u32(&mut self, name: &str) -> Result<u32> {
        match self.take(name) {
            Some(FieldValue::UInt32(v)) => Ok(v),
            Some(v) => Err(Self::mismatch(name, &v)),
            None => Err(Self::missing(name)),
        }
    }

    pub(crate) fn account(&mut self, name: &str) -> Result<AccountId> {
        match self.take(name) {
            Some(FieldValue::Account(v)) => Ok(v),
            Some(v) => Err(Self::mismatch(name, &v)),
            None => Err(Self::missing(name)),
        }
    }

    pub(crate) fn amount(&mut self, name: &str) -> Result<Amount> {
        match self.take(name) {
            Some(FieldValue::Amount(v)) => Ok(v),
            Some(v) => Err(Self::mismatch(name, &v)),
            None => Err(Self::missing(name)),
        }
    }

    pub(crate) fn blob(&mut self, name: &str) -> Result<Vec<u8>> {
        match self.take(name) {
            Some(FieldValue::Blob(v)) => Ok(v),
            Some(v) => Err(Self::mismatch(name, &v)),
            None => Err(Self::missing(name)),
        }
    }

    pub(crate) fn hash256(&mut self, name: &str) -> Result<Hash256> {
        match self.take(name) {
            Some(FieldValue::Hash256(v)) => Ok(v),
            Some(v) => Err(Self::mismatch(name, &v)),
            None => Err(Self::missing(name)),
        }
    }

    pub(crate) fn u64(&mut self, name: &str) -> Result<u64> {
        match self.take(name) {
            Some(FieldValue::UInt64(v)) => Ok(v),
            Some(v) => Err(Self::mismatch(name, &v)),
            None => Err(Self::missing(name)),
        }
    }

    pub(crate) fn vector256(&mut self, name: &str) -> Result<Vec<Hash256>> {
        match self.take(name) {
            Some(FieldValue::Vector256(v)) => Ok(v),
            Some(v) => Err(Self::mismatch(name, &v)),
            None => Err(Self::missing(name)),
        }
    }

    pub(crate) fn opt_u64(&mut self, name: &str) -> Result<Option<u64>> {
        self.take(name)
            .map(|v| match v {
                FieldValue::UInt64(v) => Ok(v),
                other => Err(Self::mismatch(name, &other)),
            })
            .transpose()
    }

    pub(crate) fn opt_hash160(&mut self, name: &str) -> Result<Option<crate::hashes::Hash160>> {
        self.take(name)
            .map(|v| match v {
                FieldValue::Hash160(v) => Ok(v),
                other => Err(Self::mismatch(name, &other)),
            })
            .transpose()
    }

    pub(crate) fn opt_vector256(&mut self, name: &str) -> Result<Option<Vec<Hash256>>> {
        self.take(name)
            .map(|v| match v {
                FieldValue::Vector256(v) => Ok(v),
                other => Err(Self::mismatch(name, &other)),
            })
            .transpose()
    }

    pub(crate) fn opt_u8(&mut self, name: &str) -> Result<Option<u8>> {
        self.take(name)
            .map(|v| match v {
                FieldValue::UInt8(v) => Ok(v),
                other => Err(Self::mismatch(name, &other)),
            })
            .transpose()
    }

    pub(crate) fn opt_u32(&mut self, name: &str) -> Result<Option<u32>> {
        self.take(name)
            .map(|v| match v {
                FieldValue::UInt32(v) => Ok(v),
                other => Err(Self::mismatch(name, &other)),
            })
            .transpose()
    }

    pub(crate) fn opt_account(&mut self, name: &str) -> Result<Option<AccountId>> {
        self.take(name)
            .map(|v| match v {
                FieldValue::Account(v) => Ok(v),
                other => Err(Self::mismatch(name, &other)),
            })
            .transpose()
    }

    pub(crate) fn opt_amount(&mut self, name: &str) -> Result<Option<Amount>> {
        self.take(name)
            .map(|v| match v {
                FieldValue::Amount(v) => Ok(v),
                other => Err(Self::mismatch(name, &other)),
            })
            .transpose()
    }

    pub(crate) fn opt_blob(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        self.take(name)
            .map(|v| match v {
                FieldValue::Blob(v) => Ok(v),
                other => Err(Self::mismatch(name, &other)),
            })
            .transpose()
    }

    pub(crate) fn opt_hash128(&mut self, name: &str) -> Result<Option<Hash128>> {
        self.take(name)
            .map(|v| match v {
                FieldValue::Hash128(v) => Ok(v),
                other => Err(Self::mismatch(name, &other)),
            })
            .transpose()
    }

    pub(crate) fn opt_hash256(&mut self, name: &str) -> Result<Option<Hash256>> {
        self.take(name)
            .map(|v| match v {
                FieldValue::Hash256(v) => Ok(v),
                other => Err(Self::mismatch(name, &other)),
            })
            .transpose()
    }

    pub(crate) fn opt_pathset(&mut self, name: &str) -> Result<Option<PathSet>> {
        self.take(name)
            .map(|v| match v {
                FieldValue::PathSet(v) => Ok(v),
                other => Err(Self::mismatch(name, &other)),
            })
            .transpose()
    }

    pub(crate) fn opt_array(&mut self, name: &str) -> Result<Option<Vec<(String, StObject)>>> {
        self.take(name)
            .map(|v| match v {
                FieldValue::Array(v) => Ok(v),
                other => Err(Self::mismatch(name, &other)),
            })
            .transpose()
    }
}

fn field_value_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::UInt8(v) => json!(v),
        FieldValue::UInt16(v) => json!(v),
        FieldValue::UInt32(v) => json!(v),
        FieldValue::UInt64(v) => json!(format!("{:016X}", v)),
        FieldValue::Hash128(v) => json!(v.to_string()),
        FieldValue::Hash160(v) => json!(v.to_string()),
        FieldValue::Hash256(v) => json!(v.to_string()),
        FieldValue::Blob(data) => json!(hex::encode_upper(data)),
        FieldValue::Account(account) => json!(account.to_address()),
        FieldValue::Amount(amount) => amount_to_json(amount),
        FieldValue::Object(object) => object_to_json(object),
        FieldValue::Array(elements) => Value::Array(
            elements
                .iter()
                .map(|(name, object)| json!({ name: object_to_json(object) }))
                .collect(),
        ),
        FieldValue::PathSet(set) => pathset_to_json(set),
        FieldValue::Vector256(hashes) => {
            Value::Array(hashes.iter().map(|h| json!(h.to_string())).collect())
        }
    }
}

fn object_to_json(object: &StObject) -> Value {
    let mut map = serde_json::Map::new();
    for (name, value) in object.fields() {
        map.insert(name.clone(), field_value_to_json(value));
    }
    Value::Object(map)
}

fn amount_to_json(amount: &Amount) -> Value {
    match amount {
        Amount::Xrp(drops) => json!(drops.to_string()),
        Amount::Issued {
            value,
            currency,
            issuer,
        } => json!({
            "value": value.to_string(),
            "currency": currency.to_string(),
            "issuer": issuer.to_address(),
        }),
    }
}

fn pathset_to_json(set: &PathSet) -> Value {
    Value::Array(
        set.paths()
            .iter()
            .map(|path| {
                Value::Array(
                    path.iter()
                        .map(|step| {
                            let mut map = serde_json::Map::new();
                            if let Some(account) = step.account() {
                                map.insert("account".to_string(), json!(account.to_address()));
                            }
                            if let Some(currency) = step.currency() {
                                map.insert("currency".to_string(), json!(currency.to_string()));
                            }
                            if let Some(issuer) = step.issuer() {
                                map.insert("issuer".to_string(), json!(issuer.to_address()));
                            }
                            Value::Object(map)
                        })
                        .collect(),
                )
            })
            .collect(),
    )
}

fn json_to_field_value(name: &str, type_code: u16, json: &Value) -> Result<FieldValue> {
    use crate::field::*;

    let bad = |why: &str| Error::InvalidJson(format!("{}: {}", name, why));

    let value = match type_code {
        TYPE_UINT8 => FieldValue::UInt8(
            json.as_u64()
                .and_then(|v| u8::try_from(v).ok())
                .ok_or_else(|| bad("expected a u8"))?,
        ),
        TYPE_UINT16 => {
            if name == "TransactionType" {
                let type_name = json.as_str().ok_or_else(|| bad("expected a type name"))?;
                FieldValue::UInt16(
                    FIELD_REGISTRY
                        .transaction_type_code(type_name)
                        .ok_or_else(|| bad("unknown transaction type"))?,
                )
            } else {
                FieldValue::UInt16(
                    json.as_u64()
                        .and_then(|v| u16::try_from(v).ok())
                        .ok_or_else(|| bad("expected a u16"))?,
                )
            }
        }
        TYPE_UINT32 => FieldValue::UInt32(
            json.as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| bad("expected a u32"))?,
        ),
        TYPE_UINT64 => {
            let text = json.as_str().ok_or_else(|| bad("expected a hex string"))?;
            let raw = u64::from_str_radix(text, 16).map_err(|_| bad("unparseable u64"))?;
            FieldValue::UInt64(raw)
        }
        TYPE_HASH128 => FieldValue::Hash128(
            json.as_str()
                .ok_or_else(|| bad("expected a hex string"))?
                .parse()?,
        ),
        TYPE_HASH160 => FieldValue::Hash160(
            json.as_str()
                .ok_or_else(|| bad("expected a hex string"))?
                .parse()?,
        ),
        TYPE_HASH256 => FieldValue::Hash256(
            json.as_str()
                .ok_or_else(|| bad("expected a hex string"))?
                .parse()?,
        ),
        TYPE_BLOB => FieldValue::Blob(hex::decode(
            json.as_str().ok_or_else(|| bad("expected a hex string"))?,
        )?),
        TYPE_ACCOUNT => FieldValue::Account(AccountId::from_address(
            json.as_str().ok_or_else(|| bad("expected an address"))?,
        )?),
        TYPE_AMOUNT => FieldValue::Amount(amount_from_json(name, json)?),
        TYPE_OBJECT => {
            let map = json.as_object().ok_or_else(|| bad("expected an object"))?;
            let mut object = StObject::new();
            for (inner_name, inner_json) in map {
                let info = FIELD_REGISTRY.get(inner_name)?;
                object.set(
                    inner_name,
                    json_to_field_value(inner_name, info.id().type_code(), inner_json)?,
                )?;
            }
            FieldValue::Object(object)
        }
        TYPE_ARRAY => {
            let items = json.as_array().ok_or_else(|| bad("expected an array"))?;
            let mut elements = vec![];
            for item in items {
                let wrapper = item
                    .as_object()
                    .filter(|m| m.len() == 1)
                    .ok_or_else(|| bad("array elements wrap a single named object"))?;
                let (inner_name, inner_json) = wrapper.iter().next().unwrap();
                let inner =
                    match json_to_field_value(inner_name, TYPE_OBJECT, inner_json)? {
                        FieldValue::Object(object) => object,
                        _ => unreachable!(),
                    };
                elements.push((inner_name.clone(), inner));
            }
            FieldValue::Array(elements)
        }
        TYPE_PATHSET => FieldValue::PathSet(pathset_from_json(json)?),
        TYPE_VECTOR256 => {
            let items = json.as_array().ok_or_else(|| bad("expected an array"))?;
            let hashes = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .ok_or_else(|| bad("expected hex strings"))?
                        .parse()
                })
                .collect::<Result<Vec<Hash256>>>()?;
            FieldValue::Vector256(hashes)
        }
        other => {
            return Err(Error::UnknownField {
                type_code: other,
                field_code: 0,
            })
        }
    };
    Ok(value)
}

fn amount_from_json(name: &str, json: &Value) -> Result<Amount> {
    match json {
        Value::String(drops) => {
            let drops: u64 = drops
                .parse()
                .map_err(|_| Error::InvalidJson(format!("{}: unparseable drop count", name)))?;
            Amount::drops(drops)
        }
        Value::Object(map) => {
            let text = |key: &str| -> Result<&str> {
                map.get(key)
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| Error::InvalidJson(format!("{}: missing {}", name, key)))
            };
            Amount::issued(
                text("value")?,
                text("currency")?.parse()?,
                AccountId::from_address(text("issuer")?)?,
            )
        }
        _ => Err(Error::InvalidJson(format!(
            "{}: amounts are drop strings or issued objects",
            name
        ))),
    }
}

fn pathset_from_json(json: &Value) -> Result<PathSet> {
    let paths_json = json
        .as_array()
        .ok_or_else(|| Error::InvalidJson("Paths must be an array".to_string()))?;
    let mut paths = vec![];
    for path_json in paths_json {
        let steps_json = path_json
            .as_array()
            .ok_or_else(|| Error::InvalidJson("each path must be an array".to_string()))?;
        let mut steps = vec![];
        for step_json in steps_json {
            let map = step_json
                .as_object()
                .ok_or_else(|| Error::InvalidJson("each path step must be an object".to_string()))?;
            let account = map.get("account").and_then(|v| v.as_str());
            let currency = map.get("currency").and_then(|v| v.as_str());
            let issuer = map.get("issuer").and_then(|v| v.as_str());
            let step = match (account, currency, issuer) {
                (Some(account), None, None) => {
                    PathStep::with_account(AccountId::from_address(account)?)
                }
                (None, Some(currency), None) => PathStep::with_currency(currency.parse()?),
                (None, Some(currency), Some(issuer)) => PathStep::with_currency_and_issuer(
                    currency.parse()?,
                    AccountId::from_address(issuer)?,
                ),
                (None, None, None) => {
                    return Err(Error::InvalidJson(
                        "path step names no component".to_string(),
                    ))
                }
                _ => {
                    return Err(Error::InvalidJson(
                        "path step is an account alone, or a currency with an optional issuer"
                            .to_string(),
                    ))
                }
            };
            steps.push(step);
        }
        paths.push(steps);
    }
    PathSet::new(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyCode;

    fn sender() -> AccountId {
        AccountId([0x11u8; 20])
    }

    fn receiver() -> AccountId {
        AccountId([0x22u8; 20])
    }

    fn base_payment() -> Transaction {
        let mut tx = Transaction::payment(sender(), receiver(), Amount::drops(1_000_000).unwrap());
        tx.common_mut().set_fee(Amount::drops(12).unwrap());
        tx.common_mut().set_sequence(100);
        tx
    }

    #[test]
    fn payment_roundtrip() {
        let mut tx = base_payment();
        tx.common_mut().set_last_ledger_sequence(7_654_321);
        tx.common_mut().set_signing_pub_key(vec![0x02; 33]);
        tx.common_mut().set_txn_signature(vec![0x30; 71]);

        let bytes = tx.serialize(false).unwrap();
        let decoded = Transaction::deserialize(&bytes).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn every_kind_roundtrips() {
        let usd = CurrencyCode::from_iso("USD").unwrap();
        let limit = Amount::issued("500", usd, receiver()).unwrap();
        let kinds = vec![
            TxKind::TrustSet {
                limit_amount: limit.clone(),
                quality_in: Some(1),
                quality_out: None,
            },
            TxKind::AccountSet {
                set_flag: Some(5),
                clear_flag: None,
                domain: Some(b"example.com".to_vec()),
                email_hash: Some(Hash128([9u8; 16])),
                message_key: None,
                transfer_rate: Some(1_002_000_000),
                tick_size: Some(6),
            },
            TxKind::AccountDelete {
                destination: receiver(),
                destination_tag: Some(7),
            },
            TxKind::OfferCreate {
                taker_gets: Amount::drops(77).unwrap(),
                taker_pays: limit.clone(),
                expiration: None,
                offer_sequence: Some(12),
            },
            TxKind::OfferCancel { offer_sequence: 12 },
            TxKind::EscrowCreate {
                amount: Amount::drops(500).unwrap(),
                destination: receiver(),
                destination_tag: None,
                cancel_after: Some(600_000_000),
                finish_after: Some(500_000_000),
                condition: Some(vec![0xa0; 39]),
            },
            TxKind::EscrowFinish {
                owner: sender(),
                offer_sequence: 3,
                condition: None,
                fulfillment: None,
            },
            TxKind::EscrowCancel {
                owner: sender(),
                offer_sequence: 3,
            },
            TxKind::PaymentChannelCreate {
                amount: Amount::drops(10_000).unwrap(),
                destination: receiver(),
                settle_delay: 86_400,
                public_key: vec![0x02; 33],
                cancel_after: None,
                destination_tag: None,
            },
            TxKind::PaymentChannelFund {
                channel: Hash256([3u8; 32]),
                amount: Amount::drops(200).unwrap(),
                expiration: None,
            },
            TxKind::PaymentChannelClaim {
                channel: Hash256([3u8; 32]),
                balance: Some(Amount::drops(100).unwrap()),
                amount: Some(Amount::drops(200).unwrap()),
                signature: Some(vec![0x30; 70]),
                public_key: Some(vec![0x02; 33]),
            },
            TxKind::CheckCreate {
                destination: receiver(),
                send_max: Amount::drops(999).unwrap(),
                destination_tag: None,
                expiration: None,
                invoice_id: Some(Hash256([8u8; 32])),
            },
            TxKind::CheckCash {
                check_id: Hash256([8u8; 32]),
                amount: Some(Amount::drops(999).unwrap()),
                deliver_min: None,
            },
            TxKind::CheckCancel {
                check_id: Hash256([8u8; 32]),
            },
            TxKind::SignerListSet {
                signer_quorum: 3,
                signer_entries: vec![
                    SignerEntry {
                        account: receiver(),
                        weight: 2,
                    },
                    SignerEntry {
                        account: sender(),
                        weight: 1,
                    },
                ],
            },
            TxKind::SetRegularKey {
                regular_key: Some(receiver()),
            },
            TxKind::TicketCreate { ticket_count: 5 },
            TxKind::DepositPreauth {
                authorize: Some(receiver()),
                unauthorize: None,
            },
        ];

        for kind in kinds {
            let mut tx = Transaction::new(sender(), kind);
            tx.common_mut().set_fee(Amount::drops(12).unwrap());
            tx.common_mut().set_sequence(1);
            let bytes = tx.serialize(false).unwrap();
            let decoded = Transaction::deserialize(&bytes).unwrap();
            assert_eq!(decoded, tx, "kind {}", tx.kind().type_name());
        }
    }

    #[test]
    fn missing_mandatory_field_fails_fast() {
        let tx = Transaction::payment(sender(), receiver(), Amount::drops(1).unwrap());
        // no fee, no sequence
        assert!(matches!(
            tx.serialize(false),
            Err(Error::MissingField { .. })
        ));
    }

    #[test]
    fn memo_roundtrip() {
        let mut tx = base_payment();
        tx.common_mut().add_memo(Memo {
            memo_type: Some(b"text/plain".to_vec()),
            memo_data: Some(b"invoice 42".to_vec()),
            memo_format: None,
        });
        let bytes = tx.serialize(false).unwrap();
        let decoded = Transaction::deserialize(&bytes).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn truncated_transaction_never_parses_partially() {
        let bytes = base_payment().serialize(false).unwrap();
        assert!(Transaction::deserialize(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn identifier_requires_a_signature() {
        let tx = base_payment();
        assert!(tx.hash().is_err());
    }

    #[test]
    fn identifier_changes_with_any_field() {
        let mut a = base_payment();
        a.common_mut().set_txn_signature(vec![0x30; 70]);
        let mut b = a.clone();
        b.common_mut().set_sequence(101);
        // same tx hashed twice agrees with itself, differs across edits
        assert_eq!(a.hash().unwrap(), a.hash().unwrap());
        assert_ne!(a.hash().unwrap(), b.hash().unwrap());
    }

    #[test]
    fn json_roundtrip() {
        let usd = CurrencyCode::from_iso("USD").unwrap();
        let mut tx = Transaction::payment(
            sender(),
            receiver(),
            Amount::issued("25.5", usd, receiver()).unwrap(),
        );
        tx.common_mut().set_fee(Amount::drops(12).unwrap());
        tx.common_mut().set_sequence(9);
        tx.common_mut().set_flags(0x8000_0000);

        let json = tx.to_json().unwrap();
        assert_eq!(json["TransactionType"], "Payment");
        assert_eq!(json["Amount"]["value"], "25.5");

        let back = Transaction::from_json(&json).unwrap();
        assert_eq!(back, tx);
        assert_eq!(
            back.serialize(false).unwrap(),
            tx.serialize(false).unwrap()
        );
    }

    #[test]
    fn from_json_accepts_drop_strings() {
        let json = json!({
            "TransactionType": "Payment",
            "Account": sender().to_address(),
            "Destination": receiver().to_address(),
            "Amount": "1000000",
            "Fee": "12",
            "Sequence": 100,
        });
        let tx = Transaction::from_json(&json).unwrap();
        assert_eq!(tx, base_payment());
    }

    #[test]
    fn malformed_json_path_steps_rejected() {
        let with_paths = |steps: Value| {
            json!({
                "TransactionType": "Payment",
                "Account": sender().to_address(),
                "Destination": receiver().to_address(),
                "Amount": "1000000",
                "Fee": "12",
                "Sequence": 100,
                "Paths": [[steps]],
            })
        };

        // a step naming nothing has no wire form
        let empty_step = with_paths(json!({}));
        assert!(matches!(
            Transaction::from_json(&empty_step),
            Err(Error::InvalidJson(_))
        ));

        // an account step cannot also carry a currency
        let mixed_step = with_paths(json!({
            "account": receiver().to_address(),
            "currency": "USD",
        }));
        assert!(matches!(
            Transaction::from_json(&mixed_step),
            Err(Error::InvalidJson(_))
        ));

        // an issuer needs a currency to qualify
        let issuer_only = with_paths(json!({
            "issuer": receiver().to_address(),
        }));
        assert!(Transaction::from_json(&issuer_only).is_err());
    }
}
