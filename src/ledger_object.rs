use crate::account::AccountId;
use crate::amount::Amount;
use crate::crypto::sha512_half;
use crate::error::{Error, Result};
use crate::hashes::{Hash128, Hash160, Hash256};
use crate::reader::CanonicalReader;
use crate::registry::FIELD_REGISTRY;
use crate::transaction::{Extractor, SignerEntry};
use crate::value::{FieldValue, StObject};
use crate::writer::CanonicalWriter;

// Namespace tags: a two-byte discriminator hashed ahead of an entry's
// natural key so indexes from different namespaces can never collide.
const NS_ACCOUNT: u16 = 0x0061;
const NS_DIR_NODE: u16 = 0x0064;
const NS_TRUST_LINE: u16 = 0x0072;
const NS_OFFER: u16 = 0x006f;
const NS_OWNER_DIR: u16 = 0x004f;
const NS_BOOK_DIR: u16 = 0x0042;
const NS_SKIP_LIST: u16 = 0x0073;
const NS_ESCROW: u16 = 0x0075;
const NS_AMENDMENTS: u16 = 0x0066;
const NS_FEE_SETTINGS: u16 = 0x0065;
const NS_TICKET: u16 = 0x0054;
const NS_SIGNER_LIST: u16 = 0x0053;
const NS_PAYCHAN: u16 = 0x0078;
const NS_CHECK: u16 = 0x0043;
const NS_DEPOSIT_PREAUTH: u16 = 0x0070;
const NS_NEGATIVE_UNL: u16 = 0x004e;

fn index_hash(namespace: u16, key_parts: &[&[u8]]) -> Hash256 {
    let mut pre_image = vec![];
    pre_image.extend(namespace.to_be_bytes());
    for part in key_parts {
        pre_image.extend(*part);
    }
    sha512_half(&pre_image)
}

/// Where an account's root entry lives.
pub fn account_root_index(account: &AccountId) -> Hash256 {
    index_hash(NS_ACCOUNT, &[account.as_bytes()])
}

/// Where the trust line between two accounts lives for one currency.
/// The two accounts are ordered low-to-high by raw bytes, so both
/// parties compute the same index.
pub fn ripple_state_index(
    a: &AccountId,
    b: &AccountId,
    currency: &crate::currency::CurrencyCode,
) -> Hash256 {
    let (low, high) = if a.as_bytes() <= b.as_bytes() {
        (a, b)
    } else {
        (b, a)
    };
    index_hash(
        NS_TRUST_LINE,
        &[low.as_bytes(), high.as_bytes(), currency.as_bytes()],
    )
}

/// Where an offer placed by `account` with creating sequence `sequence`
/// lives.
pub fn offer_index(account: &AccountId, sequence: u32) -> Hash256 {
    index_hash(NS_OFFER, &[account.as_bytes(), &sequence.to_be_bytes()])
}

/// The root page of an account's owner directory.
pub fn owner_directory_index(account: &AccountId) -> Hash256 {
    index_hash(NS_OWNER_DIR, &[account.as_bytes()])
}

/// A continuation page of a directory. Page zero is the root itself.
pub fn directory_page_index(root: &Hash256, page: u64) -> Hash256 {
    if page == 0 {
        return *root;
    }
    index_hash(NS_DIR_NODE, &[root.as_bytes(), &page.to_be_bytes()])
}

/// The base index of the order-book directory for one currency pair.
/// The low 8 bytes are zero; a concrete book page replaces them with
/// the quality.
pub fn book_directory_base(
    taker_pays_currency: &Hash160,
    taker_pays_issuer: &Hash160,
    taker_gets_currency: &Hash160,
    taker_gets_issuer: &Hash160,
) -> Hash256 {
    let mut base = index_hash(
        NS_BOOK_DIR,
        &[
            taker_pays_currency.as_bytes(),
            taker_gets_currency.as_bytes(),
            taker_pays_issuer.as_bytes(),
            taker_gets_issuer.as_bytes(),
        ],
    );
    base.0[24..].copy_from_slice(&[0u8; 8]);
    base
}

/// A book directory page at one exact quality.
pub fn book_directory_index(base: &Hash256, quality: u64) -> Hash256 {
    let mut index = *base;
    index.0[24..].copy_from_slice(&quality.to_be_bytes());
    index
}

pub fn signer_list_index(account: &AccountId) -> Hash256 {
    // the trailing u32 is the signer list id; only list zero exists
    index_hash(NS_SIGNER_LIST, &[account.as_bytes(), &0u32.to_be_bytes()])
}

pub fn escrow_index(owner: &AccountId, sequence: u32) -> Hash256 {
    index_hash(NS_ESCROW, &[owner.as_bytes(), &sequence.to_be_bytes()])
}

pub fn pay_channel_index(
    account: &AccountId,
    destination: &AccountId,
    sequence: u32,
) -> Hash256 {
    index_hash(
        NS_PAYCHAN,
        &[
            account.as_bytes(),
            destination.as_bytes(),
            &sequence.to_be_bytes(),
        ],
    )
}

pub fn check_index(account: &AccountId, sequence: u32) -> Hash256 {
    index_hash(NS_CHECK, &[account.as_bytes(), &sequence.to_be_bytes()])
}

pub fn deposit_preauth_index(owner: &AccountId, preauthorized: &AccountId) -> Hash256 {
    index_hash(
        NS_DEPOSIT_PREAUTH,
        &[owner.as_bytes(), preauthorized.as_bytes()],
    )
}

pub fn ticket_index(account: &AccountId, ticket_sequence: u32) -> Hash256 {
    index_hash(
        NS_TICKET,
        &[account.as_bytes(), &ticket_sequence.to_be_bytes()],
    )
}

/// The singleton entries live at fixed indexes derived from their
/// namespace alone.
pub fn amendments_index() -> Hash256 {
    index_hash(NS_AMENDMENTS, &[])
}

pub fn fee_settings_index() -> Hash256 {
    index_hash(NS_FEE_SETTINGS, &[])
}

pub fn negative_unl_index() -> Hash256 {
    index_hash(NS_NEGATIVE_UNL, &[])
}

/// The current ledger-hashes skip list.
pub fn ledger_hashes_index() -> Hash256 {
    index_hash(NS_SKIP_LIST, &[])
}

/// A historical skip-list page covering an earlier range of ledgers.
pub fn ledger_hashes_history_index(page: u32) -> Hash256 {
    index_hash(NS_SKIP_LIST, &[&page.to_be_bytes()])
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountRoot {
    pub account: AccountId,
    pub balance: Amount,
    pub sequence: u32,
    pub owner_count: u32,
    pub flags: u32,
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
    pub regular_key: Option<AccountId>,
    pub email_hash: Option<Hash128>,
    pub message_key: Option<Vec<u8>>,
    pub domain: Option<Vec<u8>>,
    pub transfer_rate: Option<u32>,
    pub tick_size: Option<u8>,
    pub ticket_count: Option<u32>,
    pub account_txn_id: Option<Hash256>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryNode {
    pub flags: u32,
    pub root_index: Hash256,
    pub indexes: Vec<Hash256>,
    pub index_next: Option<u64>,
    pub index_previous: Option<u64>,
    pub owner: Option<AccountId>,
    pub exchange_rate: Option<u64>,
    pub taker_pays_currency: Option<Hash160>,
    pub taker_pays_issuer: Option<Hash160>,
    pub taker_gets_currency: Option<Hash160>,
    pub taker_gets_issuer: Option<Hash160>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RippleState {
    pub flags: u32,
    pub balance: Amount,
    pub low_limit: Amount,
    pub high_limit: Amount,
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
    pub low_node: Option<u64>,
    pub high_node: Option<u64>,
    pub low_quality_in: Option<u32>,
    pub low_quality_out: Option<u32>,
    pub high_quality_in: Option<u32>,
    pub high_quality_out: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub flags: u32,
    pub account: AccountId,
    pub sequence: u32,
    pub taker_pays: Amount,
    pub taker_gets: Amount,
    pub book_directory: Hash256,
    pub book_node: u64,
    pub owner_node: u64,
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
    pub expiration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerHashes {
    pub flags: u32,
    pub hashes: Vec<Hash256>,
    pub first_ledger_sequence: Option<u32>,
    pub last_ledger_sequence: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Majority {
    pub amendment: Hash256,
    pub close_time: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Amendments {
    pub flags: u32,
    pub amendments: Vec<Hash256>,
    pub majorities: Vec<Majority>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeeSettings {
    pub flags: u32,
    pub base_fee: u64,
    pub reference_fee_units: u32,
    pub reserve_base: u32,
    pub reserve_increment: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Escrow {
    pub flags: u32,
    pub account: AccountId,
    pub destination: AccountId,
    pub amount: Amount,
    pub owner_node: u64,
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
    pub condition: Option<Vec<u8>>,
    pub cancel_after: Option<u32>,
    pub finish_after: Option<u32>,
    pub source_tag: Option<u32>,
    pub destination_tag: Option<u32>,
    pub destination_node: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayChannel {
    pub flags: u32,
    pub account: AccountId,
    pub destination: AccountId,
    pub amount: Amount,
    pub balance: Amount,
    pub public_key: Vec<u8>,
    pub settle_delay: u32,
    pub owner_node: u64,
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
    pub expiration: Option<u32>,
    pub cancel_after: Option<u32>,
    pub source_tag: Option<u32>,
    pub destination_tag: Option<u32>,
    pub destination_node: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub flags: u32,
    pub account: AccountId,
    pub destination: AccountId,
    pub send_max: Amount,
    pub sequence: u32,
    pub owner_node: u64,
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
    pub destination_node: Option<u64>,
    pub expiration: Option<u32>,
    pub invoice_id: Option<Hash256>,
    pub source_tag: Option<u32>,
    pub destination_tag: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepositPreauthEntry {
    pub flags: u32,
    pub account: AccountId,
    pub authorize: AccountId,
    pub owner_node: u64,
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub flags: u32,
    pub account: AccountId,
    pub ticket_sequence: u32,
    pub owner_node: u64,
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignerList {
    pub flags: u32,
    pub signer_list_id: u32,
    pub signer_quorum: u32,
    pub signer_entries: Vec<SignerEntry>,
    pub owner_node: u64,
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisabledValidator {
    pub public_key: Vec<u8>,
    pub first_ledger_sequence: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NegativeUnl {
    pub flags: u32,
    pub disabled_validators: Vec<DisabledValidator>,
}

/// One entry of the ledger's state tree, in its typed form.
///
/// The byte form is the same canonical field encoding transactions use,
/// with a LedgerEntryType discriminator field selecting the schema.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerObject {
    AccountRoot(AccountRoot),
    DirectoryNode(DirectoryNode),
    RippleState(RippleState),
    Offer(Offer),
    LedgerHashes(LedgerHashes),
    Amendments(Amendments),
    FeeSettings(FeeSettings),
    Escrow(Escrow),
    PayChannel(PayChannel),
    Check(Check),
    DepositPreauth(DepositPreauthEntry),
    Ticket(Ticket),
    SignerList(SignerList),
    NegativeUnl(NegativeUnl),
}

impl LedgerObject {
    pub fn entry_type_name(&self) -> &'static str {
        match self {
            LedgerObject::AccountRoot(_) => "AccountRoot",
            LedgerObject::DirectoryNode(_) => "DirectoryNode",
            LedgerObject::RippleState(_) => "RippleState",
            LedgerObject::Offer(_) => "Offer",
            LedgerObject::LedgerHashes(_) => "LedgerHashes",
            LedgerObject::Amendments(_) => "Amendments",
            LedgerObject::FeeSettings(_) => "FeeSettings",
            LedgerObject::Escrow(_) => "Escrow",
            LedgerObject::PayChannel(_) => "PayChannel",
            LedgerObject::Check(_) => "Check",
            LedgerObject::DepositPreauth(_) => "DepositPreauth",
            LedgerObject::Ticket(_) => "Ticket",
            LedgerObject::SignerList(_) => "SignerList",
            LedgerObject::NegativeUnl(_) => "NegativeUNL",
        }
    }

    pub fn entry_type_code(&self) -> u16 {
        FIELD_REGISTRY
            .ledger_entry_type_code(self.entry_type_name())
            .expect("every kind is in the embedded schema")
    }

    /// The index this entry lives at, when it is derivable from the
    /// entry's own fields. Entries keyed by data not stored in the
    /// entry (escrows and channels by creating sequence, directory
    /// pages by page number) return `None`.
    pub fn index(&self) -> Option<Hash256> {
        match self {
            LedgerObject::AccountRoot(e) => Some(account_root_index(&e.account)),
            LedgerObject::RippleState(e) => {
                let low = match &e.low_limit {
                    Amount::Issued { issuer, .. } => *issuer,
                    Amount::Xrp(_) => return None,
                };
                let (high, currency) = match &e.high_limit {
                    Amount::Issued {
                        issuer, currency, ..
                    } => (*issuer, *currency),
                    Amount::Xrp(_) => return None,
                };
                Some(ripple_state_index(&low, &high, &currency))
            }
            LedgerObject::Offer(e) => Some(offer_index(&e.account, e.sequence)),
            LedgerObject::Check(e) => Some(check_index(&e.account, e.sequence)),
            LedgerObject::DepositPreauth(e) => {
                Some(deposit_preauth_index(&e.account, &e.authorize))
            }
            LedgerObject::Ticket(e) => Some(ticket_index(&e.account, e.ticket_sequence)),
            LedgerObject::Amendments(_) => Some(amendments_index()),
            LedgerObject::FeeSettings(_) => Some(fee_settings_index()),
            LedgerObject::LedgerHashes(_) => Some(ledger_hashes_index()),
            LedgerObject::NegativeUnl(_) => Some(negative_unl_index()),
            // keyed by data the entry does not store: directory pages
            // by page number, escrows and channels by creating
            // sequence, signer lists by their owner
            LedgerObject::DirectoryNode(_)
            | LedgerObject::Escrow(_)
            | LedgerObject::PayChannel(_)
            | LedgerObject::SignerList(_) => None,
        }
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let object = self.to_object()?;
        let mut writer = CanonicalWriter::new();
        for (name, value) in object.fields() {
            writer.push(name, value.clone())?;
        }
        writer.finish(false)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<LedgerObject> {
        let object = CanonicalReader::new(bytes).read_all()?;
        LedgerObject::from_object(&object)
    }

    pub fn to_object(&self) -> Result<StObject> {
        let mut object = StObject::new();
        object.set(
            "LedgerEntryType",
            FieldValue::UInt16(self.entry_type_code()),
        )?;
        match self {
            LedgerObject::AccountRoot(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                object.set("Account", FieldValue::Account(e.account))?;
                object.set("Balance", FieldValue::Amount(e.balance.clone()))?;
                object.set("Sequence", FieldValue::UInt32(e.sequence))?;
                object.set("OwnerCount", FieldValue::UInt32(e.owner_count))?;
                object.set("PreviousTxnID", FieldValue::Hash256(e.previous_txn_id))?;
                object.set(
                    "PreviousTxnLgrSeq",
                    FieldValue::UInt32(e.previous_txn_lgr_seq),
                )?;
                if let Some(key) = e.regular_key {
                    object.set("RegularKey", FieldValue::Account(key))?;
                }
                if let Some(hash) = e.email_hash {
                    object.set("EmailHash", FieldValue::Hash128(hash))?;
                }
                if let Some(key) = &e.message_key {
                    object.set("MessageKey", FieldValue::Blob(key.clone()))?;
                }
                if let Some(domain) = &e.domain {
                    object.set("Domain", FieldValue::Blob(domain.clone()))?;
                }
                if let Some(rate) = e.transfer_rate {
                    object.set("TransferRate", FieldValue::UInt32(rate))?;
                }
                if let Some(size) = e.tick_size {
                    object.set("TickSize", FieldValue::UInt8(size))?;
                }
                if let Some(count) = e.ticket_count {
                    object.set("TicketCount", FieldValue::UInt32(count))?;
                }
                if let Some(hash) = e.account_txn_id {
                    object.set("AccountTxnID", FieldValue::Hash256(hash))?;
                }
            }
            LedgerObject::DirectoryNode(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                object.set("RootIndex", FieldValue::Hash256(e.root_index))?;
                object.set("Indexes", FieldValue::Vector256(e.indexes.clone()))?;
                if let Some(next) = e.index_next {
                    object.set("IndexNext", FieldValue::UInt64(next))?;
                }
                if let Some(previous) = e.index_previous {
                    object.set("IndexPrevious", FieldValue::UInt64(previous))?;
                }
                if let Some(owner) = e.owner {
                    object.set("Owner", FieldValue::Account(owner))?;
                }
                if let Some(rate) = e.exchange_rate {
                    object.set("ExchangeRate", FieldValue::UInt64(rate))?;
                }
                if let Some(currency) = e.taker_pays_currency {
                    object.set("TakerPaysCurrency", FieldValue::Hash160(currency))?;
                }
                if let Some(issuer) = e.taker_pays_issuer {
                    object.set("TakerPaysIssuer", FieldValue::Hash160(issuer))?;
                }
                if let Some(currency) = e.taker_gets_currency {
                    object.set("TakerGetsCurrency", FieldValue::Hash160(currency))?;
                }
                if let Some(issuer) = e.taker_gets_issuer {
                    object.set("TakerGetsIssuer", FieldValue::Hash160(issuer))?;
                }
            }
            LedgerObject::RippleState(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                object.set("Balance", FieldValue::Amount(e.balance.clone()))?;
                object.set("LowLimit", FieldValue::Amount(e.low_limit.clone()))?;
                object.set("HighLimit", FieldValue::Amount(e.high_limit.clone()))?;
                object.set("PreviousTxnID", FieldValue::Hash256(e.previous_txn_id))?;
                object.set(
                    "PreviousTxnLgrSeq",
                    FieldValue::UInt32(e.previous_txn_lgr_seq),
                )?;
                if let Some(node) = e.low_node {
                    object.set("LowNode", FieldValue::UInt64(node))?;
                }
                if let Some(node) = e.high_node {
                    object.set("HighNode", FieldValue::UInt64(node))?;
                }
                if let Some(quality) = e.low_quality_in {
                    object.set("LowQualityIn", FieldValue::UInt32(quality))?;
                }
                if let Some(quality) = e.low_quality_out {
                    object.set("LowQualityOut", FieldValue::UInt32(quality))?;
                }
                if let Some(quality) = e.high_quality_in {
                    object.set("HighQualityIn", FieldValue::UInt32(quality))?;
                }
                if let Some(quality) = e.high_quality_out {
                    object.set("HighQualityOut", FieldValue::UInt32(quality))?;
                }
            }
            LedgerObject::Offer(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                object.set("Account", FieldValue::Account(e.account))?;
                object.set("Sequence", FieldValue::UInt32(e.sequence))?;
                object.set("TakerPays", FieldValue::Amount(e.taker_pays.clone()))?;
                object.set("TakerGets", FieldValue::Amount(e.taker_gets.clone()))?;
                object.set("BookDirectory", FieldValue::Hash256(e.book_directory))?;
                object.set("BookNode", FieldValue::UInt64(e.book_node))?;
                object.set("OwnerNode", FieldValue::UInt64(e.owner_node))?;
                object.set("PreviousTxnID", FieldValue::Hash256(e.previous_txn_id))?;
                object.set(
                    "PreviousTxnLgrSeq",
                    FieldValue::UInt32(e.previous_txn_lgr_seq),
                )?;
                if let Some(expiration) = e.expiration {
                    object.set("Expiration", FieldValue::UInt32(expiration))?;
                }
            }
            LedgerObject::LedgerHashes(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                object.set("Hashes", FieldValue::Vector256(e.hashes.clone()))?;
                if let Some(sequence) = e.first_ledger_sequence {
                    object.set("FirstLedgerSequence", FieldValue::UInt32(sequence))?;
                }
                if let Some(sequence) = e.last_ledger_sequence {
                    object.set("LastLedgerSequence", FieldValue::UInt32(sequence))?;
                }
            }
            LedgerObject::Amendments(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                if !e.amendments.is_empty() {
                    object.set("Amendments", FieldValue::Vector256(e.amendments.clone()))?;
                }
                if !e.majorities.is_empty() {
                    let mut elements = vec![];
                    for majority in &e.majorities {
                        let mut inner = StObject::new();
                        inner.set("Amendment", FieldValue::Hash256(majority.amendment))?;
                        inner.set("CloseTime", FieldValue::UInt32(majority.close_time))?;
                        elements.push(("Majority".to_string(), inner));
                    }
                    object.set("Majorities", FieldValue::Array(elements))?;
                }
            }
            LedgerObject::FeeSettings(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                object.set("BaseFee", FieldValue::UInt64(e.base_fee))?;
                object.set(
                    "ReferenceFeeUnits",
                    FieldValue::UInt32(e.reference_fee_units),
                )?;
                object.set("ReserveBase", FieldValue::UInt32(e.reserve_base))?;
                object.set("ReserveIncrement", FieldValue::UInt32(e.reserve_increment))?;
            }
            LedgerObject::Escrow(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                object.set("Account", FieldValue::Account(e.account))?;
                object.set("Destination", FieldValue::Account(e.destination))?;
                object.set("Amount", FieldValue::Amount(e.amount.clone()))?;
                object.set("OwnerNode", FieldValue::UInt64(e.owner_node))?;
                object.set("PreviousTxnID", FieldValue::Hash256(e.previous_txn_id))?;
                object.set(
                    "PreviousTxnLgrSeq",
                    FieldValue::UInt32(e.previous_txn_lgr_seq),
                )?;
                if let Some(condition) = &e.condition {
                    object.set("Condition", FieldValue::Blob(condition.clone()))?;
                }
                if let Some(time) = e.cancel_after {
                    object.set("CancelAfter", FieldValue::UInt32(time))?;
                }
                if let Some(time) = e.finish_after {
                    object.set("FinishAfter", FieldValue::UInt32(time))?;
                }
                if let Some(tag) = e.source_tag {
                    object.set("SourceTag", FieldValue::UInt32(tag))?;
                }
                if let Some(tag) = e.destination_tag {
                    object.set("DestinationTag", FieldValue::UInt32(tag))?;
                }
                if let Some(node) = e.destination_node {
                    object.set("DestinationNode", FieldValue::UInt64(node))?;
                }
            }
            LedgerObject::PayChannel(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                object.set("Account", FieldValue::Account(e.account))?;
                object.set("Destination", FieldValue::Account(e.destination))?;
                object.set("Amount", FieldValue::Amount(e.amount.clone()))?;
                object.set("Balance", FieldValue::Amount(e.balance.clone()))?;
                object.set("PublicKey", FieldValue::Blob(e.public_key.clone()))?;
                object.set("SettleDelay", FieldValue::UInt32(e.settle_delay))?;
                object.set("OwnerNode", FieldValue::UInt64(e.owner_node))?;
                object.set("PreviousTxnID", FieldValue::Hash256(e.previous_txn_id))?;
                object.set(
                    "PreviousTxnLgrSeq",
                    FieldValue::UInt32(e.previous_txn_lgr_seq),
                )?;
                if let Some(expiration) = e.expiration {
                    object.set("Expiration", FieldValue::UInt32(expiration))?;
                }
                if let Some(time) = e.cancel_after {
                    object.set("CancelAfter", FieldValue::UInt32(time))?;
                }
                if let Some(tag) = e.source_tag {
                    object.set("SourceTag", FieldValue::UInt32(tag))?;
                }
                if let Some(tag) = e.destination_tag {
                    object.set("DestinationTag", FieldValue::UInt32(tag))?;
                }
                if let Some(node) = e.destination_node {
                    object.set("DestinationNode", FieldValue::UInt64(node))?;
                }
            }
            LedgerObject::Check(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                object.set("Account", FieldValue::Account(e.account))?;
                object.set("Destination", FieldValue::Account(e.destination))?;
                object.set("SendMax", FieldValue::Amount(e.send_max.clone()))?;
                object.set("Sequence", FieldValue::UInt32(e.sequence))?;
                object.set("OwnerNode", FieldValue::UInt64(e.owner_node))?;
                object.set("PreviousTxnID", FieldValue::Hash256(e.previous_txn_id))?;
                object.set(
                    "PreviousTxnLgrSeq",
                    FieldValue::UInt32(e.previous_txn_lgr_seq),
                )?;
                if let Some(node) = e.destination_node {
                    object.set("DestinationNode", FieldValue::UInt64(node))?;
                }
                if let Some(expiration) = e.expiration {
                    object.set("Expiration", FieldValue::UInt32(expiration))?;
                }
                if let Some(invoice) = e.invoice_id {
                    object.set("InvoiceID", FieldValue::Hash256(invoice))?;
                }
                if let Some(tag) = e.source_tag {
                    object.set("SourceTag", FieldValue::UInt32(tag))?;
                }
                if let Some(tag) = e.destination_tag {
                    object.set("DestinationTag", FieldValue::UInt32(tag))?;
                }
            }
            LedgerObject::DepositPreauth(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                object.set("Account", FieldValue::Account(e.account))?;
                object.set("Authorize", FieldValue::Account(e.authorize))?;
                object.set("OwnerNode", FieldValue::UInt64(e.owner_node))?;
                object.set("PreviousTxnID", FieldValue::Hash256(e.previous_txn_id))?;
                object.set(
                    "PreviousTxnLgrSeq",
                    FieldValue::UInt32(e.previous_txn_lgr_seq),
                )?;
            }
            LedgerObject::Ticket(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                object.set("Account", FieldValue::Account(e.account))?;
                object.set("TicketSequence", FieldValue::UInt32(e.ticket_sequence))?;
                object.set("OwnerNode", FieldValue::UInt64(e.owner_node))?;
                object.set("PreviousTxnID", FieldValue::Hash256(e.previous_txn_id))?;
                object.set(
                    "PreviousTxnLgrSeq",
                    FieldValue::UInt32(e.previous_txn_lgr_seq),
                )?;
            }
            LedgerObject::SignerList(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                object.set("SignerListID", FieldValue::UInt32(e.signer_list_id))?;
                object.set("SignerQuorum", FieldValue::UInt32(e.signer_quorum))?;
                object.set("OwnerNode", FieldValue::UInt64(e.owner_node))?;
                object.set("PreviousTxnID", FieldValue::Hash256(e.previous_txn_id))?;
                object.set(
                    "PreviousTxnLgrSeq",
                    FieldValue::UInt32(e.previous_txn_lgr_seq),
                )?;
                let mut elements = vec![];
                for entry in &e.signer_entries {
                    let mut inner = StObject::new();
                    inner.set("Account", FieldValue::Account(entry.account))?;
                    inner.set("SignerWeight", FieldValue::UInt16(entry.weight))?;
                    elements.push(("SignerEntry".to_string(), inner));
                }
                object.set("SignerEntries", FieldValue::Array(elements))?;
            }
            LedgerObject::NegativeUnl(e) => {
                object.set("Flags", FieldValue::UInt32(e.flags))?;
                if !e.disabled_validators.is_empty() {
                    let mut elements = vec![];
                    for validator in &e.disabled_validators {
                        let mut inner = StObject::new();
                        inner.set(
                            "PublicKey",
                            FieldValue::Blob(validator.public_key.clone()),
                        )?;
                        inner.set(
                            "FirstLedgerSequence",
                            FieldValue::UInt32(validator.first_ledger_sequence),
                        )?;
                        elements.push(("DisabledValidator".to_string(), inner));
                    }
                    object.set("DisabledValidators", FieldValue::Array(elements))?;
                }
            }
        }
        Ok(object)
    }

    pub fn from_object(object: &StObject) -> Result<LedgerObject> {
        let mut fields = Extractor::new(object);
        let type_code = fields.u16("LedgerEntryType")?;
        let type_name = FIELD_REGISTRY
            .ledger_entry_type_name(type_code)
            .ok_or_else(|| {
                Error::UnexpectedField(format!("ledger entry type code {}", type_code))
            })?
            .to_string();

        let entry = match type_name.as_str() {
            "AccountRoot" => LedgerObject::AccountRoot(AccountRoot {
                flags: fields.u32("Flags")?,
                account: fields.account("Account")?,
                balance: fields.amount("Balance")?,
                sequence: fields.u32("Sequence")?,
                owner_count: fields.u32("OwnerCount")?,
                previous_txn_id: fields.hash256("PreviousTxnID")?,
                previous_txn_lgr_seq: fields.u32("PreviousTxnLgrSeq")?,
                regular_key: fields.opt_account("RegularKey")?,
                email_hash: fields.opt_hash128("EmailHash")?,
                message_key: fields.opt_blob("MessageKey")?,
                domain: fields.opt_blob("Domain")?,
                transfer_rate: fields.opt_u32("TransferRate")?,
                tick_size: fields.opt_u8("TickSize")?,
                ticket_count: fields.opt_u32("TicketCount")?,
                account_txn_id: fields.opt_hash256("AccountTxnID")?,
            }),
            "DirectoryNode" => LedgerObject::DirectoryNode(DirectoryNode {
                flags: fields.u32("Flags")?,
                root_index: fields.hash256("RootIndex")?,
                indexes: fields.vector256("Indexes")?,
                index_next: fields.opt_u64("IndexNext")?,
                index_previous: fields.opt_u64("IndexPrevious")?,
                owner: fields.opt_account("Owner")?,
                exchange_rate: fields.opt_u64("ExchangeRate")?,
                taker_pays_currency: fields.opt_hash160("TakerPaysCurrency")?,
                taker_pays_issuer: fields.opt_hash160("TakerPaysIssuer")?,
                taker_gets_currency: fields.opt_hash160("TakerGetsCurrency")?,
                taker_gets_issuer: fields.opt_hash160("TakerGetsIssuer")?,
            }),
            "RippleState" => LedgerObject::RippleState(RippleState {
                flags: fields.u32("Flags")?,
                balance: fields.amount("Balance")?,
                low_limit: fields.amount("LowLimit")?,
                high_limit: fields.amount("HighLimit")?,
                previous_txn_id: fields.hash256("PreviousTxnID")?,
                previous_txn_lgr_seq: fields.u32("PreviousTxnLgrSeq")?,
                low_node: fields.opt_u64("LowNode")?,
                high_node: fields.opt_u64("HighNode")?,
                low_quality_in: fields.opt_u32("LowQualityIn")?,
                low_quality_out: fields.opt_u32("LowQualityOut")?,
                high_quality_in: fields.opt_u32("HighQualityIn")?,
                high_quality_out: fields.opt_u32("HighQualityOut")?,
            }),
            "Offer" => LedgerObject::Offer(Offer {
                flags: fields.u32("Flags")?,
                account: fields.account("Account")?,
                sequence: fields.u32("Sequence")?,
                taker_pays: fields.amount("TakerPays")?,
                taker_gets: fields.amount("TakerGets")?,
                book_directory: fields.hash256("BookDirectory")?,
                book_node: fields.u64("BookNode")?,
                owner_node: fields.u64("OwnerNode")?,
                previous_txn_id: fields.hash256("PreviousTxnID")?,
                previous_txn_lgr_seq: fields.u32("PreviousTxnLgrSeq")?,
                expiration: fields.opt_u32("Expiration")?,
            }),
            "LedgerHashes" => LedgerObject::LedgerHashes(LedgerHashes {
                flags: fields.u32("Flags")?,
                hashes: fields.vector256("Hashes")?,
                first_ledger_sequence: fields.opt_u32("FirstLedgerSequence")?,
                last_ledger_sequence: fields.opt_u32("LastLedgerSequence")?,
            }),
            "Amendments" => {
                let mut majorities = vec![];
                if let Some(elements) = fields.opt_array("Majorities")? {
                    for (name, inner) in elements {
                        if name != "Majority" {
                            return Err(Error::UnexpectedField(format!(
                                "{} inside Majorities array",
                                name
                            )));
                        }
                        let mut majority = Extractor::new(&inner);
                        majorities.push(Majority {
                            amendment: majority.hash256("Amendment")?,
                            close_time: majority.u32("CloseTime")?,
                        });
                        majority.finish()?;
                    }
                }
                LedgerObject::Amendments(Amendments {
                    flags: fields.u32("Flags")?,
                    amendments: fields.opt_vector256("Amendments")?.unwrap_or_default(),
                    majorities,
                })
            }
            "FeeSettings" => LedgerObject::FeeSettings(FeeSettings {
                flags: fields.u32("Flags")?,
                base_fee: fields.u64("BaseFee")?,
                reference_fee_units: fields.u32("ReferenceFeeUnits")?,
                reserve_base: fields.u32("ReserveBase")?,
                reserve_increment: fields.u32("ReserveIncrement")?,
            }),
            "Escrow" => LedgerObject::Escrow(Escrow {
                flags: fields.u32("Flags")?,
                account: fields.account("Account")?,
                destination: fields.account("Destination")?,
                amount: fields.amount("Amount")?,
                owner_node: fields.u64("OwnerNode")?,
                previous_txn_id: fields.hash256("PreviousTxnID")?,
                previous_txn_lgr_seq: fields.u32("PreviousTxnLgrSeq")?,
                condition: fields.opt_blob("Condition")?,
                cancel_after: fields.opt_u32("CancelAfter")?,
                finish_after: fields.opt_u32("FinishAfter")?,
                source_tag: fields.opt_u32("SourceTag")?,
                destination_tag: fields.opt_u32("DestinationTag")?,
                destination_node: fields.opt_u64("DestinationNode")?,
            }),
            "PayChannel" => LedgerObject::PayChannel(PayChannel {
                flags: fields.u32("Flags")?,
                account: fields.account("Account")?,
                destination: fields.account("Destination")?,
                amount: fields.amount("Amount")?,
                balance: fields.amount("Balance")?,
                public_key: fields.blob("PublicKey")?,
                settle_delay: fields.u32("SettleDelay")?,
                owner_node: fields.u64("OwnerNode")?,
                previous_txn_id: fields.hash256("PreviousTxnID")?,
                previous_txn_lgr_seq: fields.u32("PreviousTxnLgrSeq")?,
                expiration: fields.opt_u32("Expiration")?,
                cancel_after: fields.opt_u32("CancelAfter")?,
                source_tag: fields.opt_u32("SourceTag")?,
                destination_tag: fields.opt_u32("DestinationTag")?,
                destination_node: fields.opt_u64("DestinationNode")?,
            }),
            "Check" => LedgerObject::Check(Check {
                flags: fields.u32("Flags")?,
                account: fields.account("Account")?,
                destination: fields.account("Destination")?,
                send_max: fields.amount("SendMax")?,
                sequence: fields.u32("Sequence")?,
                owner_node: fields.u64("OwnerNode")?,
                previous_txn_id: fields.hash256("PreviousTxnID")?,
                previous_txn_lgr_seq: fields.u32("PreviousTxnLgrSeq")?,
                destination_node: fields.opt_u64("DestinationNode")?,
                expiration: fields.opt_u32("Expiration")?,
                invoice_id: fields.opt_hash256("InvoiceID")?,
                source_tag: fields.opt_u32("SourceTag")?,
                destination_tag: fields.opt_u32("DestinationTag")?,
            }),
            "DepositPreauth" => LedgerObject::DepositPreauth(DepositPreauthEntry {
                flags: fields.u32("Flags")?,
                account: fields.account("Account")?,
                authorize: fields.account("Authorize")?,
                owner_node: fields.u64("OwnerNode")?,
                previous_txn_id: fields.hash256("PreviousTxnID")?,
                previous_txn_lgr_seq: fields.u32("PreviousTxnLgrSeq")?,
            }),
            "Ticket" => LedgerObject::Ticket(Ticket {
                flags: fields.u32("Flags")?,
                account: fields.account("Account")?,
                ticket_sequence: fields.u32("TicketSequence")?,
                owner_node: fields.u64("OwnerNode")?,
                previous_txn_id: fields.hash256("PreviousTxnID")?,
                previous_txn_lgr_seq: fields.u32("PreviousTxnLgrSeq")?,
            }),
            "SignerList" => {
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
                LedgerObject::SignerList(SignerList {
                    flags: fields.u32("Flags")?,
                    signer_list_id: fields.u32("SignerListID")?,
                    signer_quorum: fields.u32("SignerQuorum")?,
                    signer_entries: entries,
                    owner_node: fields.u64("OwnerNode")?,
                    previous_txn_id: fields.hash256("PreviousTxnID")?,
                    previous_txn_lgr_seq: fields.u32("PreviousTxnLgrSeq")?,
                })
            }
            "NegativeUNL" => {
                let mut validators = vec![];
                if let Some(elements) = fields.opt_array("DisabledValidators")? {
                    for (name, inner) in elements {
                        if name != "DisabledValidator" {
                            return Err(Error::UnexpectedField(format!(
                                "{} inside DisabledValidators array",
                                name
                            )));
                        }
                        let mut validator = Extractor::new(&inner);
                        validators.push(DisabledValidator {
                            public_key: validator.blob("PublicKey")?,
                            first_ledger_sequence: validator.u32("FirstLedgerSequence")?,
                        });
                        validator.finish()?;
                    }
                }
                LedgerObject::NegativeUnl(NegativeUnl {
                    flags: fields.u32("Flags")?,
                    disabled_validators: validators,
                })
            }
            other => {
                return Err(Error::UnexpectedField(format!(
                    "unsupported ledger entry type {}",
                    other
                )))
            }
        };

        fields.finish()?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyCode;

    fn alice() -> AccountId {
        AccountId([0x0au8; 20])
    }

    fn bob() -> AccountId {
        AccountId([0x0bu8; 20])
    }

    fn sample_account_root() -> LedgerObject {
        LedgerObject::AccountRoot(AccountRoot {
            flags: 0,
            account: alice(),
            balance: Amount::drops(100_000_000).unwrap(),
            sequence: 17,
            owner_count: 2,
            previous_txn_id: Hash256([5u8; 32]),
            previous_txn_lgr_seq: 6_000_000,
            regular_key: None,
            email_hash: None,
            message_key: None,
            domain: Some(b"example.com".to_vec()),
            transfer_rate: None,
            tick_size: None,
            ticket_count: None,
            account_txn_id: None,
        })
    }

    #[test]
    fn account_root_roundtrip() {
        let entry = sample_account_root();
        let bytes = entry.serialize().unwrap();
        assert_eq!(LedgerObject::deserialize(&bytes).unwrap(), entry);
    }

    #[test]
    fn ripple_state_roundtrip_and_index() {
        let usd = CurrencyCode::from_iso("USD").unwrap();
        let entry = LedgerObject::RippleState(RippleState {
            flags: 0x0001_0000,
            balance: Amount::issued("0", usd, AccountId([0u8; 20])).unwrap(),
            low_limit: Amount::issued("1000", usd, alice()).unwrap(),
            high_limit: Amount::issued("0", usd, bob()).unwrap(),
            previous_txn_id: Hash256([7u8; 32]),
            previous_txn_lgr_seq: 42,
            low_node: Some(0),
            high_node: Some(0),
            low_quality_in: None,
            low_quality_out: None,
            high_quality_in: None,
            high_quality_out: None,
        });
        let bytes = entry.serialize().unwrap();
        assert_eq!(LedgerObject::deserialize(&bytes).unwrap(), entry);
        assert_eq!(
            entry.index().unwrap(),
            ripple_state_index(&alice(), &bob(), &usd)
        );
    }

    #[test]
    fn every_entry_kind_roundtrips() {
        let entries = vec![
            sample_account_root(),
            LedgerObject::DirectoryNode(DirectoryNode {
                flags: 0,
                root_index: Hash256([4u8; 32]),
                indexes: vec![Hash256([5u8; 32]), Hash256([6u8; 32])],
                index_next: Some(1),
                index_previous: None,
                owner: Some(alice()),
                exchange_rate: None,
                taker_pays_currency: None,
                taker_pays_issuer: None,
                taker_gets_currency: None,
                taker_gets_issuer: None,
            }),
            LedgerObject::LedgerHashes(LedgerHashes {
                flags: 0,
                hashes: vec![Hash256([1u8; 32]); 3],
                first_ledger_sequence: Some(256),
                last_ledger_sequence: Some(512),
            }),
            LedgerObject::Amendments(Amendments {
                flags: 0,
                amendments: vec![Hash256([2u8; 32])],
                majorities: vec![Majority {
                    amendment: Hash256([3u8; 32]),
                    close_time: 600_000_000,
                }],
            }),
            LedgerObject::Escrow(Escrow {
                flags: 0,
                account: alice(),
                destination: bob(),
                amount: Amount::drops(777).unwrap(),
                owner_node: 0,
                previous_txn_id: Hash256([8u8; 32]),
                previous_txn_lgr_seq: 9,
                condition: Some(vec![0xa0; 39]),
                cancel_after: Some(700_000_000),
                finish_after: None,
                source_tag: None,
                destination_tag: Some(1),
                destination_node: Some(0),
            }),
            LedgerObject::PayChannel(PayChannel {
                flags: 0,
                account: alice(),
                destination: bob(),
                amount: Amount::drops(10_000).unwrap(),
                balance: Amount::drops(500).unwrap(),
                public_key: vec![0x02; 33],
                settle_delay: 86_400,
                owner_node: 0,
                previous_txn_id: Hash256([8u8; 32]),
                previous_txn_lgr_seq: 9,
                expiration: None,
                cancel_after: None,
                source_tag: None,
                destination_tag: None,
                destination_node: None,
            }),
            LedgerObject::Check(Check {
                flags: 0,
                account: alice(),
                destination: bob(),
                send_max: Amount::drops(42).unwrap(),
                sequence: 11,
                owner_node: 0,
                previous_txn_id: Hash256([8u8; 32]),
                previous_txn_lgr_seq: 9,
                destination_node: None,
                expiration: None,
                invoice_id: None,
                source_tag: None,
                destination_tag: None,
            }),
            LedgerObject::DepositPreauth(DepositPreauthEntry {
                flags: 0,
                account: alice(),
                authorize: bob(),
                owner_node: 0,
                previous_txn_id: Hash256([8u8; 32]),
                previous_txn_lgr_seq: 9,
            }),
            LedgerObject::Ticket(Ticket {
                flags: 0,
                account: alice(),
                ticket_sequence: 18,
                owner_node: 0,
                previous_txn_id: Hash256([8u8; 32]),
                previous_txn_lgr_seq: 9,
            }),
            LedgerObject::NegativeUnl(NegativeUnl {
                flags: 0,
                disabled_validators: vec![DisabledValidator {
                    public_key: vec![0xed; 33],
                    first_ledger_sequence: 1_000,
                }],
            }),
        ];
        for entry in entries {
            let bytes = entry.serialize().unwrap();
            assert_eq!(
                LedgerObject::deserialize(&bytes).unwrap(),
                entry,
                "kind {}",
                entry.entry_type_name()
            );
        }
    }

    #[test]
    fn ripple_state_index_is_symmetric() {
        let usd = CurrencyCode::from_iso("USD").unwrap();
        assert_eq!(
            ripple_state_index(&alice(), &bob(), &usd),
            ripple_state_index(&bob(), &alice(), &usd)
        );
    }

    #[test]
    fn namespaces_never_collide() {
        // the same natural key under different namespaces
        let account = alice();
        let indexes = [
            account_root_index(&account),
            owner_directory_index(&account),
            offer_index(&account, 1),
            escrow_index(&account, 1),
            check_index(&account, 1),
            ticket_index(&account, 1),
            signer_list_index(&account),
        ];
        for (i, a) in indexes.iter().enumerate() {
            for b in &indexes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn singleton_indexes_are_fixed() {
        assert_eq!(amendments_index(), amendments_index());
        assert_ne!(amendments_index(), fee_settings_index());
        assert_ne!(ledger_hashes_index(), negative_unl_index());
    }

    #[test]
    fn directory_page_zero_is_the_root() {
        let root = owner_directory_index(&alice());
        assert_eq!(directory_page_index(&root, 0), root);
        assert_ne!(directory_page_index(&root, 1), root);
    }

    #[test]
    fn book_directory_low_bytes_carry_quality() {
        let currency = Hash160([1u8; 20]);
        let issuer = Hash160([2u8; 20]);
        let zero = Hash160([0u8; 20]);
        let base = book_directory_base(&currency, &issuer, &zero, &zero);
        assert_eq!(&base.0[24..], &[0u8; 8]);

        let quality = 0x5d05_8cc5_0a84_a6d8u64;
        let page = book_directory_index(&base, quality);
        assert_eq!(&page.0[..24], &base.0[..24]);
        assert_eq!(&page.0[24..], &quality.to_be_bytes());
    }

    #[test]
    fn offer_entry_derives_its_own_index() {
        let entry = LedgerObject::Offer(Offer {
            flags: 0,
            account: alice(),
            sequence: 99,
            taker_pays: Amount::drops(1_000).unwrap(),
            taker_gets: Amount::issued(
                "5",
                CurrencyCode::from_iso("EUR").unwrap(),
                bob(),
            )
            .unwrap(),
            book_directory: Hash256([9u8; 32]),
            book_node: 0,
            owner_node: 0,
            previous_txn_id: Hash256([1u8; 32]),
            previous_txn_lgr_seq: 5,
            expiration: None,
        });
        assert_eq!(entry.index().unwrap(), offer_index(&alice(), 99));
    }

    #[test]
    fn signer_list_roundtrip() {
        let entry = LedgerObject::SignerList(SignerList {
            flags: 0,
            signer_list_id: 0,
            signer_quorum: 2,
            signer_entries: vec![
                SignerEntry {
                    account: alice(),
                    weight: 1,
                },
                SignerEntry {
                    account: bob(),
                    weight: 1,
                },
            ],
            owner_node: 0,
            previous_txn_id: Hash256([3u8; 32]),
            previous_txn_lgr_seq: 77,
        });
        let bytes = entry.serialize().unwrap();
        assert_eq!(LedgerObject::deserialize(&bytes).unwrap(), entry);
    }

    #[test]
    fn fee_settings_roundtrip() {
        let entry = LedgerObject::FeeSettings(FeeSettings {
            flags: 0,
            base_fee: 10,
            reference_fee_units: 10,
            reserve_base: 10_000_000,
            reserve_increment: 2_000_000,
        });
        let bytes = entry.serialize().unwrap();
        assert_eq!(LedgerObject::deserialize(&bytes).unwrap(), entry);
        assert_eq!(entry.index().unwrap(), fee_settings_index());
    }

    #[test]
    fn unknown_entry_type_rejected() {
        let mut object = StObject::new();
        object
            .set("LedgerEntryType", FieldValue::UInt16(9999))
            .unwrap();
        assert!(LedgerObject::from_object(&object).is_err());
    }

    #[test]
    fn missing_mandatory_entry_field_rejected() {
        let mut object = StObject::new();
        object
            .set(
                "LedgerEntryType",
                FieldValue::UInt16(
                    FIELD_REGISTRY.ledger_entry_type_code("AccountRoot").unwrap(),
                ),
            )
            .unwrap();
        object.set("Flags", FieldValue::UInt32(0)).unwrap();
        assert!(LedgerObject::from_object(&object).is_err());
    }
}
