use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::field::FieldId;

/// One entry of the field registry: everything the codec needs to know
/// about a field besides its value.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    name: String,
    id: FieldId,
    /// false for signature-bearing fields, which are dropped from the
    /// signing pre-image
    signing: bool,
}

impl FieldInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn is_signing_field(&self) -> bool {
        self.signing
    }
}

/// The process-wide field registry, populated once from the embedded
/// schema file and never mutated afterwards. Unsynchronized concurrent
/// reads are safe; `lazy_static` guarantees the table is fully built
/// before the first lookup returns.
pub struct FieldRegistry {
    by_name: HashMap<String, FieldInfo>,
    by_id: HashMap<FieldId, FieldInfo>,
    transaction_types: HashMap<String, u16>,
    transaction_names: HashMap<u16, String>,
    ledger_entry_types: HashMap<String, u16>,
    ledger_entry_names: HashMap<u16, String>,
}

#[derive(Deserialize)]
struct SchemaFile {
    #[allow(dead_code)]
    schema_version: String,
    types: HashMap<String, u16>,
    fields: Vec<SchemaField>,
    transaction_types: HashMap<String, u16>,
    ledger_entry_types: HashMap<String, u16>,
}

#[derive(Deserialize)]
struct SchemaField {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    nth: u16,
    signing: bool,
}

lazy_static! {
    pub static ref FIELD_REGISTRY: FieldRegistry =
        FieldRegistry::from_schema(include_str!("definitions.json"))
            .expect("embedded field definitions are well-formed");
}

impl FieldRegistry {
    fn from_schema(json: &str) -> Result<FieldRegistry> {
        let schema: SchemaFile = serde_json::from_str(json)?;

        let mut by_name = HashMap::new();
        let mut by_id = HashMap::new();
        for field in schema.fields {
            let type_code = *schema.types.get(&field.type_name).ok_or_else(|| {
                Error::UnknownFieldName(format!("{} (type {})", field.name, field.type_name))
            })?;
            // the spill bytes of the field-ID header are one byte each
            if type_code > 255 || field.nth > 255 {
                return Err(Error::ValueRange(format!(
                    "field {} has codes ({}, {}) beyond the header's byte range",
                    field.name, type_code, field.nth
                )));
            }
            let info = FieldInfo {
                name: field.name.clone(),
                id: FieldId::new(type_code, field.nth),
                signing: field.signing,
            };
            if by_id.insert(info.id, info.clone()).is_some() {
                return Err(Error::DuplicateField(field.name));
            }
            if by_name.insert(field.name.clone(), info).is_some() {
                return Err(Error::DuplicateField(field.name));
            }
        }

        let transaction_names = schema
            .transaction_types
            .iter()
            .map(|(name, code)| (*code, name.clone()))
            .collect();
        let ledger_entry_names = schema
            .ledger_entry_types
            .iter()
            .map(|(name, code)| (*code, name.clone()))
            .collect();

        Ok(FieldRegistry {
            by_name,
            by_id,
            transaction_types: schema.transaction_types,
            transaction_names,
            ledger_entry_types: schema.ledger_entry_types,
            ledger_entry_names,
        })
    }

    /// Look up a field by its semantic name, used when building objects.
    pub fn get(&self, name: &str) -> Result<&FieldInfo> {
        self.by_name
            .get(name)
            .ok_or_else(|| Error::UnknownFieldName(name.to_string()))
    }

    /// Look up a field by its wire identifier, used when parsing.
    pub fn get_by_id(&self, id: FieldId) -> Result<&FieldInfo> {
        self.by_id.get(&id).ok_or(Error::UnknownField {
            type_code: id.type_code(),
            field_code: id.field_code(),
        })
    }

    pub fn transaction_type_code(&self, name: &str) -> Option<u16> {
        self.transaction_types.get(name).copied()
    }

    pub fn transaction_type_name(&self, code: u16) -> Option<&str> {
        self.transaction_names.get(&code).map(|s| s.as_str())
    }

    pub fn ledger_entry_type_code(&self, name: &str) -> Option<u16> {
        self.ledger_entry_types.get(name).copied()
    }

    pub fn ledger_entry_type_name(&self, code: u16) -> Option<&str> {
        self.ledger_entry_names.get(&code).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{TYPE_BLOB, TYPE_UINT16, TYPE_UINT32};

    #[test]
    fn registry_lookup_by_name_and_id() {
        let seq = FIELD_REGISTRY.get("Sequence").unwrap();
        assert_eq!(seq.id(), FieldId::new(TYPE_UINT32, 4));
        assert!(seq.is_signing_field());

        let back = FIELD_REGISTRY
            .get_by_id(FieldId::new(TYPE_UINT32, 4))
            .unwrap();
        assert_eq!(back.name(), "Sequence");
    }

    #[test]
    fn signature_fields_excluded_from_signing() {
        assert!(!FIELD_REGISTRY.get("TxnSignature").unwrap().is_signing_field());
        assert!(!FIELD_REGISTRY.get("Signers").unwrap().is_signing_field());
        assert!(FIELD_REGISTRY.get("SigningPubKey").unwrap().is_signing_field());
    }

    #[test]
    fn unknown_lookups_fail() {
        assert!(FIELD_REGISTRY.get("NoSuchField").is_err());
        assert!(FIELD_REGISTRY.get_by_id(FieldId::new(200, 200)).is_err());
    }

    #[test]
    fn type_tables_resolve_both_ways() {
        assert_eq!(FIELD_REGISTRY.transaction_type_code("Payment"), Some(0));
        assert_eq!(FIELD_REGISTRY.transaction_type_name(20), Some("TrustSet"));
        assert_eq!(
            FIELD_REGISTRY.ledger_entry_type_code("AccountRoot"),
            Some(0x0061)
        );
        assert_eq!(
            FIELD_REGISTRY.ledger_entry_type_name(0x0043),
            Some("Check")
        );
        let tt = FIELD_REGISTRY.get("TransactionType").unwrap();
        assert_eq!(tt.id(), FieldId::new(TYPE_UINT16, 2));
        let sig = FIELD_REGISTRY.get("TxnSignature").unwrap();
        assert_eq!(sig.id(), FieldId::new(TYPE_BLOB, 4));
    }
}
