use crate::error::{Error, Result};
use crate::registry::{FieldInfo, FIELD_REGISTRY};
use crate::value::FieldValue;

/// Serializes one object's fields in the single canonical order.
///
/// Fields may be pushed in any order; `finish` sorts by (type code,
/// field code) so two writers given the same field set always produce
/// byte-identical output. In signing mode, fields whose registry entry
/// is not signing-eligible are dropped before emission.
pub struct CanonicalWriter {
    fields: Vec<(FieldInfo, FieldValue)>,
}

impl CanonicalWriter {
    pub fn new() -> CanonicalWriter {
        CanonicalWriter { fields: vec![] }
    }

    /// Assign a field by name. Fails on unknown names, on a value whose
    /// wire type disagrees with the registry, and on double assignment.
    pub fn push(&mut self, name: &str, value: FieldValue) -> Result<()> {
        let info = FIELD_REGISTRY.get(name)?.clone();
        if info.id().type_code() != value.type_code() {
            return Err(Error::UnexpectedField(format!(
                "{} expects type code {}, value has {}",
                name,
                info.id().type_code(),
                value.type_code()
            )));
        }
        if self.fields.iter().any(|(f, _)| f.name() == name) {
            return Err(Error::DuplicateField(name.to_string()));
        }
        self.fields.push((info, value));
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Emit the canonical byte form. `for_signing` selects the signing
    /// pre-image variant with signature-bearing fields omitted.
    pub fn finish(mut self, for_signing: bool) -> Result<Vec<u8>> {
        if for_signing {
            self.fields.retain(|(info, _)| info.is_signing_field());
        }
        self.fields.sort_by_key(|(info, _)| info.id());

        let mut out = vec![];
        for (info, value) in &self.fields {
            out.extend(info.id().serialize()?);
            value.serialize_into(&mut out)?;
        }
        Ok(out)
    }
}

impl Default for CanonicalWriter {
    fn default() -> Self {
        CanonicalWriter::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountId;
    use crate::amount::Amount;

    fn payment_fields() -> Vec<(&'static str, FieldValue)> {
        vec![
            ("TransactionType", FieldValue::UInt16(0)),
            ("Account", FieldValue::Account(AccountId([1u8; 20]))),
            ("Destination", FieldValue::Account(AccountId([2u8; 20]))),
            ("Amount", FieldValue::Amount(Amount::drops(5000).unwrap())),
            ("Fee", FieldValue::Amount(Amount::drops(10).unwrap())),
            ("Sequence", FieldValue::UInt32(7)),
            ("SigningPubKey", FieldValue::Blob(vec![2u8; 33])),
            ("TxnSignature", FieldValue::Blob(vec![0x30; 70])),
        ]
    }

    #[test]
    fn insertion_order_never_changes_output() {
        let mut forward = CanonicalWriter::new();
        for (name, value) in payment_fields() {
            forward.push(name, value).unwrap();
        }
        let mut reversed = CanonicalWriter::new();
        for (name, value) in payment_fields().into_iter().rev() {
            reversed.push(name, value).unwrap();
        }
        assert_eq!(forward.finish(false).unwrap(), reversed.finish(false).unwrap());
    }

    #[test]
    fn canonical_order_is_type_then_field() {
        let mut writer = CanonicalWriter::new();
        writer.push("Sequence", FieldValue::UInt32(7)).unwrap();
        writer.push("TransactionType", FieldValue::UInt16(0)).unwrap();
        let bytes = writer.finish(false).unwrap();
        // UInt16 (type 1) precedes UInt32 (type 2)
        assert_eq!(bytes[0], 0x12);
        assert_eq!(bytes[3], 0x24);
    }

    #[test]
    fn signing_mode_omits_signature_fields() {
        let mut writer = CanonicalWriter::new();
        for (name, value) in payment_fields() {
            writer.push(name, value).unwrap();
        }
        let pre_image = writer.finish(true).unwrap();
        // TxnSignature is field (7, 4), header byte 0x74; its 0x30
        // DER bytes must not appear after that header anywhere
        let sig_header = 0x74u8;
        assert!(!pre_image.windows(2).any(|w| w[0] == sig_header && w[1] == 70));

        let mut full = CanonicalWriter::new();
        for (name, value) in payment_fields() {
            full.push(name, value).unwrap();
        }
        let transmitted = full.finish(false).unwrap();
        assert!(transmitted.len() > pre_image.len());
    }

    #[test]
    fn duplicate_and_unknown_pushes_fail() {
        let mut writer = CanonicalWriter::new();
        writer.push("Sequence", FieldValue::UInt32(1)).unwrap();
        assert!(matches!(
            writer.push("Sequence", FieldValue::UInt32(2)),
            Err(Error::DuplicateField(_))
        ));
        assert!(matches!(
            writer.push("Bogus", FieldValue::UInt32(1)),
            Err(Error::UnknownFieldName(_))
        ));
    }

    #[test]
    fn type_mismatch_rejected() {
        let mut writer = CanonicalWriter::new();
        assert!(matches!(
            writer.push("Sequence", FieldValue::UInt16(1)),
            Err(Error::UnexpectedField(_))
        ));
    }
}
