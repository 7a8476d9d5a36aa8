use crate::account::AccountId;
use crate::amount::Amount;
use crate::error::{Error, Result};
use crate::field::FieldId;
use crate::hashes::Hash256;
use crate::registry::FIELD_REGISTRY;
use crate::value::{FieldValue, StObject};

/// Streaming decoder over a caller-owned buffer.
///
/// Holds nothing but a cursor; the typical caller drives
/// [`CanonicalReader::next_field`] in a loop and dispatches each
/// decoded `(name, value)` pair into a domain-object setter. The reader
/// does not reject non-canonical field ordering — it preserves whatever
/// order the buffer holds — but it always detects truncation.
pub struct CanonicalReader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> CanonicalReader<'a> {
    pub fn new(bytes: &'a [u8]) -> CanonicalReader<'a> {
        CanonicalReader { bytes, cursor: 0 }
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.bytes.len()
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.cursor)
    }

    /// Read the next field-ID header, failing at end of buffer.
    pub fn read_field_id(&mut self) -> Result<FieldId> {
        let (id, consumed) = FieldId::deserialize(self.bytes, self.cursor)?;
        self.cursor += consumed;
        Ok(id)
    }

    /// Read the next field-ID header, or `None` at a clean end of
    /// buffer. Used to detect terminal fields.
    pub fn try_read_field_id(&mut self) -> Result<Option<FieldId>> {
        if self.is_exhausted() {
            return Ok(None);
        }
        self.read_field_id().map(Some)
    }

    /// Decode the next (field name, value) pair, or `None` at a clean
    /// end of buffer.
    pub fn next_field(&mut self) -> Result<Option<(String, FieldValue)>> {
        let id = match self.try_read_field_id()? {
            Some(id) => id,
            None => return Ok(None),
        };
        let info = FIELD_REGISTRY.get_by_id(id)?;
        let name = info.name().to_string();
        let value = FieldValue::deserialize(id.type_code(), self.bytes, &mut self.cursor)?;
        Ok(Some((name, value)))
    }

    /// Decode every remaining field into one object, preserving the
    /// order encountered.
    pub fn read_all(&mut self) -> Result<StObject> {
        let mut object = StObject::new();
        while let Some((name, value)) = self.next_field()? {
            object.set(&name, value)?;
        }
        Ok(object)
    }

    /// Typed accessor: the next field must be the named one with a
    /// u32 payload.
    pub fn read_u32(&mut self, expected: &str) -> Result<u32> {
        match self.expect_field(expected)? {
            FieldValue::UInt32(v) => Ok(v),
            other => Err(Error::UnexpectedField(format!(
                "{} decoded as {:?}",
                expected, other
            ))),
        }
    }

    pub fn read_account(&mut self, expected: &str) -> Result<AccountId> {
        match self.expect_field(expected)? {
            FieldValue::Account(account) => Ok(account),
            other => Err(Error::UnexpectedField(format!(
                "{} decoded as {:?}",
                expected, other
            ))),
        }
    }

    pub fn read_amount(&mut self, expected: &str) -> Result<Amount> {
        match self.expect_field(expected)? {
            FieldValue::Amount(amount) => Ok(amount),
            other => Err(Error::UnexpectedField(format!(
                "{} decoded as {:?}",
                expected, other
            ))),
        }
    }

    pub fn read_hash256(&mut self, expected: &str) -> Result<Hash256> {
        match self.expect_field(expected)? {
            FieldValue::Hash256(hash) => Ok(hash),
            other => Err(Error::UnexpectedField(format!(
                "{} decoded as {:?}",
                expected, other
            ))),
        }
    }

    fn expect_field(&mut self, expected: &str) -> Result<FieldValue> {
        match self.next_field()? {
            Some((name, value)) if name == expected => Ok(value),
            Some((name, _)) => Err(Error::UnexpectedField(format!(
                "expected {}, found {}",
                expected, name
            ))),
            None => Err(Error::UnexpectedField(format!(
                "expected {}, buffer exhausted",
                expected
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::CanonicalWriter;

    fn sample_bytes() -> Vec<u8> {
        let mut writer = CanonicalWriter::new();
        writer.push("TransactionType", FieldValue::UInt16(0)).unwrap();
        writer.push("Sequence", FieldValue::UInt32(42)).unwrap();
        writer
            .push("Account", FieldValue::Account(AccountId([3u8; 20])))
            .unwrap();
        writer
            .push("Fee", FieldValue::Amount(Amount::drops(12).unwrap()))
            .unwrap();
        writer.finish(false).unwrap()
    }

    #[test]
    fn streaming_reads_every_field_in_order() {
        let bytes = sample_bytes();
        let mut reader = CanonicalReader::new(&bytes);
        let mut names = vec![];
        while let Some((name, _)) = reader.next_field().unwrap() {
            names.push(name);
        }
        assert_eq!(names, vec!["TransactionType", "Sequence", "Fee", "Account"]);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn read_all_roundtrips_through_writer() {
        let bytes = sample_bytes();
        let object = CanonicalReader::new(&bytes).read_all().unwrap();
        assert_eq!(object.serialize().unwrap(), bytes);
    }

    #[test]
    fn truncated_buffer_is_never_a_partial_object() {
        let bytes = sample_bytes();
        let mut reader = CanonicalReader::new(&bytes[..bytes.len() - 1]);
        assert!(reader.read_all().is_err());
    }

    #[test]
    fn unknown_field_code_fails() {
        // header (5, 30): type Hash256, no field 30 registered
        let mut bytes = FieldId::new(5, 30).serialize().unwrap();
        bytes.extend([0u8; 32]);
        let mut reader = CanonicalReader::new(&bytes);
        assert!(matches!(
            reader.next_field(),
            Err(Error::UnknownField { .. })
        ));
    }

    #[test]
    fn typed_accessors_enforce_field_identity() {
        let mut writer = CanonicalWriter::new();
        writer.push("Sequence", FieldValue::UInt32(9)).unwrap();
        let bytes = writer.finish(false).unwrap();

        let mut reader = CanonicalReader::new(&bytes);
        assert_eq!(reader.read_u32("Sequence").unwrap(), 9);

        let mut reader = CanonicalReader::new(&bytes);
        assert!(reader.read_u32("OfferSequence").is_err());
    }

    #[test]
    fn try_read_field_id_signals_clean_end() {
        let mut reader = CanonicalReader::new(&[]);
        assert!(reader.try_read_field_id().unwrap().is_none());
    }
}
