use crate::account::AccountId;
use crate::amount::Amount;
use crate::error::{Error, Result};
use crate::field::{
    FieldId, TYPE_ACCOUNT, TYPE_AMOUNT, TYPE_ARRAY, TYPE_BLOB, TYPE_HASH128, TYPE_HASH160,
    TYPE_HASH256, TYPE_OBJECT, TYPE_PATHSET, TYPE_UINT16, TYPE_UINT32, TYPE_UINT64, TYPE_UINT8,
    TYPE_VECTOR256,
};
use crate::hashes::{Hash128, Hash160, Hash256};
use crate::pathset::PathSet;
use crate::registry::FIELD_REGISTRY;
use crate::writer::CanonicalWriter;

/// Longest blob the graduated length prefix can describe.
pub const MAX_VL_LENGTH: usize = 918_744;

/// End-of-object marker, field (14, 1).
pub fn object_end_marker() -> FieldId {
    FieldId::new(TYPE_OBJECT, 1)
}

/// End-of-array marker, field (15, 1).
pub fn array_end_marker() -> FieldId {
    FieldId::new(TYPE_ARRAY, 1)
}

/// Emit the graduated variable-length prefix. Three ranges with three
/// widths; the exact thresholds are wire-visible and fixed by the
/// network.
pub fn vl_encode(len: usize, out: &mut Vec<u8>) -> Result<()> {
    if len <= 192 {
        out.push(len as u8);
    } else if len <= 12_480 {
        let adjusted = len - 193;
        out.push(193 + (adjusted >> 8) as u8);
        out.push((adjusted & 0xff) as u8);
    } else if len <= MAX_VL_LENGTH {
        let adjusted = len - 12_481;
        out.push(241 + (adjusted >> 16) as u8);
        out.push(((adjusted >> 8) & 0xff) as u8);
        out.push((adjusted & 0xff) as u8);
    } else {
        return Err(Error::ValueRange(format!(
            "blob of {} bytes exceeds the {} maximum",
            len, MAX_VL_LENGTH
        )));
    }
    Ok(())
}

/// Decode a variable-length prefix at `*cursor`, advancing the cursor
/// past the prefix and returning the declared length.
pub fn vl_decode(bytes: &[u8], cursor: &mut usize) -> Result<usize> {
    let b1 = *take(bytes, cursor, 1)?.first().unwrap() as usize;
    if b1 <= 192 {
        Ok(b1)
    } else if b1 <= 240 {
        let b2 = take(bytes, cursor, 1)?[0] as usize;
        Ok(193 + ((b1 - 193) << 8) + b2)
    } else if b1 <= 254 {
        let rest = take(bytes, cursor, 2)?;
        let (b2, b3) = (rest[0] as usize, rest[1] as usize);
        Ok(12_481 + ((b1 - 241) << 16) + (b2 << 8) + b3)
    } else {
        Err(Error::ValueRange(
            "reserved variable-length prefix byte 255".to_string(),
        ))
    }
}

fn take<'a>(bytes: &'a [u8], cursor: &mut usize, len: usize) -> Result<&'a [u8]> {
    let remaining = bytes.len().saturating_sub(*cursor);
    if remaining < len {
        return Err(Error::TruncatedInput {
            needed: len,
            remaining,
        });
    }
    let slice = &bytes[*cursor..*cursor + len];
    *cursor += len;
    Ok(slice)
}

/// A set of (field name, value) pairs forming one serialized object.
///
/// Insertion order is preserved so that buffers decoded from the wire
/// round-trip in the order they arrived; serialization always emits
/// canonical order regardless.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StObject {
    fields: Vec<(String, FieldValue)>,
}

impl StObject {
    pub fn new() -> StObject {
        StObject { fields: vec![] }
    }

    /// Assign a field. Assigning the same name twice is a programmer
    /// error surfaced as `DuplicateField`.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<()> {
        if self.fields.iter().any(|(n, _)| n == name) {
            return Err(Error::DuplicateField(name.to_string()));
        }
        self.fields.push((name.to_string(), value));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Canonical bytes of the object's contents (no end marker).
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut writer = CanonicalWriter::new();
        for (name, value) in &self.fields {
            writer.push(name, value.clone())?;
        }
        writer.finish(false)
    }

    /// Decode object contents up to (and consuming) the end-of-object
    /// marker.
    fn deserialize_contents(bytes: &[u8], cursor: &mut usize) -> Result<StObject> {
        let mut object = StObject::new();
        loop {
            let (id, consumed) = FieldId::deserialize(bytes, *cursor)?;
            *cursor += consumed;
            if id == object_end_marker() {
                return Ok(object);
            }
            let info = FIELD_REGISTRY.get_by_id(id)?;
            let name = info.name().to_string();
            let value = FieldValue::deserialize(id.type_code(), bytes, cursor)?;
            object.set(&name, value)?;
        }
    }
}

/// A decoded field value, tagged by wire type. One variant per type
/// code; the codec dispatches on the registry's type code, never on
/// ad hoc knowledge of individual fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Hash128(Hash128),
    Hash160(Hash160),
    Hash256(Hash256),
    Blob(Vec<u8>),
    Account(AccountId),
    Amount(Amount),
    Object(StObject),
    /// Array elements are named inner objects, e.g. a list of
    /// ("SignerEntry", {...}) pairs.
    Array(Vec<(String, StObject)>),
    PathSet(PathSet),
    Vector256(Vec<Hash256>),
}

impl FieldValue {
    /// The wire type this value serializes as.
    pub fn type_code(&self) -> u16 {
        match self {
            FieldValue::UInt8(_) => TYPE_UINT8,
            FieldValue::UInt16(_) => TYPE_UINT16,
            FieldValue::UInt32(_) => TYPE_UINT32,
            FieldValue::UInt64(_) => TYPE_UINT64,
            FieldValue::Hash128(_) => TYPE_HASH128,
            FieldValue::Hash160(_) => TYPE_HASH160,
            FieldValue::Hash256(_) => TYPE_HASH256,
            FieldValue::Blob(_) => TYPE_BLOB,
            FieldValue::Account(_) => TYPE_ACCOUNT,
            FieldValue::Amount(_) => TYPE_AMOUNT,
            FieldValue::Object(_) => TYPE_OBJECT,
            FieldValue::Array(_) => TYPE_ARRAY,
            FieldValue::PathSet(_) => TYPE_PATHSET,
            FieldValue::Vector256(_) => TYPE_VECTOR256,
        }
    }

    /// Append the value's wire encoding (without its field-ID header).
    pub fn serialize_into(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            FieldValue::UInt8(v) => out.push(*v),
            FieldValue::UInt16(v) => out.extend(&v.to_be_bytes()),
            FieldValue::UInt32(v) => out.extend(&v.to_be_bytes()),
            FieldValue::UInt64(v) => out.extend(&v.to_be_bytes()),
            FieldValue::Hash128(v) => out.extend(v.as_bytes()),
            FieldValue::Hash160(v) => out.extend(v.as_bytes()),
            FieldValue::Hash256(v) => out.extend(v.as_bytes()),
            FieldValue::Blob(data) => {
                vl_encode(data.len(), out)?;
                out.extend(data);
            }
            FieldValue::Account(account) => {
                // always a 0x14 length byte then the 20 bytes
                vl_encode(AccountId::LEN, out)?;
                out.extend(account.as_bytes());
            }
            FieldValue::Amount(amount) => out.extend(amount.serialize()),
            FieldValue::Object(object) => {
                out.extend(object.serialize()?);
                out.extend(object_end_marker().serialize()?);
            }
            FieldValue::Array(elements) => {
                for (name, object) in elements {
                    let info = FIELD_REGISTRY.get(name)?;
                    if info.id().type_code() != TYPE_OBJECT {
                        return Err(Error::UnexpectedField(format!(
                            "array element {} is not an object field",
                            name
                        )));
                    }
                    out.extend(info.id().serialize()?);
                    out.extend(object.serialize()?);
                    out.extend(object_end_marker().serialize()?);
                }
                out.extend(array_end_marker().serialize()?);
            }
            FieldValue::PathSet(set) => out.extend(set.serialize()),
            FieldValue::Vector256(hashes) => {
                vl_encode(hashes.len() * Hash256::LEN, out)?;
                for hash in hashes {
                    out.extend(hash.as_bytes());
                }
            }
        }
        Ok(())
    }

    /// Decode a value of the given wire type at `*cursor`, advancing
    /// the cursor past it.
    pub fn deserialize(type_code: u16, bytes: &[u8], cursor: &mut usize) -> Result<FieldValue> {
        let value = match type_code {
            TYPE_UINT8 => FieldValue::UInt8(take(bytes, cursor, 1)?[0]),
            TYPE_UINT16 => {
                let raw = take(bytes, cursor, 2)?;
                FieldValue::UInt16(u16::from_be_bytes([raw[0], raw[1]]))
            }
            TYPE_UINT32 => {
                let raw = take(bytes, cursor, 4)?;
                FieldValue::UInt32(u32::from_be_bytes(raw.try_into().unwrap()))
            }
            TYPE_UINT64 => {
                let raw = take(bytes, cursor, 8)?;
                FieldValue::UInt64(u64::from_be_bytes(raw.try_into().unwrap()))
            }
            TYPE_HASH128 => {
                FieldValue::Hash128(Hash128::from_bytes(take(bytes, cursor, Hash128::LEN)?)?)
            }
            TYPE_HASH160 => {
                FieldValue::Hash160(Hash160::from_bytes(take(bytes, cursor, Hash160::LEN)?)?)
            }
            TYPE_HASH256 => {
                FieldValue::Hash256(Hash256::from_bytes(take(bytes, cursor, Hash256::LEN)?)?)
            }
            TYPE_BLOB => {
                let len = vl_decode(bytes, cursor)?;
                FieldValue::Blob(take(bytes, cursor, len)?.to_vec())
            }
            TYPE_ACCOUNT => {
                let len = vl_decode(bytes, cursor)?;
                if len != AccountId::LEN {
                    return Err(Error::ValueRange(format!(
                        "account field with length prefix {}",
                        len
                    )));
                }
                FieldValue::Account(AccountId::from_bytes(take(bytes, cursor, len)?)?)
            }
            TYPE_AMOUNT => {
                let (amount, consumed) = Amount::deserialize(bytes, *cursor)?;
                *cursor += consumed;
                FieldValue::Amount(amount)
            }
            TYPE_OBJECT => FieldValue::Object(StObject::deserialize_contents(bytes, cursor)?),
            TYPE_ARRAY => {
                let mut elements = vec![];
                loop {
                    let (id, consumed) = FieldId::deserialize(bytes, *cursor)?;
                    *cursor += consumed;
                    if id == array_end_marker() {
                        break;
                    }
                    if id.type_code() != TYPE_OBJECT {
                        return Err(Error::UnexpectedField(format!(
                            "array element with type code {}",
                            id.type_code()
                        )));
                    }
                    let info = FIELD_REGISTRY.get_by_id(id)?;
                    let name = info.name().to_string();
                    let object = StObject::deserialize_contents(bytes, cursor)?;
                    elements.push((name, object));
                }
                FieldValue::Array(elements)
            }
            TYPE_PATHSET => {
                let (set, consumed) = PathSet::deserialize(bytes, *cursor)?;
                *cursor += consumed;
                FieldValue::PathSet(set)
            }
            TYPE_VECTOR256 => {
                let len = vl_decode(bytes, cursor)?;
                if len % Hash256::LEN != 0 {
                    return Err(Error::ValueRange(format!(
                        "vector256 length {} not a multiple of 32",
                        len
                    )));
                }
                let raw = take(bytes, cursor, len)?;
                let hashes = raw
                    .chunks(Hash256::LEN)
                    .map(Hash256::from_bytes)
                    .collect::<Result<Vec<_>>>()?;
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

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            FieldValue::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Blob(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_account(&self) -> Option<&AccountId> {
        match self {
            FieldValue::Account(account) => Some(account),
            _ => None,
        }
    }

    pub fn as_amount(&self) -> Option<&Amount> {
        match self {
            FieldValue::Amount(amount) => Some(amount),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vl_roundtrip(len: usize) -> usize {
        let mut out = vec![];
        vl_encode(len, &mut out).unwrap();
        let mut cursor = 0;
        assert_eq!(vl_decode(&out, &mut cursor).unwrap(), len);
        assert_eq!(cursor, out.len());
        out.len()
    }

    #[test]
    fn vl_prefix_width_boundaries() {
        assert_eq!(vl_roundtrip(0), 1);
        assert_eq!(vl_roundtrip(192), 1);
        assert_eq!(vl_roundtrip(193), 2);
        assert_eq!(vl_roundtrip(12_480), 2);
        assert_eq!(vl_roundtrip(12_481), 3);
        assert_eq!(vl_roundtrip(MAX_VL_LENGTH), 3);

        let mut out = vec![];
        assert!(vl_encode(MAX_VL_LENGTH + 1, &mut out).is_err());
    }

    #[test]
    fn vl_two_byte_formula() {
        let mut out = vec![];
        vl_encode(193, &mut out).unwrap();
        assert_eq!(out, vec![193, 0]);
        out.clear();
        vl_encode(12_480, &mut out).unwrap();
        assert_eq!(out, vec![240, 255]);
    }

    #[test]
    fn account_field_uses_0x14_prefix() {
        let mut out = vec![];
        FieldValue::Account(AccountId([9u8; 20]))
            .serialize_into(&mut out)
            .unwrap();
        assert_eq!(out[0], 0x14);
        assert_eq!(out.len(), 21);
    }

    #[test]
    fn integers_are_big_endian_fixed_width() {
        let mut out = vec![];
        FieldValue::UInt32(0xdeadbeef).serialize_into(&mut out).unwrap();
        assert_eq!(out, vec![0xde, 0xad, 0xbe, 0xef]);

        let mut cursor = 0;
        let back = FieldValue::deserialize(TYPE_UINT32, &out, &mut cursor).unwrap();
        assert_eq!(back, FieldValue::UInt32(0xdeadbeef));
    }

    #[test]
    fn nested_object_roundtrip() {
        let mut entry = StObject::new();
        entry
            .set("Account", FieldValue::Account(AccountId([1u8; 20])))
            .unwrap();
        entry.set("SignerWeight", FieldValue::UInt16(1)).unwrap();

        let mut out = vec![];
        FieldValue::Object(entry.clone()).serialize_into(&mut out).unwrap();
        // object contents end with the (14, 1) marker byte 0xe1
        assert_eq!(*out.last().unwrap(), 0xe1);

        let mut cursor = 0;
        let back = FieldValue::deserialize(TYPE_OBJECT, &out, &mut cursor).unwrap();
        match back {
            FieldValue::Object(decoded) => {
                assert_eq!(decoded.get("SignerWeight"), Some(&FieldValue::UInt16(1)));
                assert_eq!(
                    decoded.get("Account"),
                    Some(&FieldValue::Account(AccountId([1u8; 20])))
                );
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn nested_array_roundtrip() {
        let mut entry = StObject::new();
        entry
            .set("Account", FieldValue::Account(AccountId([7u8; 20])))
            .unwrap();
        entry.set("SignerWeight", FieldValue::UInt16(2)).unwrap();
        let array = FieldValue::Array(vec![("SignerEntry".to_string(), entry)]);

        let mut out = vec![];
        array.serialize_into(&mut out).unwrap();
        // array contents end with the (15, 1) marker byte 0xf1
        assert_eq!(*out.last().unwrap(), 0xf1);

        let mut cursor = 0;
        let back = FieldValue::deserialize(TYPE_ARRAY, &out, &mut cursor).unwrap();
        assert_eq!(back, array);
        assert_eq!(cursor, out.len());
    }

    #[test]
    fn duplicate_assignment_rejected() {
        let mut object = StObject::new();
        object.set("Sequence", FieldValue::UInt32(1)).unwrap();
        assert!(matches!(
            object.set("Sequence", FieldValue::UInt32(2)),
            Err(Error::DuplicateField(_))
        ));
    }

    #[test]
    fn blob_truncation_detected() {
        let mut out = vec![];
        FieldValue::Blob(vec![0xaa; 64]).serialize_into(&mut out).unwrap();
        let mut cursor = 0;
        assert!(matches!(
            FieldValue::deserialize(TYPE_BLOB, &out[..out.len() - 1], &mut cursor),
            Err(Error::TruncatedInput { .. })
        ));
    }
}
