use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};

/// Wire type codes. Every field in the registry carries one of these;
/// the code doubles as the major sort key for canonical ordering.
pub const TYPE_UINT16: u16 = 1;
pub const TYPE_UINT32: u16 = 2;
pub const TYPE_UINT64: u16 = 3;
pub const TYPE_HASH128: u16 = 4;
pub const TYPE_HASH256: u16 = 5;
pub const TYPE_AMOUNT: u16 = 6;
pub const TYPE_BLOB: u16 = 7;
pub const TYPE_ACCOUNT: u16 = 8;
pub const TYPE_OBJECT: u16 = 14;
pub const TYPE_ARRAY: u16 = 15;
pub const TYPE_UINT8: u16 = 16;
pub const TYPE_HASH160: u16 = 17;
pub const TYPE_PATHSET: u16 = 18;
pub const TYPE_VECTOR256: u16 = 19;

/// The two-part numeric key identifying a field's meaning and wire type.
///
/// Identifiers sort by type code then field code; that ordering is the
/// canonical order every serialized object must reproduce byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId {
    type_code: u16,
    field_code: u16,
}

impl FieldId {
    pub fn new(type_code: u16, field_code: u16) -> FieldId {
        FieldId {
            type_code,
            field_code,
        }
    }

    pub fn type_code(&self) -> u16 {
        self.type_code
    }

    pub fn field_code(&self) -> u16 {
        self.field_code
    }

    /// Serialize the id into its 1-3 byte wire header.
    ///
    /// Codes below 16 pack into a shared nibble byte; larger codes
    /// spill into trailing bytes with a zero nibble flagging the spill.
    /// Each spill byte holds one code, so codes above 255 have no wire
    /// form and are rejected rather than truncated.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let t = self.type_code;
        let f = self.field_code;
        if t > 255 || f > 255 {
            return Err(Error::ValueRange(format!(
                "field id ({}, {}) exceeds the header's byte range",
                t, f
            )));
        }
        Ok(match (t < 16, f < 16) {
            (true, true) => vec![((t as u8) << 4) | f as u8],
            (true, false) => vec![(t as u8) << 4, f as u8],
            (false, true) => vec![f as u8, t as u8],
            (false, false) => vec![0u8, t as u8, f as u8],
        })
    }

    /// Decode a field-ID header starting at `cursor`. Returns the id and
    /// the number of bytes consumed.
    pub fn deserialize(bytes: &[u8], cursor: usize) -> Result<(FieldId, usize)> {
        let first = *bytes
            .get(cursor)
            .ok_or(Error::MalformedFieldId(cursor))?;
        let type_nibble = (first >> 4) as u16;
        let field_nibble = (first & 0x0f) as u16;
        match (type_nibble, field_nibble) {
            (0, 0) => {
                let t = *bytes
                    .get(cursor + 1)
                    .ok_or(Error::MalformedFieldId(cursor + 1))?;
                let f = *bytes
                    .get(cursor + 2)
                    .ok_or(Error::MalformedFieldId(cursor + 2))?;
                Ok((FieldId::new(t as u16, f as u16), 3))
            }
            (0, f) => {
                let t = *bytes
                    .get(cursor + 1)
                    .ok_or(Error::MalformedFieldId(cursor + 1))?;
                Ok((FieldId::new(t as u16, f), 2))
            }
            (t, 0) => {
                let f = *bytes
                    .get(cursor + 1)
                    .ok_or(Error::MalformedFieldId(cursor + 1))?;
                Ok((FieldId::new(t, f as u16), 2))
            }
            (t, f) => Ok((FieldId::new(t, f), 1)),
        }
    }
}

impl Ord for FieldId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_code
            .cmp(&other.type_code)
            .then(self.field_code.cmp(&other.field_code))
    }
}

impl PartialOrd for FieldId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.type_code, self.field_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(t: u16, f: u16) -> usize {
        let id = FieldId::new(t, f);
        let bytes = id.serialize().unwrap();
        let (decoded, consumed) = FieldId::deserialize(&bytes, 0).unwrap();
        assert_eq!(decoded, id);
        assert_eq!(consumed, bytes.len());
        bytes.len()
    }

    #[test]
    fn field_id_byte_length_branches() {
        // each boundary code exercises a distinct header length
        assert_eq!(roundtrip(1, 1), 1);
        assert_eq!(roundtrip(15, 15), 1);
        assert_eq!(roundtrip(15, 16), 2);
        assert_eq!(roundtrip(16, 15), 2);
        assert_eq!(roundtrip(16, 16), 3);
        assert_eq!(roundtrip(255, 255), 3);
        // codes past the spill-byte range never reach the wire
        assert!(matches!(
            FieldId::new(256, 1).serialize(),
            Err(Error::ValueRange(_))
        ));
        assert!(matches!(
            FieldId::new(1, 256).serialize(),
            Err(Error::ValueRange(_))
        ));
    }

    #[test]
    fn field_id_known_encodings() {
        // TransactionType: UInt16 type 1, field 2
        assert_eq!(FieldId::new(1, 2).serialize().unwrap(), vec![0x12]);
        // LastLedgerSequence: UInt32 type 2, field 27
        assert_eq!(FieldId::new(2, 27).serialize().unwrap(), vec![0x20, 27]);
        // UInt8 TickSize: type 16, field 16
        assert_eq!(FieldId::new(16, 16).serialize().unwrap(), vec![0x00, 16, 16]);
        // PathSet Paths: type 18, field 1
        assert_eq!(FieldId::new(18, 1).serialize().unwrap(), vec![0x01, 18]);
    }

    #[test]
    fn field_id_truncated_header_fails() {
        // spilled type byte missing
        assert!(matches!(
            FieldId::deserialize(&[0x01], 0),
            Err(Error::MalformedFieldId(_))
        ));
        // three-byte form cut short
        assert!(matches!(
            FieldId::deserialize(&[0x00, 16], 0),
            Err(Error::MalformedFieldId(_))
        ));
        assert!(matches!(
            FieldId::deserialize(&[], 0),
            Err(Error::MalformedFieldId(_))
        ));
    }

    #[test]
    fn field_id_canonical_ordering() {
        let mut ids = vec![
            FieldId::new(16, 1),
            FieldId::new(1, 2),
            FieldId::new(2, 27),
            FieldId::new(2, 4),
            FieldId::new(8, 1),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                FieldId::new(1, 2),
                FieldId::new(2, 4),
                FieldId::new(2, 27),
                FieldId::new(8, 1),
                FieldId::new(16, 1),
            ]
        );
    }
}
