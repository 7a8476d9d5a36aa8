use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 20-byte currency code.
///
/// Three-letter ISO-style codes occupy bytes 12..15 of an otherwise
/// zero buffer; anything else is a full 160-bit custom code carried
/// verbatim. The all-zero buffer stands for the native token and is
/// not a legal issued-currency code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyCode(pub [u8; 20]);

impl CurrencyCode {
    pub const LEN: usize = 20;

    /// Build a code from a 3-character ISO-style symbol. Characters may
    /// be ASCII letters, digits and a small punctuation set, matching
    /// what the network accepts.
    pub fn from_iso(symbol: &str) -> Result<CurrencyCode> {
        if symbol.len() != 3 {
            return Err(Error::ValueRange(format!(
                "currency symbol must be 3 characters: {:?}",
                symbol
            )));
        }
        if symbol == "XRP" {
            return Err(Error::ValueRange(
                "the native token has no issued-currency code".to_string(),
            ));
        }
        let mut buf = [0u8; 20];
        for (i, c) in symbol.bytes().enumerate() {
            if !is_iso_char(c) {
                return Err(Error::ValueRange(format!(
                    "currency symbol character {:?} not representable",
                    c as char
                )));
            }
            buf[12 + i] = c;
        }
        Ok(CurrencyCode(buf))
    }

    /// Build a custom 160-bit code used verbatim on the wire.
    pub fn from_bytes(bytes: &[u8]) -> Result<CurrencyCode> {
        if bytes.len() != 20 {
            return Err(Error::ValueRange(format!(
                "currency code expects 20 bytes, got {}",
                bytes.len()
            )));
        }
        let mut buf = [0u8; 20];
        buf.copy_from_slice(bytes);
        Ok(CurrencyCode(buf))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Returns the ISO symbol when the byte layout matches the ISO
    /// form: bytes 12..15 populated, everything else zero.
    pub fn iso_symbol(&self) -> Option<String> {
        let prefix_zero = self.0[..12].iter().all(|b| *b == 0);
        let suffix_zero = self.0[15..].iter().all(|b| *b == 0);
        let body = &self.0[12..15];
        if prefix_zero && suffix_zero && body.iter().any(|b| *b != 0) {
            if body.iter().all(|b| is_iso_char(*b)) {
                return Some(String::from_utf8_lossy(body).to_string());
            }
        }
        None
    }
}

fn is_iso_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'?' | b'!' | b'@' | b'#' | b'$' | b'%' | b'^' | b'&' | b'*' | b'<' | b'>' | b'(' | b')' | b'{' | b'}' | b'[' | b']' | b'|')
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.iso_symbol() {
            Some(symbol) => write!(f, "{}", symbol),
            None => write!(f, "{}", hex::encode_upper(self.0)),
        }
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurrencyCode({})", self)
    }
}

impl FromStr for CurrencyCode {
    type Err = Error;

    /// Accepts either a 3-character symbol or 40 hex digits.
    fn from_str(s: &str) -> Result<CurrencyCode> {
        if s.len() == 40 {
            let bytes = hex::decode(s)?;
            return CurrencyCode::from_bytes(&bytes);
        }
        CurrencyCode::from_iso(s)
    }
}
