use std::fmt;
use std::str::FromStr;

use crate::account::AccountId;
use crate::currency::CurrencyCode;
use crate::error::{Error, Result};

/// Largest meaningful drop count: 100 billion units of the native token.
pub const MAX_DROPS: u64 = 100_000_000_000_000_000;

const NATIVE_BIT: u64 = 1 << 63;
const SIGN_BIT: u64 = 1 << 62;
const MANTISSA_MASK: u64 = (1 << 54) - 1;
const DROPS_MASK: u64 = (1 << 62) - 1;

const MIN_MANTISSA: u64 = 1_000_000_000_000_000;
const MAX_MANTISSA: u64 = 9_999_999_999_999_999;
const MIN_EXPONENT: i32 = -96;
const MAX_EXPONENT: i32 = 80;
const EXPONENT_BIAS: i32 = 97;

/// The packed-decimal value of an issued amount: a 16-significant-digit
/// mantissa, a biased exponent, and a sign. The value zero has its own
/// all-zero wire encoding and is represented here by a zero mantissa.
///
/// Range checks happen at construction; a value that exists is always
/// serializable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuedValue {
    mantissa: u64,
    exponent: i32,
    negative: bool,
}

impl IssuedValue {
    pub fn zero() -> IssuedValue {
        IssuedValue {
            mantissa: 0,
            exponent: 0,
            negative: false,
        }
    }

    /// Build a value from an unnormalized mantissa/exponent pair,
    /// normalizing the mantissa to 16 significant digits.
    pub fn new(mantissa: u64, exponent: i32, negative: bool) -> Result<IssuedValue> {
        if mantissa == 0 {
            return Ok(IssuedValue::zero());
        }
        let mut mantissa = mantissa;
        let mut exponent = exponent;
        while mantissa < MIN_MANTISSA {
            if exponent <= MIN_EXPONENT {
                return Err(Error::ValueRange(format!(
                    "issued value underflows the packed decimal: {}e{}",
                    mantissa, exponent
                )));
            }
            mantissa *= 10;
            exponent -= 1;
        }
        while mantissa > MAX_MANTISSA {
            if mantissa % 10 != 0 {
                return Err(Error::ValueRange(format!(
                    "issued value needs more than 16 significant digits: {}e{}",
                    mantissa, exponent
                )));
            }
            mantissa /= 10;
            exponent += 1;
        }
        if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
            return Err(Error::ValueRange(format!(
                "issued value exponent {} outside [{}, {}]",
                exponent, MIN_EXPONENT, MAX_EXPONENT
            )));
        }
        Ok(IssuedValue {
            mantissa,
            exponent,
            negative,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Pack into the 8-byte wire word: top bit clear (issued), then the
    /// sign bit (1 = positive), the biased exponent, the mantissa.
    pub fn to_packed(&self) -> u64 {
        if self.mantissa == 0 {
            return 0;
        }
        let mut word = 0u64;
        if !self.negative {
            word |= SIGN_BIT;
        }
        word |= (((self.exponent + EXPONENT_BIAS) as u64) & 0xff) << 54;
        word |= self.mantissa & MANTISSA_MASK;
        word
    }

    pub fn from_packed(word: u64) -> Result<IssuedValue> {
        if word & NATIVE_BIT != 0 {
            return Err(Error::ValueRange(
                "native bit set in issued value".to_string(),
            ));
        }
        if word == 0 {
            return Ok(IssuedValue::zero());
        }
        let negative = word & SIGN_BIT == 0;
        let exponent = ((word >> 54) & 0xff) as i32 - EXPONENT_BIAS;
        let mantissa = word & MANTISSA_MASK;
        if !(MIN_MANTISSA..=MAX_MANTISSA).contains(&mantissa) {
            return Err(Error::ValueRange(format!(
                "issued mantissa {} not normalized",
                mantissa
            )));
        }
        if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
            return Err(Error::ValueRange(format!(
                "issued exponent {} out of range",
                exponent
            )));
        }
        Ok(IssuedValue {
            mantissa,
            exponent,
            negative,
        })
    }
}

impl FromStr for IssuedValue {
    type Err = Error;

    /// Parse a decimal string, optionally signed, with an optional
    /// fraction and `e` exponent. Digits beyond 16 significant figures
    /// are a hard error, never silently rounded.
    fn from_str(s: &str) -> Result<IssuedValue> {
        let bad = |why: &str| Error::ValueRange(format!("bad decimal {:?}: {}", s, why));

        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (body, exp_part) = match rest.find(|c| c == 'e' || c == 'E') {
            Some(i) => (&rest[..i], Some(&rest[i + 1..])),
            None => (rest, None),
        };
        let mut exponent: i32 = match exp_part {
            Some(e) => e.parse().map_err(|_| bad("unparseable exponent"))?,
            None => 0,
        };

        let (int_part, frac_part) = match body.find('.') {
            Some(i) => (&body[..i], &body[i + 1..]),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(bad("no digits"));
        }
        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        for c in int_part.chars().chain(frac_part.chars()) {
            if !c.is_ascii_digit() {
                return Err(bad("non-digit character"));
            }
            digits.push(c);
        }
        exponent -= frac_part.len() as i32;

        // strip leading zeros, then trailing zeros (shifting the exponent)
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(IssuedValue::zero());
        }
        let stripped = digits.trim_end_matches('0');
        exponent += (digits.len() - stripped.len()) as i32;

        if stripped.len() > 16 {
            return Err(bad("more than 16 significant digits"));
        }
        let mantissa: u64 = stripped.parse().map_err(|_| bad("mantissa overflow"))?;
        IssuedValue::new(mantissa, exponent, negative)
    }
}

impl fmt::Display for IssuedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mantissa == 0 {
            return write!(f, "0");
        }
        let digits = self.mantissa.to_string();
        let stripped = digits.trim_end_matches('0');
        let exponent = self.exponent + (digits.len() - stripped.len()) as i32;
        let sign = if self.negative { "-" } else { "" };

        // the decimal-point position relative to the significant digits
        let point = stripped.len() as i32 + exponent;
        if exponent >= 0 && point <= 21 {
            let zeros = "0".repeat(exponent as usize);
            write!(f, "{}{}{}", sign, stripped, zeros)
        } else if exponent < 0 && point > 0 {
            let (int_digits, frac_digits) = stripped.split_at(point as usize);
            write!(f, "{}{}.{}", sign, int_digits, frac_digits)
        } else if exponent < 0 && point > -6 {
            let zeros = "0".repeat((-point) as usize);
            write!(f, "{}0.{}{}", sign, zeros, stripped)
        } else {
            write!(f, "{}{}e{}", sign, stripped, exponent)
        }
    }
}

/// A currency amount: either a native-token drop count or an issued
/// amount (packed decimal + currency + issuer). The two forms have
/// different wire widths — 8 bytes native, 48 bytes issued — told apart
/// by the top bit of the first byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Amount {
    Xrp(u64),
    Issued {
        value: IssuedValue,
        currency: CurrencyCode,
        issuer: AccountId,
    },
}

impl Amount {
    /// A native amount, rejected at construction when above the
    /// protocol maximum.
    pub fn drops(drops: u64) -> Result<Amount> {
        if drops > MAX_DROPS {
            return Err(Error::ValueRange(format!(
                "{} drops exceeds the {} maximum",
                drops, MAX_DROPS
            )));
        }
        Ok(Amount::Xrp(drops))
    }

    pub fn issued(value: &str, currency: CurrencyCode, issuer: AccountId) -> Result<Amount> {
        Ok(Amount::Issued {
            value: value.parse()?,
            currency,
            issuer,
        })
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Amount::Xrp(_))
    }

    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Amount::Xrp(drops) => {
                // top bit flags the native form, next bit is the
                // (always positive) sign
                let word = NATIVE_BIT | SIGN_BIT | (drops & DROPS_MASK);
                word.to_be_bytes().to_vec()
            }
            Amount::Issued {
                value,
                currency,
                issuer,
            } => {
                let mut bytes = Vec::with_capacity(48);
                bytes.extend(&value.to_packed().to_be_bytes());
                bytes.extend(currency.as_bytes());
                bytes.extend(issuer.as_bytes());
                bytes
            }
        }
    }

    /// Decode an amount starting at `cursor`; returns the amount and
    /// the number of bytes consumed (8 or 48).
    pub fn deserialize(bytes: &[u8], cursor: usize) -> Result<(Amount, usize)> {
        let remaining = bytes.len().saturating_sub(cursor);
        if remaining < 8 {
            return Err(Error::TruncatedInput {
                needed: 8,
                remaining,
            });
        }
        let mut word_bytes = [0u8; 8];
        word_bytes.copy_from_slice(&bytes[cursor..cursor + 8]);
        let word = u64::from_be_bytes(word_bytes);

        if word & NATIVE_BIT != 0 {
            let drops = word & DROPS_MASK;
            if word & SIGN_BIT == 0 && drops != 0 {
                return Err(Error::ValueRange(
                    "negative native amount".to_string(),
                ));
            }
            if drops > MAX_DROPS {
                return Err(Error::ValueRange(format!(
                    "{} drops exceeds the {} maximum",
                    drops, MAX_DROPS
                )));
            }
            return Ok((Amount::Xrp(drops), 8));
        }

        if remaining < 48 {
            return Err(Error::TruncatedInput {
                needed: 48,
                remaining,
            });
        }
        let value = IssuedValue::from_packed(word)?;
        let currency = CurrencyCode::from_bytes(&bytes[cursor + 8..cursor + 28])?;
        let issuer = AccountId::from_bytes(&bytes[cursor + 28..cursor + 48])?;
        if currency.is_zero() {
            return Err(Error::ValueRange(
                "issued amount with native currency code".to_string(),
            ));
        }
        Ok((
            Amount::Issued {
                value,
                currency,
                issuer,
            },
            48,
        ))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Xrp(drops) => write!(f, "{}", drops),
            Amount::Issued {
                value,
                currency,
                issuer,
            } => write!(f, "{}/{}/{}", value, currency, issuer),
        }
    }
}
