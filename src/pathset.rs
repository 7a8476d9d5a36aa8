use crate::account::AccountId;
use crate::currency::CurrencyCode;
use crate::error::{Error, Result};

const STEP_ACCOUNT: u8 = 0x01;
const STEP_CURRENCY: u8 = 0x10;
const STEP_ISSUER: u8 = 0x20;
const PATH_SEPARATOR: u8 = 0xff;
const PATHSET_END: u8 = 0x00;

/// One step of a payment path. At least one component must be present;
/// the presence bits are packed into a single marker byte on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathStep {
    account: Option<AccountId>,
    currency: Option<CurrencyCode>,
    issuer: Option<AccountId>,
}

impl PathStep {
    pub fn with_account(account: AccountId) -> PathStep {
        PathStep {
            account: Some(account),
            ..Default::default()
        }
    }

    pub fn with_currency(currency: CurrencyCode) -> PathStep {
        PathStep {
            currency: Some(currency),
            ..Default::default()
        }
    }

    pub fn with_currency_and_issuer(currency: CurrencyCode, issuer: AccountId) -> PathStep {
        PathStep {
            account: None,
            currency: Some(currency),
            issuer: Some(issuer),
        }
    }

    pub fn account(&self) -> Option<&AccountId> {
        self.account.as_ref()
    }

    pub fn currency(&self) -> Option<&CurrencyCode> {
        self.currency.as_ref()
    }

    pub fn issuer(&self) -> Option<&AccountId> {
        self.issuer.as_ref()
    }

    fn marker(&self) -> u8 {
        let mut marker = 0u8;
        if self.account.is_some() {
            marker |= STEP_ACCOUNT;
        }
        if self.currency.is_some() {
            marker |= STEP_CURRENCY;
        }
        if self.issuer.is_some() {
            marker |= STEP_ISSUER;
        }
        marker
    }

    fn serialize_into(&self, bytes: &mut Vec<u8>) {
        bytes.push(self.marker());
        if let Some(account) = &self.account {
            bytes.extend(account.as_bytes());
        }
        if let Some(currency) = &self.currency {
            bytes.extend(currency.as_bytes());
        }
        if let Some(issuer) = &self.issuer {
            bytes.extend(issuer.as_bytes());
        }
    }
}

/// An ordered sequence of steps; paths are only meaningful inside a
/// [`PathSet`].
pub type Path = Vec<PathStep>;

/// An ordered sequence of payment paths, wire-terminated by marker
/// bytes rather than a length prefix (dictated by the network format).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathSet {
    paths: Vec<Path>,
}

impl PathSet {
    pub fn new(paths: Vec<Path>) -> Result<PathSet> {
        if paths.is_empty() || paths.iter().any(|p| p.is_empty()) {
            return Err(Error::ValueRange(
                "path set must hold at least one non-empty path".to_string(),
            ));
        }
        // a componentless step would serialize marker 0x00, which is the
        // end-of-set byte
        if paths.iter().flatten().any(|step| step.marker() == 0) {
            return Err(Error::ValueRange(
                "path step must name at least one component".to_string(),
            ));
        }
        Ok(PathSet { paths })
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = vec![];
        for (i, path) in self.paths.iter().enumerate() {
            if i > 0 {
                bytes.push(PATH_SEPARATOR);
            }
            for step in path {
                step.serialize_into(&mut bytes);
            }
        }
        bytes.push(PATHSET_END);
        bytes
    }

    /// Decode a path set starting at `cursor`; returns the set and the
    /// number of bytes consumed including the end marker.
    pub fn deserialize(bytes: &[u8], cursor: usize) -> Result<(PathSet, usize)> {
        let mut offset = cursor;
        let mut paths: Vec<Path> = vec![];
        let mut current: Path = vec![];

        loop {
            let marker = *bytes.get(offset).ok_or(Error::TruncatedInput {
                needed: 1,
                remaining: 0,
            })?;
            offset += 1;

            match marker {
                PATHSET_END => {
                    if current.is_empty() {
                        return Err(Error::UnexpectedField(
                            "empty path in path set".to_string(),
                        ));
                    }
                    paths.push(current);
                    let set = PathSet::new(paths)?;
                    return Ok((set, offset - cursor));
                }
                PATH_SEPARATOR => {
                    if current.is_empty() {
                        return Err(Error::UnexpectedField(
                            "empty path in path set".to_string(),
                        ));
                    }
                    paths.push(std::mem::take(&mut current));
                }
                _ => {
                    if marker & !(STEP_ACCOUNT | STEP_CURRENCY | STEP_ISSUER) != 0 {
                        return Err(Error::UnexpectedField(format!(
                            "path step marker {:#04x}",
                            marker
                        )));
                    }
                    let mut step = PathStep::default();
                    if marker & STEP_ACCOUNT != 0 {
                        step.account = Some(AccountId::from_bytes(take(bytes, &mut offset, 20)?)?);
                    }
                    if marker & STEP_CURRENCY != 0 {
                        step.currency =
                            Some(CurrencyCode::from_bytes(take(bytes, &mut offset, 20)?)?);
                    }
                    if marker & STEP_ISSUER != 0 {
                        step.issuer = Some(AccountId::from_bytes(take(bytes, &mut offset, 20)?)?);
                    }
                    current.push(step);
                }
            }
        }
    }
}

fn take<'a>(bytes: &'a [u8], offset: &mut usize, len: usize) -> Result<&'a [u8]> {
    let remaining = bytes.len().saturating_sub(*offset);
    if remaining < len {
        return Err(Error::TruncatedInput {
            needed: len,
            remaining,
        });
    }
    let slice = &bytes[*offset..*offset + len];
    *offset += len;
    Ok(slice)
}
