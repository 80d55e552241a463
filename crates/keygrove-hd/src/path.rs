//! Derivation path parsing and formatting.

use std::fmt;
use std::str::FromStr;

use crate::DeriveError;

/// Offset added to an index on the wire to mark it hardened.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// One step of a derivation path: an index below 2^31 plus a hardened flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildNumber {
    index: u32,
    hardened: bool,
}

impl ChildNumber {
    /// Build a child number from an index below 2^31.
    pub fn new(index: u32, hardened: bool) -> Result<Self, DeriveError> {
        if index >= HARDENED_OFFSET {
            return Err(DeriveError::InvalidPathSyntax(format!(
                "index {index} is not below 2^31"
            )));
        }
        Ok(ChildNumber { index, hardened })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// The index as serialized into the derivation HMAC: the hardened bit
    /// folded into the top bit.
    pub(crate) fn raw_index(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

impl FromStr for ChildNumber {
    type Err = DeriveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, hardened) = match s.strip_suffix('\'') {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DeriveError::InvalidPathSyntax(format!(
                "bad path segment {s:?}"
            )));
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| DeriveError::InvalidPathSyntax(format!("bad path segment {s:?}")))?;
        ChildNumber::new(index, hardened)
    }
}

/// A parsed derivation path: the ordered child numbers below the master key.
///
/// The textual form starts at the master marker `m`, with segments joined
/// by `/` and hardened segments suffixed with an apostrophe, for example
/// `m/44'/371'/0'/0/0`. The bare path `m` names the master key itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath {
    children: Vec<ChildNumber>,
}

impl DerivationPath {
    pub fn new(children: Vec<ChildNumber>) -> Self {
        DerivationPath { children }
    }

    /// The standard five-level account path `m/44'/coin'/account'/0/index`.
    pub fn bip44(coin_type: u32, account: u32, index: u32) -> Result<Self, DeriveError> {
        Ok(DerivationPath {
            children: vec![
                ChildNumber::new(44, true)?,
                ChildNumber::new(coin_type, true)?,
                ChildNumber::new(account, true)?,
                ChildNumber::new(0, false)?,
                ChildNumber::new(index, false)?,
            ],
        })
    }

    pub fn children(&self) -> &[ChildNumber] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for child in &self.children {
            write!(f, "/{child}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = DeriveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.split('/');
        if segments.next() != Some("m") {
            return Err(DeriveError::InvalidPathSyntax(format!(
                "path {s:?} does not start with \"m\""
            )));
        }
        let children = segments
            .map(ChildNumber::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DerivationPath { children })
    }
}
