//! Item handle model and handle generation.
//!
//! # Responsibility
//! - Define the opaque identifier used to address one project item.
//! - Provide a pluggable source of fresh random handles.
//!
//! # Invariants
//! - A `Handle` is always exactly `HANDLE_HEX_WIDTH` lowercase hex chars.
//! - Malformed handle text never becomes a `Handle`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Number of hex characters in one handle (52 random bits).
pub const HANDLE_HEX_WIDTH: usize = 13;

const HANDLE_BITS_MASK: u128 = (1 << (HANDLE_HEX_WIDTH * 4)) - 1;

static HANDLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{13}$").expect("valid handle regex"));

/// Stable identifier of one item in the project tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Parses handle text, returning `None` for anything malformed.
    pub fn parse(value: &str) -> Option<Self> {
        if HANDLE_RE.is_match(value) {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    /// Builds a handle from the low 52 bits of `bits`.
    pub fn from_bits(bits: u64) -> Self {
        Self(format!(
            "{:0width$x}",
            u128::from(bits) & HANDLE_BITS_MASK,
            width = HANDLE_HEX_WIDTH
        ))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Handle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl FromStr for Handle {
    type Err = HandleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| HandleError::Invalid(value.to_string()))
    }
}

impl TryFrom<String> for Handle {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if HANDLE_RE.is_match(value.as_str()) {
            Ok(Self(value))
        } else {
            Err(HandleError::Invalid(value))
        }
    }
}

impl From<Handle> for String {
    fn from(value: Handle) -> Self {
        value.0
    }
}

/// Handle parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// Text is not 13 lowercase hex characters.
    Invalid(String),
}

impl Display for HandleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(value) => write!(
                f,
                "invalid item handle `{value}`; expected {HANDLE_HEX_WIDTH} lowercase hex chars"
            ),
        }
    }
}

impl Error for HandleError {}

/// Source of candidate handles for newly inserted items.
///
/// Implementations need not guarantee uniqueness; the tree retries on
/// collision.
pub trait HandleGenerator {
    fn next_handle(&mut self) -> Handle;
}

/// Default generator drawing 52 random bits from a v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomHandleGenerator;

impl HandleGenerator for RandomHandleGenerator {
    fn next_handle(&mut self) -> Handle {
        // The low 52 bits of a v4 UUID carry no version/variant markers.
        let bits = Uuid::new_v4().as_u128() & HANDLE_BITS_MASK;
        Handle(format!("{bits:0width$x}", width = HANDLE_HEX_WIDTH))
    }
}
