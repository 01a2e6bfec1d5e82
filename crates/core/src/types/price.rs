//! Price column selectors and per-product price fields.
//!
//! Product rows carry one price field per pricing tier (for example
//! `RetailPrice` and `WholesalePrice`). A price group names the field that
//! applies to its customers through a [`PriceColumn`].

use core::fmt;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PriceColumn`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceColumnError {
    /// The input string is empty.
    #[error("price column cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("price column must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not start with an ASCII letter.
    #[error("price column must start with a letter: {0:?}")]
    InvalidStart(String),
    /// The input contains a character outside `[A-Za-z0-9_]`.
    #[error("price column contains invalid character {found:?}: {name:?}")]
    InvalidCharacter {
        /// The offending name.
        name: String,
        /// The first invalid character.
        found: char,
    },
}

/// Name of the product price field a price group reads.
///
/// The name is used verbatim as a column identifier, so parsing is strict:
/// no trimming, no case folding.
///
/// ## Constraints
///
/// - Length: 1-63 characters (`PostgreSQL` identifier limit)
/// - First character: ASCII letter
/// - Remaining characters: ASCII letters, digits or `_`
///
/// ## Examples
///
/// ```
/// use freshcart_core::PriceColumn;
///
/// assert!(PriceColumn::parse("WholesalePrice").is_ok());
/// assert!(PriceColumn::parse("price; DROP TABLE product").is_err());
/// assert_eq!(PriceColumn::default().as_str(), "RetailPrice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PriceColumn(String);

impl PriceColumn {
    /// Maximum length of a column identifier.
    pub const MAX_LENGTH: usize = 63;

    /// Column read when a price group does not name one.
    pub const DEFAULT: &'static str = "RetailPrice";

    /// Parse a `PriceColumn` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 63 characters,
    /// does not start with an ASCII letter, or contains characters other than
    /// ASCII letters, digits and underscores.
    pub fn parse(s: &str) -> Result<Self, PriceColumnError> {
        let mut chars = s.chars();

        let first = chars.next().ok_or(PriceColumnError::Empty)?;

        if s.len() > Self::MAX_LENGTH {
            return Err(PriceColumnError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !first.is_ascii_alphabetic() {
            return Err(PriceColumnError::InvalidStart(s.to_owned()));
        }

        if let Some(found) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(PriceColumnError::InvalidCharacter {
                name: s.to_owned(),
                found,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the column name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the column name as a double-quoted SQL identifier.
    ///
    /// Safe to splice into a query because parsing only admits
    /// `[A-Za-z][A-Za-z0-9_]*`.
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl Default for PriceColumn {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for PriceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PriceColumn {
    type Err = PriceColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PriceColumn {
    type Error = PriceColumnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PriceColumn> for String {
    fn from(column: PriceColumn) -> Self {
        column.0
    }
}

/// The price fields a product row exposes, keyed by column.
///
/// A field that is absent here was either not loaded or is `NULL` in the
/// store; callers decide what absence means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPrices(BTreeMap<PriceColumn, Decimal>);

impl ProductPrices {
    /// Create an empty set of price fields.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Create a set holding a single field, or none when `value` is `None`.
    #[must_use]
    pub fn single(column: PriceColumn, value: Option<Decimal>) -> Self {
        let mut prices = Self::new();
        if let Some(value) = value {
            prices.insert(column, value);
        }
        prices
    }

    /// Set a price field, replacing any previous value.
    pub fn insert(&mut self, column: PriceColumn, value: Decimal) {
        self.0.insert(column, value);
    }

    /// Get a price field.
    #[must_use]
    pub fn get(&self, column: &PriceColumn) -> Option<Decimal> {
        self.0.get(column).copied()
    }

    /// Number of fields present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no fields are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PriceColumn, Decimal)> for ProductPrices {
    fn from_iter<I: IntoIterator<Item = (PriceColumn, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
