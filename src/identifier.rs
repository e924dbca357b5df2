//! Item identifier parsing
//!
//! Item ids use the market format `{Tier}_{ItemName}[@{EnchantLevel}]`,
//! e.g. `T5_MAIN_SWORD` or `T6_2H_CLAYMORE@2`. Material ids share the same
//! shape with a material name in place of the item name (`T5_BAR@1`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the tier and the item name.
pub const TIER_SEPARATOR: char = '_';

/// Separator between the item name and the enchantment level.
pub const ENCHANT_SEPARATOR: char = '@';

/// Immutable item identifier used as a lookup key everywhere.
///
/// Construction never fails: ids outside the expected shape are still valid
/// keys for fetching, they simply have no recipe.
///
/// # Examples
///
/// ```
/// use albion_profit_analyzer::identifier::ItemId;
///
/// let id = ItemId::new("T5_MAIN_SWORD@1");
/// let parts = id.parts().unwrap();
/// assert_eq!(parts.tier, "T5");
/// assert_eq!(parts.base_name, "MAIN_SWORD");
/// assert_eq!(parts.enchant_suffix, "@1");
/// assert_eq!(id.enchant_level(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

/// Borrowed view of the components of an [`ItemId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemParts<'a> {
    /// Tier token, e.g. `T5`
    pub tier: &'a str,
    /// Item (or material) name without tier and enchantment
    pub base_name: &'a str,
    /// Enchantment suffix including the `@`, or empty for enchant 0
    pub enchant_suffix: &'a str,
}

impl ItemId {
    /// Wrap a raw identifier without validation.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse and validate an identifier supplied by a user.
    ///
    /// Input is trimmed and normalized to uppercase. Unlike [`ItemId::new`]
    /// this rejects strings without a tier separator, an empty item name, or
    /// a non-numeric enchantment level.
    pub fn parse(s: &str) -> Result<Self, IdentifierError> {
        let id = Self::new(s.trim().to_uppercase());

        let parts = id.parts().ok_or_else(|| {
            IdentifierError::InvalidFormat(format!(
                "'{}' is missing the tier separator: expected TIER_ITEM[@ENCHANT]",
                id
            ))
        })?;

        if parts.tier.is_empty() {
            return Err(IdentifierError::InvalidFormat(
                "tier component cannot be empty".to_string(),
            ));
        }
        if parts.base_name.is_empty() {
            return Err(IdentifierError::InvalidFormat(
                "item name component cannot be empty".to_string(),
            ));
        }
        if let Some(level) = parts.enchant_suffix.strip_prefix(ENCHANT_SEPARATOR) {
            if level.is_empty() || !level.chars().all(|c| c.is_ascii_digit()) {
                return Err(IdentifierError::InvalidEnchant(level.to_string()));
            }
        }

        Ok(id)
    }

    /// Raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into tier, base name and enchantment suffix.
    ///
    /// Returns `None` when the identifier has no tier separator.
    pub fn parts(&self) -> Option<ItemParts<'_>> {
        let (tier, rest) = self.0.split_once(TIER_SEPARATOR)?;
        let (base_name, enchant_suffix) = match rest.find(ENCHANT_SEPARATOR) {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };
        Some(ItemParts {
            tier,
            base_name,
            enchant_suffix,
        })
    }

    /// Tier token, or the whole identifier when it has no separator.
    pub fn tier(&self) -> &str {
        self.parts().map(|p| p.tier).unwrap_or(&self.0)
    }

    /// Enchantment suffix (`@N`), empty when the item is unenchanted.
    pub fn enchant_suffix(&self) -> &str {
        self.parts().map(|p| p.enchant_suffix).unwrap_or("")
    }

    /// Numeric enchantment level; an absent or malformed suffix means 0.
    pub fn enchant_level(&self) -> u32 {
        self.enchant_suffix()
            .strip_prefix(ENCHANT_SEPARATOR)
            .and_then(|level| level.parse().ok())
            .unwrap_or(0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur during identifier parsing
#[derive(Debug, thiserror::Error)]
pub enum IdentifierError {
    /// Invalid identifier format
    #[error("identifier error: {0}")]
    InvalidFormat(String),

    /// Enchantment suffix is not a number
    #[error("invalid enchantment level: '{0}'")]
    InvalidEnchant(String),
}
