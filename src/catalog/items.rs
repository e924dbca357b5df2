//! Target item enumeration

use crate::identifier::ItemId;

/// Tiers analysed by default.
pub const DEFAULT_TIERS: &[&str] = &["T4", "T5", "T6", "T7"];

/// Enchantment suffixes analysed by default (levels 0-2).
pub const DEFAULT_ENCHANTS: &[&str] = &["", "@1", "@2"];

/// Expand names x tiers x enchantment suffixes into item ids.
///
/// Iteration is name-major, then tier, with the enchantment innermost. The
/// order only affects chunk assignment, never results.
///
/// # Examples
///
/// ```
/// use albion_profit_analyzer::catalog::items::enumerate_items;
///
/// let ids = enumerate_items(&["MAIN_SWORD"], &["T5"], &["", "@1"]);
/// let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
/// assert_eq!(ids, ["T5_MAIN_SWORD", "T5_MAIN_SWORD@1"]);
/// ```
pub fn enumerate_items<N, T, E>(names: &[N], tiers: &[T], enchants: &[E]) -> Vec<ItemId>
where
    N: AsRef<str>,
    T: AsRef<str>,
    E: AsRef<str>,
{
    let mut items = Vec::with_capacity(names.len() * tiers.len() * enchants.len());
    for name in names {
        for tier in tiers {
            for enchant in enchants {
                items.push(ItemId::new(format!(
                    "{}_{}{}",
                    tier.as_ref(),
                    name.as_ref(),
                    enchant.as_ref()
                )));
            }
        }
    }
    items
}

/// Normalize a user-supplied enchantment (`1`, `@1`, `0`, empty) to a suffix.
pub fn normalize_enchant(raw: &str) -> String {
    let level = raw.trim().trim_start_matches('@');
    match level {
        "" | "0" => String::new(),
        level => format!("@{level}"),
    }
}
