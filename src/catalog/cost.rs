//! Crafting cost model
//!
//! Tier and enchantment propagate uniformly from an item to every material
//! of its recipe: `T5_MAIN_SWORD@1` needs `T5_BAR@1` and `T5_LEATHER@1`.

use crate::catalog::Catalog;
use crate::identifier::{ItemId, TIER_SEPARATOR};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Cost lookup errors. All collapse to "cost unknown" downstream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CostError {
    /// Malformed id or base item name absent from the recipe table
    #[error("no recipe for {0}")]
    RecipeNotFound(ItemId),

    /// A material required by the recipe has no price
    #[error("price unavailable for material {material} (needed by {item})")]
    PriceUnavailable {
        /// Item being costed
        item: ItemId,
        /// First material without a price
        material: String,
    },

    /// Material prices or quantities too large to total
    #[error("cost of {0} overflows")]
    Overflow(ItemId),
}

/// Result type for cost lookups
pub type CostResult<T> = Result<T, CostError>;

/// Tiered, enchanted materials and quantities needed to craft one item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Recipe {
    materials: BTreeMap<String, u32>,
}

impl Recipe {
    /// Iterate over (material id, quantity), sorted by material id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.materials.iter().map(|(m, q)| (m.as_str(), *q))
    }

    /// Quantity of one material, if the recipe uses it.
    pub fn quantity(&self, material_id: &str) -> Option<u32> {
        self.materials.get(material_id).copied()
    }

    /// Number of distinct materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the recipe lists no materials.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Computes recipes and crafting costs against a [`Catalog`].
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    catalog: &'a Catalog,
}

impl<'a> CostModel<'a> {
    /// Create a cost model over a catalog
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Derive the tiered, enchanted recipe of an item.
    pub fn recipe(&self, item: &ItemId) -> CostResult<Recipe> {
        let parts = item
            .parts()
            .ok_or_else(|| CostError::RecipeNotFound(item.clone()))?;

        let base = self
            .catalog
            .base_recipe(parts.base_name)
            .ok_or_else(|| CostError::RecipeNotFound(item.clone()))?;

        let materials = base
            .iter()
            .map(|(material, qty)| {
                (
                    format!(
                        "{}{}{}{}",
                        parts.tier, TIER_SEPARATOR, material, parts.enchant_suffix
                    ),
                    *qty,
                )
            })
            .collect();

        Ok(Recipe { materials })
    }

    /// Crafting cost after the return rate.
    ///
    /// All-or-nothing: a single unpriced material makes the whole cost
    /// unavailable.
    pub fn cost(&self, item: &ItemId) -> CostResult<Decimal> {
        let recipe = self.recipe(item)?;

        let mut total = Decimal::ZERO;
        for (material, qty) in recipe.iter() {
            let price = self.catalog.material_price(material).ok_or_else(|| {
                CostError::PriceUnavailable {
                    item: item.clone(),
                    material: material.to_string(),
                }
            })?;
            total = price
                .checked_mul(Decimal::from(qty))
                .and_then(|line| total.checked_add(line))
                .ok_or_else(|| CostError::Overflow(item.clone()))?;
        }

        total
            .checked_mul(Decimal::ONE - self.catalog.return_rate())
            .ok_or_else(|| CostError::Overflow(item.clone()))
    }

    /// [`CostModel::cost`] with errors collapsed to `None`.
    pub fn cost_or_none(&self, item: &ItemId) -> Option<Decimal> {
        self.cost(item).ok()
    }
}
