//! Static crafting catalog
//!
//! Holds the base-recipe table, the material price table and the crafting
//! return rate. The tables are fixed for the duration of a run; the only
//! way to change them is to build a new [`Catalog`] before the run starts.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

pub mod cost;
pub mod items;
mod tables;

pub use cost::{CostError, CostModel, CostResult, Recipe};

/// Default crafting return rate (15.2% of materials come back on a craft).
pub fn default_return_rate() -> Decimal {
    Decimal::new(152, 3)
}

/// Catalog errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// IO error while reading an override file
    #[error("IO error: {0}")]
    IoError(String),

    /// Override file is not a JSON object of material id to price
    #[error("parse error: {0}")]
    ParseError(String),

    /// Return rate outside [0, 1)
    #[error("invalid return rate {0}: must be in [0, 1)")]
    InvalidReturnRate(Decimal),

    /// Negative material price
    #[error("negative price {price} for material {material}")]
    NegativePrice {
        /// Material id
        material: String,
        /// Offending price
        price: Decimal,
    },
}

/// Recipe and price tables used by the [`CostModel`].
#[derive(Debug, Clone)]
pub struct Catalog {
    item_names: Vec<String>,
    base_recipes: HashMap<String, BTreeMap<String, u32>>,
    material_prices: HashMap<String, Decimal>,
    return_rate: Decimal,
}

impl Catalog {
    /// Catalog built from the embedded tables.
    pub fn builtin() -> Self {
        let item_names = tables::BASE_RECIPES
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();

        let base_recipes = tables::BASE_RECIPES
            .iter()
            .map(|(name, materials)| {
                let materials = materials
                    .iter()
                    .map(|(material, qty)| (material.to_string(), *qty))
                    .collect();
                (name.to_string(), materials)
            })
            .collect();

        let material_prices = tables::MATERIAL_PRICES
            .iter()
            .map(|(material, price)| (material.to_string(), Decimal::from(*price)))
            .collect();

        Self {
            item_names,
            base_recipes,
            material_prices,
            return_rate: default_return_rate(),
        }
    }

    /// Catalog from explicit tables. Item names follow the order of `recipes`.
    pub fn from_tables<R, M, P>(recipes: R, material_prices: P, return_rate: Decimal) -> Self
    where
        R: IntoIterator<Item = (String, M)>,
        M: IntoIterator<Item = (String, u32)>,
        P: IntoIterator<Item = (String, Decimal)>,
    {
        let mut item_names = Vec::new();
        let mut base_recipes = HashMap::new();
        for (name, materials) in recipes {
            if !base_recipes.contains_key(&name) {
                item_names.push(name.clone());
            }
            base_recipes.insert(name, materials.into_iter().collect());
        }

        Self {
            item_names,
            base_recipes,
            material_prices: material_prices.into_iter().collect(),
            return_rate,
        }
    }

    /// Replace the return rate.
    pub fn with_return_rate(mut self, return_rate: Decimal) -> Result<Self, CatalogError> {
        if return_rate < Decimal::ZERO || return_rate >= Decimal::ONE {
            return Err(CatalogError::InvalidReturnRate(return_rate));
        }
        self.return_rate = return_rate;
        Ok(self)
    }

    /// Merge material prices from a JSON object (`{"T5_BAR": 1063, ...}`).
    ///
    /// Entries in the file replace built-in prices; materials not mentioned
    /// keep their current price.
    pub fn with_price_overrides(mut self, path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let overrides: HashMap<String, Decimal> = serde_json::from_str(&content)
            .map_err(|e| CatalogError::ParseError(format!("{}: {}", path.display(), e)))?;

        for (material, price) in overrides {
            if price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice { material, price });
            }
            debug!(material = %material, price = %price, "Overriding material price");
            self.material_prices.insert(material, price);
        }

        info!(
            path = %path.display(),
            materials = self.material_prices.len(),
            "Loaded material price overrides"
        );
        Ok(self)
    }

    /// Item names with a known base recipe, in table order.
    pub fn item_names(&self) -> Vec<&str> {
        self.item_names.iter().map(String::as_str).collect()
    }

    /// Base recipe (untiered material name to quantity) for an item name.
    pub fn base_recipe(&self, base_name: &str) -> Option<&BTreeMap<String, u32>> {
        self.base_recipes.get(base_name)
    }

    /// Price of a tiered, enchanted material id.
    pub fn material_price(&self, material_id: &str) -> Option<Decimal> {
        self.material_prices.get(material_id).copied()
    }

    /// Fraction of materials returned on a craft.
    pub fn return_rate(&self) -> Decimal {
        self.return_rate
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
