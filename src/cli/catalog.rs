//! Catalog inspection commands (`items`, `cost`)

use crate::catalog::{Catalog, CostModel};
use crate::identifier::ItemId;
use clap::Args;
use serde_json::json;

use super::{Cli, CliError, ItemSelection, OutputFormat};

/// Items command arguments
#[derive(Debug, Args)]
pub struct ItemsArgs {
    #[command(flatten)]
    pub selection: ItemSelection,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

impl ItemsArgs {
    /// Print the enumerated item ids.
    pub fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let catalog = cli.load_catalog()?;
        let targets = self.selection.resolve(&catalog)?;

        match self.format {
            OutputFormat::Json => {
                let ids: Vec<&str> = targets.iter().map(ItemId::as_str).collect();
                println!("{}", serde_json::to_string_pretty(&ids)?);
            }
            OutputFormat::Human => {
                println!("Found {} items:\n", targets.len());
                for id in &targets {
                    println!("{id}");
                }
            }
        }
        Ok(())
    }
}

/// Cost command arguments
#[derive(Debug, Args)]
pub struct CostArgs {
    /// Item ids, e.g. T5_MAIN_SWORD@1
    #[arg(required = true)]
    pub items: Vec<String>,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

impl CostArgs {
    /// Print recipe and crafting cost of each item.
    pub fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let catalog = cli.load_catalog()?;
        let items = self
            .items
            .iter()
            .map(|raw| ItemId::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;

        match self.format {
            OutputFormat::Json => {
                let entries: Vec<_> = items.iter().map(|item| cost_json(&catalog, item)).collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            OutputFormat::Human => {
                for item in &items {
                    print!("{}", cost_human(&catalog, item));
                }
            }
        }
        Ok(())
    }
}

fn cost_json(catalog: &Catalog, item: &ItemId) -> serde_json::Value {
    let model = CostModel::new(catalog);
    let materials: Vec<_> = match model.recipe(item) {
        Ok(recipe) => recipe
            .iter()
            .map(|(material, qty)| {
                json!({
                    "material": material,
                    "quantity": qty,
                    "price": catalog.material_price(material),
                })
            })
            .collect(),
        Err(_) => Vec::new(),
    };

    let (cost, error) = match model.cost(item) {
        Ok(cost) => (Some(cost), None),
        Err(e) => (None, Some(e.to_string())),
    };

    json!({
        "item_id": item,
        "return_rate": catalog.return_rate(),
        "materials": materials,
        "cost": cost,
        "error": error,
    })
}

fn cost_human(catalog: &Catalog, item: &ItemId) -> String {
    let model = CostModel::new(catalog);
    let mut out = format!("{item}\n");

    if let Ok(recipe) = model.recipe(item) {
        for (material, qty) in recipe.iter() {
            let price = catalog
                .material_price(material)
                .map(|p| p.to_string())
                .unwrap_or_else(|| "?".to_string());
            out.push_str(&format!("  {material:<20} x{qty:<4} @ {price}\n"));
        }
    }

    match model.cost(item) {
        Ok(cost) => out.push_str(&format!(
            "  cost: {} (return rate {})\n",
            cost.normalize(),
            catalog.return_rate()
        )),
        Err(e) => out.push_str(&format!("  cost unavailable: {e}\n")),
    }
    out
}
