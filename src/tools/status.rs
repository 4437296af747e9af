//! Larder Status Tool
//!
//! Provides runtime status information about the Larder service, plus the
//! usage guide served to AI assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{Database, DbResult};
use crate::measure::MeasurementSystem;
use crate::models::{PantryItem, Recipe, ShoppingItem};

/// Kitchen workflow instructions for AI assistants
pub const KITCHEN_INSTRUCTIONS: &str = r#"
# Larder Instructions

Larder keeps a recipe book, a shopping list and a pantry (kitchen inventory).
Every ingredient name is sorted into a grocery aisle automatically.

## Grocery Categories

Produce, Meat & Seafood, Dairy & Eggs, Bakery, Pantry, Frozen, Beverages,
Spices & Seasonings, Other.

Categories are assigned from keywords in the name ("chicken broth" is
Meat & Seafood, "eggplant" is Produce). Pass `category` explicitly to
override; a manual category is kept when the item is renamed.

## Units

- Weight: mg, g, kg, oz, lb
- Volume: ml, L, tsp, tbsp, fl oz, cup, pint, quart, gallon
- Anything else ("pinch", "clove", "can", no unit) is a count or free-text
  unit and is never converted.

Weight and volume never convert into each other; there is no density table.

## Recipes

1. `create_recipe(name, base_servings)`
2. `add_recipe_ingredient(recipe_id, name, quantity, unit)` with quantities
   for the base servings
3. `get_recipe(id, servings, system)` renders the recipe for any number of
   servings. `system` is `metric`, `imperial` or `original`; when omitted the
   configured default is used.

Quantities are shown with at most two decimals ("12 Tomatoes",
"473.18 ml milk").

## Shopping

- `add_recipe_to_shopping_list(recipe_id, servings)` adds every ingredient,
  minus what the pantry already holds. Lines already on the list are topped up.
- `list_shopping_list` returns the list grouped by aisle.
- `set_shopping_item_checked` while shopping, `clear_checked_items` when done.

## Pantry

- `add_pantry_item(name, quantity, unit, expires_on)` with dates as YYYY-MM-DD
- `adjust_pantry_quantity(id, delta)` when cooking (negative) or restocking
- `list_expiring_items(days)` shows what to use up first

## Quick Reference

| Task | Tool |
|------|------|
| Which aisle? | `classify_ingredient` |
| Convert a quantity | `convert_units`, `convert_to_system` |
| Scale one quantity | `scale_quantity` |
| Service health | `larder_status` |
"#;

/// Row counts per table
#[derive(Debug, Clone, Serialize)]
pub struct LarderCounts {
    pub recipes: i64,
    pub shopping_items_open: i64,
    pub shopping_items_checked: i64,
    pub pantry_items: usize,
}

/// Runtime status of the Larder service
#[derive(Debug, Clone, Serialize)]
pub struct LarderStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub counts: Option<LarderCounts>,

    pub default_system: MeasurementSystem,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    default_system: MeasurementSystem,
}

fn collect_counts(db: &Database) -> DbResult<LarderCounts> {
    db.with_conn(|conn| {
        Ok(LarderCounts {
            recipes: Recipe::count(conn, None, false)?,
            shopping_items_open: ShoppingItem::count(conn, Some(false))?,
            shopping_items_checked: ShoppingItem::count(conn, Some(true))?,
            pantry_items: PantryItem::list(conn, None)?.len(),
        })
    })
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf, default_system: MeasurementSystem) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            default_system,
        }
    }

    /// Get the current status
    pub fn get_status(&self, db: &Database) -> LarderStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let counts = match collect_counts(db) {
            Ok(counts) => Some(counts),
            Err(e) => {
                tracing::warn!(error = %e, "could not count rows for status");
                None
            }
        };

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        LarderStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            counts,
            default_system: self.default_system,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use crate::models::ShoppingItemCreate;

    #[test]
    fn test_status_counts() {
        let db = test_database();
        db.with_conn(|conn| {
            ShoppingItem::create(
                conn,
                &ShoppingItemCreate {
                    name: "bread".to_string(),
                    quantity: 1.0,
                    unit: None,
                    category: None,
                    recipe_id: None,
                    notes: None,
                },
            )?;
            Ok(())
        })
        .unwrap();

        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/larder.db"), MeasurementSystem::Imperial);
        let status = tracker.get_status(&db);

        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.default_system, MeasurementSystem::Imperial);
        let counts = status.counts.unwrap();
        assert_eq!(counts.shopping_items_open, 1);
        assert_eq!(counts.shopping_items_checked, 0);
        assert_eq!(counts.recipes, 0);
        assert_eq!(status.process_id, std::process::id());
    }

    #[test]
    fn test_instructions_mention_tools() {
        for tool in ["get_recipe", "add_recipe_to_shopping_list", "list_expiring_items"] {
            assert!(KITCHEN_INSTRUCTIONS.contains(tool), "missing {}", tool);
        }
    }
}
