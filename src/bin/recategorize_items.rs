//! Re-run the category classifier over stored items
//! Usage: cargo run --bin recategorize_items -- [--keep-manual] [--dry-run]
//!
//! Rewrites the category of every shopping item, pantry item and recipe
//! ingredient whose stored category differs from what the classifier now
//! assigns. With --keep-manual, items whose category was set by hand are
//! left alone.

use larder::config::Config;
use larder::db::{migrations, Database};
use larder::grocery::{classify, GroceryCategory};
use larder::models::{PantryItem, RecipeIngredient, ShoppingItem};

#[derive(Default)]
struct Tally {
    checked: usize,
    changed: usize,
    skipped_manual: usize,
}

impl Tally {
    fn report(&self, label: &str) {
        println!(
            "{:<20} checked {:>5}  changed {:>5}  kept manual {:>5}",
            label, self.checked, self.changed, self.skipped_manual
        );
    }
}

fn print_change(kind: &str, id: i64, name: &str, from: GroceryCategory, to: GroceryCategory) {
    println!("  {} {} '{}': {} -> {}", kind, id, name, from, to);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let keep_manual = args.iter().any(|a| a == "--keep-manual");
    let dry_run = args.iter().any(|a| a == "--dry-run");

    let config = Config::from_env();
    println!("Database: {}", config.database_path.display());
    if dry_run {
        println!("Dry run: no changes will be written");
    }

    let database = Database::new(&config.database_path)?;

    database.with_conn_mut(|conn| {
        migrations::run_migrations(conn)?;
        let tx = conn.transaction()?;

        let mut shopping = Tally::default();
        for item in ShoppingItem::list(&tx, true)? {
            shopping.checked += 1;
            if keep_manual && item.category_locked {
                shopping.skipped_manual += 1;
                continue;
            }
            let category = classify(&item.name);
            if category != item.category {
                print_change("shopping", item.id, &item.name, item.category, category);
                ShoppingItem::set_category(&tx, item.id, category)?;
                shopping.changed += 1;
            }
        }

        let mut pantry = Tally::default();
        for item in PantryItem::list(&tx, None)? {
            pantry.checked += 1;
            if keep_manual && item.category_locked {
                pantry.skipped_manual += 1;
                continue;
            }
            let category = classify(&item.name);
            if category != item.category {
                print_change("pantry", item.id, &item.name, item.category, category);
                PantryItem::set_category(&tx, item.id, category)?;
                pantry.changed += 1;
            }
        }

        let mut ingredients = Tally::default();
        for ingredient in RecipeIngredient::list_all(&tx)? {
            ingredients.checked += 1;
            let category = classify(&ingredient.name);
            if category != ingredient.category {
                print_change("ingredient", ingredient.id, &ingredient.name, ingredient.category, category);
                RecipeIngredient::set_category(&tx, ingredient.id, category)?;
                ingredients.changed += 1;
            }
        }

        println!();
        shopping.report("Shopping items");
        pantry.report("Pantry items");
        ingredients.report("Recipe ingredients");

        if dry_run {
            tx.rollback()?;
        } else {
            tx.commit()?;
        }
        Ok(())
    })?;

    Ok(())
}
