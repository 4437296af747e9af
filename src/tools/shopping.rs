//! Shopping List MCP Tools
//!
//! Tools for managing the shopping list and generating it from recipes.

use rusqlite::Connection;
use serde::Serialize;

use super::DeleteResponse;
use crate::db::{Database, DbResult};
use crate::grocery::{group_by_category, GroceryCategory};
use crate::measure::{convert_between, format_amount, format_quantity, scale_factor, scaled_quantity};
use crate::models::{
    PantryItem, Recipe, RecipeIngredient, ShoppingItem, ShoppingItemCreate, ShoppingItemUpdate,
};

/// A shopping item as shown to the user
#[derive(Debug, Serialize)]
pub struct ShoppingItemView {
    pub id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub formatted_quantity: String,
    /// "2 cup flour"
    pub display: String,
    pub category: GroceryCategory,
    pub is_checked: bool,
    pub recipe_id: Option<i64>,
    pub notes: Option<String>,
}

impl From<ShoppingItem> for ShoppingItemView {
    fn from(item: ShoppingItem) -> Self {
        let display = format!("{} {}", format_amount(item.quantity, item.unit.as_deref()), item.name);
        Self {
            id: item.id,
            formatted_quantity: format_quantity(item.quantity),
            display,
            name: item.name,
            quantity: item.quantity,
            unit: item.unit,
            category: item.category,
            is_checked: item.is_checked,
            recipe_id: item.recipe_id,
            notes: item.notes,
        }
    }
}

/// One aisle of the shopping list
#[derive(Debug, Serialize)]
pub struct ShoppingGroup {
    pub category: GroceryCategory,
    pub icon: &'static str,
    pub color: &'static str,
    pub items: Vec<ShoppingItemView>,
}

/// Response for list_shopping_list
#[derive(Debug, Serialize)]
pub struct ShoppingListResponse {
    pub groups: Vec<ShoppingGroup>,
    pub total_items: usize,
    pub checked_items: usize,
}

/// Response for clear_checked_items
#[derive(Debug, Serialize)]
pub struct ClearCheckedResponse {
    pub success: bool,
    pub removed: usize,
}

/// Response for add_recipe_to_shopping_list
#[derive(Debug, Serialize)]
pub struct AddRecipeToListResponse {
    pub recipe_id: i64,
    pub recipe_name: String,
    pub servings: f64,
    /// New lines created on the list
    pub added: Vec<ShoppingItemView>,
    /// Existing lines whose quantity was increased
    pub merged: Vec<ShoppingItemView>,
    /// Ingredients fully covered by pantry stock
    pub covered_by_pantry: Vec<String>,
}

fn validate_item(name: &str, quantity: f64) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Item name cannot be empty".to_string());
    }
    if quantity < 0.0 {
        return Err("quantity cannot be negative".to_string());
    }
    Ok(())
}

/// Add an item to the shopping list
pub fn add_shopping_item(db: &Database, data: ShoppingItemCreate) -> Result<ShoppingItemView, String> {
    validate_item(&data.name, data.quantity)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let item = ShoppingItem::create(&conn, &data)
        .map_err(|e| format!("Failed to add shopping item: {}", e))?;

    tracing::info!(id = item.id, name = %item.name, category = item.category.as_str(), "added shopping item");
    Ok(item.into())
}

/// List the shopping list grouped by category
pub fn list_shopping_list(db: &Database, include_checked: bool) -> Result<ShoppingListResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let items = ShoppingItem::list(&conn, include_checked)
        .map_err(|e| format!("Failed to list shopping items: {}", e))?;

    let total_items = items.len();
    let checked_items = items.iter().filter(|i| i.is_checked).count();

    let groups = group_by_category(items, |item| item.category)
        .into_iter()
        .map(|(category, items)| ShoppingGroup {
            category,
            icon: category.icon(),
            color: category.color(),
            items: items.into_iter().map(ShoppingItemView::from).collect(),
        })
        .collect();

    Ok(ShoppingListResponse {
        groups,
        total_items,
        checked_items,
    })
}

/// Update a shopping item
pub fn update_shopping_item(
    db: &Database,
    id: i64,
    data: ShoppingItemUpdate,
) -> Result<Option<ShoppingItemView>, String> {
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err("Item name cannot be empty".to_string());
        }
    }
    if data.quantity.map_or(false, |q| q < 0.0) {
        return Err("quantity cannot be negative".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let item = ShoppingItem::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update shopping item: {}", e))?;

    Ok(item.map(ShoppingItemView::from))
}

/// Check or uncheck a shopping item
pub fn set_shopping_item_checked(
    db: &Database,
    id: i64,
    checked: bool,
) -> Result<Option<ShoppingItemView>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let item = ShoppingItem::set_checked(&conn, id, checked)
        .map_err(|e| format!("Failed to update shopping item: {}", e))?;

    Ok(item.map(ShoppingItemView::from))
}

/// Remove a shopping item
pub fn remove_shopping_item(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted = ShoppingItem::delete(&conn, id)
        .map_err(|e| format!("Failed to remove shopping item: {}", e))?;

    if !deleted {
        return Err(format!("Shopping item {} not found", id));
    }

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

/// Remove every checked item
pub fn clear_checked_items(db: &Database) -> Result<ClearCheckedResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let removed = ShoppingItem::clear_checked(&conn)
        .map_err(|e| format!("Failed to clear checked items: {}", e))?;

    Ok(ClearCheckedResponse {
        success: true,
        removed,
    })
}

/// Outcome of putting one ingredient on the list
enum ListOutcome {
    Added(ShoppingItem),
    Merged(ShoppingItem),
    Covered,
}

/// Amount still needed after subtracting matching pantry stock
fn remaining_after_pantry(conn: &Connection, ingredient: &RecipeIngredient, needed: f64) -> DbResult<f64> {
    let mut remaining = needed;
    for stock in PantryItem::find_by_name(conn, &ingredient.name)? {
        if let Some(available) =
            convert_between(stock.quantity, stock.unit.as_deref(), ingredient.unit.as_deref())
        {
            remaining -= available;
        }
    }
    Ok(remaining.max(0.0))
}

fn put_on_list(
    conn: &Connection,
    recipe_id: i64,
    ingredient: &RecipeIngredient,
    factor: f64,
) -> DbResult<ListOutcome> {
    let needed = scaled_quantity(ingredient.quantity, factor);
    let remaining = remaining_after_pantry(conn, ingredient, needed)?;
    if remaining <= 0.0 && needed > 0.0 {
        return Ok(ListOutcome::Covered);
    }

    // Merge into an existing unchecked line with a comparable unit
    for existing in ShoppingItem::find_unchecked_by_name(conn, &ingredient.name)? {
        if let Some(delta) =
            convert_between(remaining, ingredient.unit.as_deref(), existing.unit.as_deref())
        {
            if let Some(updated) = ShoppingItem::add_quantity(conn, existing.id, delta)? {
                return Ok(ListOutcome::Merged(updated));
            }
        }
    }

    let item = ShoppingItem::create(
        conn,
        &ShoppingItemCreate {
            name: ingredient.name.clone(),
            quantity: remaining,
            unit: ingredient.unit.clone(),
            category: None,
            recipe_id: Some(recipe_id),
            notes: None,
        },
    )?;
    Ok(ListOutcome::Added(item))
}

/// Add a recipe's ingredients, scaled to `servings`, to the shopping list
///
/// Pantry stock with the same name and a comparable unit is subtracted
/// first; lines already on the list are topped up instead of duplicated.
pub fn add_recipe_to_shopping_list(
    db: &Database,
    recipe_id: i64,
    servings: Option<f64>,
) -> Result<AddRecipeToListResponse, String> {
    if servings.map_or(false, |s| s < 0.0) {
        return Err("servings cannot be negative".to_string());
    }

    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;

        let recipe = match Recipe::get_by_id(&tx, recipe_id)? {
            Some(recipe) => recipe,
            None => return Ok(None),
        };
        let servings = servings.unwrap_or(recipe.base_servings);
        let factor = scale_factor(recipe.base_servings, servings);

        let mut added = Vec::new();
        let mut merged = Vec::new();
        let mut covered_by_pantry = Vec::new();

        for ingredient in RecipeIngredient::list_for_recipe(&tx, recipe_id)? {
            match put_on_list(&tx, recipe_id, &ingredient, factor)? {
                ListOutcome::Added(item) => added.push(ShoppingItemView::from(item)),
                ListOutcome::Merged(item) => merged.push(ShoppingItemView::from(item)),
                ListOutcome::Covered => covered_by_pantry.push(ingredient.name),
            }
        }

        tx.commit()?;

        Ok(Some(AddRecipeToListResponse {
            recipe_id,
            recipe_name: recipe.name,
            servings,
            added,
            merged,
            covered_by_pantry,
        }))
    })
    .map_err(|e| format!("Failed to add recipe to shopping list: {}", e))?
    .ok_or_else(|| format!("Recipe {} not found", recipe_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use crate::models::{PantryItemCreate, RecipeCreate, RecipeIngredientCreate};

    fn item(name: &str, quantity: f64, unit: Option<&str>) -> ShoppingItemCreate {
        ShoppingItemCreate {
            name: name.to_string(),
            quantity,
            unit: unit.map(str::to_string),
            category: None,
            recipe_id: None,
            notes: None,
        }
    }

    fn seed_recipe(db: &Database) -> i64 {
        db.with_conn(|conn| {
            let recipe = Recipe::create(
                conn,
                &RecipeCreate {
                    name: "Tomato Soup".to_string(),
                    base_servings: 4.0,
                    is_favorite: false,
                    notes: None,
                },
            )?;
            for (name, quantity, unit) in [
                ("Tomatoes", 6.0, None),
                ("chicken broth", 2.0, Some("cup")),
                ("salt", 1.0, Some("pinch")),
            ] {
                RecipeIngredient::create(
                    conn,
                    &RecipeIngredientCreate {
                        recipe_id: recipe.id,
                        name: name.to_string(),
                        quantity,
                        unit: unit.map(str::to_string),
                        notes: None,
                    },
                )?;
            }
            Ok(recipe.id)
        })
        .unwrap()
    }

    #[test]
    fn test_add_and_group() {
        let db = test_database();
        add_shopping_item(&db, item("salt", 1.0, None)).unwrap();
        add_shopping_item(&db, item("Apples", 6.0, None)).unwrap();
        let milk = add_shopping_item(&db, item("milk", 1.5, Some("L"))).unwrap();
        assert_eq!(milk.display, "1.5 L milk");

        let list = list_shopping_list(&db, false).unwrap();
        let categories: Vec<GroceryCategory> = list.groups.iter().map(|g| g.category).collect();
        assert_eq!(
            categories,
            vec![
                GroceryCategory::Produce,
                GroceryCategory::DairyEggs,
                GroceryCategory::SpicesSeasonings,
            ]
        );
        assert_eq!(list.total_items, 3);
    }

    #[test]
    fn test_validation() {
        let db = test_database();
        assert!(add_shopping_item(&db, item("  ", 1.0, None)).is_err());
        assert!(add_shopping_item(&db, item("eggs", -1.0, None)).is_err());
    }

    #[test]
    fn test_check_and_clear() {
        let db = test_database();
        let bread = add_shopping_item(&db, item("bread", 1.0, None)).unwrap();
        add_shopping_item(&db, item("butter", 250.0, Some("g"))).unwrap();

        set_shopping_item_checked(&db, bread.id, true).unwrap();
        let list = list_shopping_list(&db, true).unwrap();
        assert_eq!(list.checked_items, 1);

        let cleared = clear_checked_items(&db).unwrap();
        assert_eq!(cleared.removed, 1);
        assert_eq!(list_shopping_list(&db, true).unwrap().total_items, 1);
    }

    #[test]
    fn test_remove_missing_item() {
        let db = test_database();
        assert!(remove_shopping_item(&db, 42).is_err());
    }

    #[test]
    fn test_add_recipe_scales_ingredients() {
        let db = test_database();
        let recipe_id = seed_recipe(&db);

        let result = add_recipe_to_shopping_list(&db, recipe_id, Some(8.0)).unwrap();
        assert_eq!(result.added.len(), 3);
        let tomatoes = result.added.iter().find(|i| i.name == "Tomatoes").unwrap();
        assert_eq!(tomatoes.quantity, 12.0);
        assert_eq!(tomatoes.category, GroceryCategory::Produce);
        assert_eq!(tomatoes.recipe_id, Some(recipe_id));
    }

    #[test]
    fn test_add_recipe_merges_and_uses_pantry() {
        let db = test_database();
        let recipe_id = seed_recipe(&db);

        db.with_conn(|conn| {
            PantryItem::create(
                conn,
                &PantryItemCreate {
                    name: "Chicken Broth".to_string(),
                    quantity: 1.0,
                    unit: Some("L".to_string()),
                    category: None,
                    expires_on: None,
                    notes: None,
                },
            )?;
            Ok(())
        })
        .unwrap();
        add_shopping_item(&db, item("tomatoes", 2.0, None)).unwrap();

        let result = add_recipe_to_shopping_list(&db, recipe_id, None).unwrap();

        // 2 cups of broth (473 ml) is covered by 1 L in the pantry
        assert_eq!(result.covered_by_pantry, vec!["chicken broth".to_string()]);
        assert_eq!(result.merged.len(), 1);
        assert_eq!(result.merged[0].quantity, 8.0);
        assert_eq!(result.added.len(), 1);
        assert_eq!(result.added[0].name, "salt");
    }

    #[test]
    fn test_add_missing_recipe() {
        let db = test_database();
        let err = add_recipe_to_shopping_list(&db, 7, None).unwrap_err();
        assert!(err.contains("not found"));
    }
}
