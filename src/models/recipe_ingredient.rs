//! Recipe ingredient model
//!
//! Ingredient lines are stored exactly as entered (name, quantity, unit for
//! the recipe's base servings). Scaling, conversion and formatting are
//! recomputed whenever the recipe is rendered.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::shopping_item::clean_unit;
use crate::db::{DbError, DbResult};
use crate::grocery::{classify, GroceryCategory};

/// An ingredient line in a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub category: GroceryCategory,
    pub position: i64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for adding an ingredient to a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientCreate {
    pub recipe_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

/// Data for updating a recipe ingredient
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeIngredientUpdate {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

impl RecipeIngredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            recipe_id: row.get("recipe_id")?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            category: GroceryCategory::from_db_str(&row.get::<_, String>("category")?),
            position: row.get("position")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Append an ingredient to the end of a recipe
    pub fn create(conn: &Connection, data: &RecipeIngredientCreate) -> DbResult<Self> {
        let position: i64 = conn.query_row(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM recipe_ingredients WHERE recipe_id = ?1",
            [data.recipe_id],
            |row| row.get(0),
        )?;

        conn.execute(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, name, quantity, unit, category, position, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.recipe_id,
                data.name.trim(),
                data.quantity,
                clean_unit(data.unit.as_deref()),
                classify(&data.name).as_str(),
                position,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| DbError::NotFound(format!("recipe ingredient {}", id)))
    }

    /// Get an ingredient by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipe_ingredients WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(ingredient) => Ok(Some(ingredient)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All ingredients of a recipe, in display order
    pub fn list_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM recipe_ingredients WHERE recipe_id = ?1 ORDER BY position ASC, id ASC",
        )?;

        let ingredients = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ingredients)
    }

    /// Number of ingredients in a recipe
    pub fn count_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipe_ingredients WHERE recipe_id = ?1",
            [recipe_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Every ingredient across all recipes
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipe_ingredients ORDER BY recipe_id, position")?;

        let ingredients = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ingredients)
    }

    /// Update an ingredient; a new name is reclassified
    pub fn update(conn: &Connection, id: i64, data: &RecipeIngredientUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($col:expr, $val:expr) => {
                updates.push(format!("{} = ?{}", $col, params_vec.len() + 1));
                params_vec.push(Box::new($val));
            };
        }

        if let Some(ref name) = data.name {
            add_update!("name", name.trim().to_string());
            add_update!("category", classify(name).as_str().to_string());
        }
        if let Some(quantity) = data.quantity {
            add_update!("quantity", quantity);
        }
        if let Some(ref unit) = data.unit {
            add_update!("unit", clean_unit(Some(unit.as_str())));
        }
        if let Some(ref notes) = data.notes {
            add_update!("notes", notes.clone());
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE recipe_ingredients SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Overwrite the stored category
    pub fn set_category(conn: &Connection, id: i64, category: GroceryCategory) -> DbResult<()> {
        conn.execute(
            "UPDATE recipe_ingredients SET category = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![category.as_str(), id],
        )?;
        Ok(())
    }

    /// Remove an ingredient; Ok(false) if not found
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipe_ingredients WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
