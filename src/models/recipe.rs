//! Recipe model
//!
//! A recipe and the number of servings its ingredient quantities are written for.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub base_servings: f64,
    pub is_favorite: bool,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub name: String,
    #[serde(default = "default_servings")]
    pub base_servings: f64,
    #[serde(default)]
    pub is_favorite: bool,
    pub notes: Option<String>,
}

fn default_servings() -> f64 {
    1.0
}

/// Data for updating a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub base_servings: Option<f64>,
    pub is_favorite: Option<bool>,
    pub notes: Option<String>,
}

impl Recipe {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            base_servings: row.get("base_servings")?,
            is_favorite: row.get::<_, i32>("is_favorite")? != 0,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new recipe into the database
    pub fn create(conn: &Connection, data: &RecipeCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO recipes (name, base_servings, is_favorite, notes)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                data.name.trim(),
                data.base_servings,
                data.is_favorite as i32,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("recipe {}", id)))
    }

    /// Get a recipe by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List recipes with optional name search and favorites filter
    pub fn list(
        conn: &Connection,
        query: Option<&str>,
        favorites_only: bool,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let pattern = format!("%{}%", query.unwrap_or("").trim());
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM recipes
            WHERE name LIKE ?1 AND (?2 = 0 OR is_favorite = 1)
            ORDER BY name COLLATE NOCASE ASC
            LIMIT ?3 OFFSET ?4
            "#,
        )?;

        let recipes = stmt
            .query_map(
                params![pattern, favorites_only as i32, limit, offset],
                Self::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(recipes)
    }

    /// Count recipes matching the same filters as `list`
    pub fn count(conn: &Connection, query: Option<&str>, favorites_only: bool) -> DbResult<i64> {
        let pattern = format!("%{}%", query.unwrap_or("").trim());
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipes WHERE name LIKE ?1 AND (?2 = 0 OR is_favorite = 1)",
            params![pattern, favorites_only as i32],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Update a recipe
    pub fn update(conn: &Connection, id: i64, data: &RecipeUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident, $col:expr) => {
                if let Some(ref val) = data.$field {
                    updates.push(format!("{} = ?{}", $col, params_vec.len() + 1));
                    params_vec.push(Box::new(val.clone()));
                }
            };
        }

        add_update!(name, "name");
        add_update!(base_servings, "base_servings");
        add_update!(notes, "notes");

        if let Some(fav) = data.is_favorite {
            updates.push(format!("is_favorite = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(fav as i32));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE recipes SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete a recipe and its ingredients; Ok(false) if not found
    ///
    /// Shopping items generated from the recipe stay on the list.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
