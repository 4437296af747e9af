//! Pantry item model
//!
//! Kitchen inventory: what is on hand, how much, and when it expires.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::shopping_item::clean_unit;
use crate::db::{DbError, DbResult};
use crate::grocery::{classify, GroceryCategory};

/// Trimmed expiry date; empty means no date
fn clean_date(date: Option<&str>) -> Option<String> {
    date.map(str::trim).filter(|d| !d.is_empty()).map(str::to_string)
}

/// An item in the kitchen inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub category: GroceryCategory,
    pub category_locked: bool,
    /// ISO date, e.g. "2026-10-16"
    pub expires_on: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a pantry item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryItemCreate {
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub category: Option<GroceryCategory>,
    pub expires_on: Option<String>,
    pub notes: Option<String>,
}

/// Data for updating a pantry item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PantryItemUpdate {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: Option<GroceryCategory>,
    pub expires_on: Option<String>,
    pub notes: Option<String>,
}

impl PantryItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            category: GroceryCategory::from_db_str(&row.get::<_, String>("category")?),
            category_locked: row.get::<_, i32>("category_locked")? != 0,
            expires_on: row.get("expires_on")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new pantry item
    pub fn create(conn: &Connection, data: &PantryItemCreate) -> DbResult<Self> {
        let category = data.category.unwrap_or_else(|| classify(&data.name));

        conn.execute(
            r#"
            INSERT INTO pantry_items (name, quantity, unit, category, category_locked, expires_on, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.name.trim(),
                data.quantity,
                clean_unit(data.unit.as_deref()),
                category.as_str(),
                data.category.is_some() as i32,
                clean_date(data.expires_on.as_deref()),
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("pantry item {}", id)))
    }

    /// Get a pantry item by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM pantry_items WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List pantry items, optionally restricted to one category
    pub fn list(conn: &Connection, category: Option<GroceryCategory>) -> DbResult<Vec<Self>> {
        let items = match category {
            Some(category) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM pantry_items WHERE category = ?1 ORDER BY name COLLATE NOCASE ASC",
                )?;
                let rows = stmt.query_map([category.as_str()], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt =
                    conn.prepare("SELECT * FROM pantry_items ORDER BY name COLLATE NOCASE ASC")?;
                let rows = stmt.query_map([], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(items)
    }

    /// Search pantry items by name
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let search_pattern = format!("%{}%", query.trim());
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM pantry_items
            WHERE name LIKE ?1
            ORDER BY name COLLATE NOCASE ASC
            LIMIT ?2
            "#,
        )?;

        let items = stmt
            .query_map(params![search_pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Items with exactly this name, case-insensitive
    pub fn find_by_name(conn: &Connection, name: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM pantry_items WHERE name = ?1 COLLATE NOCASE ORDER BY id ASC",
        )?;

        let items = stmt
            .query_map([name.trim()], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Items expiring on or before the given ISO date, soonest first
    pub fn list_expiring(conn: &Connection, on_or_before: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM pantry_items
            WHERE expires_on IS NOT NULL AND expires_on <= ?1
            ORDER BY expires_on ASC, name COLLATE NOCASE ASC
            "#,
        )?;

        let items = stmt
            .query_map([on_or_before], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Update a pantry item
    ///
    /// Renaming an item whose category was not set by hand reclassifies it.
    pub fn update(conn: &Connection, id: i64, data: &PantryItemUpdate) -> DbResult<Option<Self>> {
        let existing = match Self::get_by_id(conn, id)? {
            Some(item) => item,
            None => return Ok(None),
        };

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
        }
        if let Some(quantity) = data.quantity {
            add_update!("quantity", quantity.max(0.0));
        }
        if let Some(ref unit) = data.unit {
            add_update!("unit", clean_unit(Some(unit.as_str())));
        }
        if let Some(ref expires_on) = data.expires_on {
            // An empty string clears the date
            add_update!("expires_on", clean_date(Some(expires_on.as_str())));
        }
        if let Some(ref notes) = data.notes {
            add_update!("notes", notes.clone());
        }

        match (data.category, &data.name) {
            (Some(category), _) => {
                add_update!("category", category.as_str().to_string());
                add_update!("category_locked", 1i32);
            }
            (None, Some(name)) if !existing.category_locked => {
                add_update!("category", classify(name).as_str().to_string());
            }
            _ => {}
        }

        if updates.is_empty() {
            return Ok(Some(existing));
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE pantry_items SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Add (or with a negative delta, consume) stock; never drops below zero
    pub fn adjust_quantity(conn: &Connection, id: i64, delta: f64) -> DbResult<Option<Self>> {
        conn.execute(
            r#"
            UPDATE pantry_items
            SET quantity = MAX(quantity + ?1, 0), updated_at = datetime('now')
            WHERE id = ?2
            "#,
            params![delta, id],
        )?;
        Self::get_by_id(conn, id)
    }

    /// Overwrite the stored category without locking it
    pub fn set_category(conn: &Connection, id: i64, category: GroceryCategory) -> DbResult<()> {
        conn.execute(
            "UPDATE pantry_items SET category = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![category.as_str(), id],
        )?;
        Ok(())
    }

    /// Delete a pantry item; Ok(false) if it did not exist
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM pantry_items WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn create(conn: &Connection, name: &str, quantity: f64, unit: Option<&str>, expires: Option<&str>) -> PantryItem {
        PantryItem::create(
            conn,
            &PantryItemCreate {
                name: name.to_string(),
                quantity,
                unit: unit.map(str::to_string),
                category: None,
                expires_on: expires.map(str::to_string),
                notes: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_list_by_category() {
        let conn = conn();
        create(&conn, "Basmati Rice", 2.0, Some("kg"), None);
        create(&conn, "Carrots", 6.0, None, None);

        let pantry = PantryItem::list(&conn, Some(GroceryCategory::Pantry)).unwrap();
        assert_eq!(pantry.len(), 1);
        assert_eq!(pantry[0].name, "Basmati Rice");
        assert_eq!(PantryItem::list(&conn, None).unwrap().len(), 2);
    }

    #[test]
    fn test_adjust_quantity_clamps_at_zero() {
        let conn = conn();
        let item = create(&conn, "eggs", 6.0, None, None);

        let item = PantryItem::adjust_quantity(&conn, item.id, -4.0).unwrap().unwrap();
        assert_eq!(item.quantity, 2.0);
        let item = PantryItem::adjust_quantity(&conn, item.id, -5.0).unwrap().unwrap();
        assert_eq!(item.quantity, 0.0);
    }

    #[test]
    fn test_list_expiring() {
        let conn = conn();
        create(&conn, "milk", 1.0, Some("L"), Some("2026-10-18"));
        create(&conn, "yogurt", 1.0, None, Some("2026-10-16"));
        create(&conn, "honey", 1.0, None, None);
        create(&conn, "cheddar", 200.0, Some("g"), Some("2026-12-01"));

        let expiring = PantryItem::list_expiring(&conn, "2026-10-20").unwrap();
        let names: Vec<&str> = expiring.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["yogurt", "milk"]);
    }

    #[test]
    fn test_search_and_find_by_name() {
        let conn = conn();
        create(&conn, "Whole Milk", 1.0, Some("L"), None);
        create(&conn, "Oat Milk", 1.0, Some("L"), None);

        assert_eq!(PantryItem::search(&conn, "milk", 10).unwrap().len(), 2);
        assert_eq!(PantryItem::find_by_name(&conn, "whole milk").unwrap().len(), 1);
    }

    #[test]
    fn test_update_clears_expiry() {
        let conn = conn();
        let item = create(&conn, "butter", 250.0, Some("g"), Some("2026-11-01"));

        let updated = PantryItem::update(
            &conn,
            item.id,
            &PantryItemUpdate {
                expires_on: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert!(updated.expires_on.is_none());
    }

    #[test]
    fn test_create_normalizes_expiry() {
        let conn = conn();
        let honey = create(&conn, "honey", 1.0, None, Some(""));
        let rice = create(&conn, "rice", 1.0, Some("kg"), Some(" 2099-01-01 "));

        assert!(honey.expires_on.is_none());
        assert_eq!(rice.expires_on.as_deref(), Some("2099-01-01"));
        assert!(PantryItem::list_expiring(&conn, "2024-03-11").unwrap().is_empty());
    }
}
