//! Shopping item model
//!
//! A line on the shopping list. Items are auto-classified into a grocery
//! category unless one is given explicitly.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::grocery::{classify, GroceryCategory};

/// A shopping list item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub category: GroceryCategory,
    /// True when the category was chosen by hand and must not be reclassified
    pub category_locked: bool,
    pub is_checked: bool,
    /// Recipe this line was generated from, if any
    pub recipe_id: Option<i64>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a shopping item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingItemCreate {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit: Option<String>,
    /// Classified from the name when absent
    pub category: Option<GroceryCategory>,
    pub recipe_id: Option<i64>,
    pub notes: Option<String>,
}

fn default_quantity() -> f64 {
    1.0
}

/// Data for updating a shopping item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShoppingItemUpdate {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: Option<GroceryCategory>,
    pub notes: Option<String>,
}

/// Empty units are stored as NULL
pub(crate) fn clean_unit(unit: Option<&str>) -> Option<String> {
    unit.map(str::trim).filter(|u| !u.is_empty()).map(str::to_string)
}

impl ShoppingItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            category: GroceryCategory::from_db_str(&row.get::<_, String>("category")?),
            category_locked: row.get::<_, i32>("category_locked")? != 0,
            is_checked: row.get::<_, i32>("is_checked")? != 0,
            recipe_id: row.get("recipe_id")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new shopping item
    pub fn create(conn: &Connection, data: &ShoppingItemCreate) -> DbResult<Self> {
        let category = data.category.unwrap_or_else(|| classify(&data.name));

        conn.execute(
            r#"
            INSERT INTO shopping_items (name, quantity, unit, category, category_locked, recipe_id, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.name.trim(),
                data.quantity,
                clean_unit(data.unit.as_deref()),
                category.as_str(),
                data.category.is_some() as i32,
                data.recipe_id,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| DbError::NotFound(format!("shopping item {}", id)))
    }

    /// Get a shopping item by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM shopping_items WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List items, unchecked first, then by name
    pub fn list(conn: &Connection, include_checked: bool) -> DbResult<Vec<Self>> {
        let sql = if include_checked {
            "SELECT * FROM shopping_items ORDER BY is_checked ASC, name COLLATE NOCASE ASC"
        } else {
            "SELECT * FROM shopping_items WHERE is_checked = 0 ORDER BY name COLLATE NOCASE ASC"
        };

        let mut stmt = conn.prepare(sql)?;
        let items = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Unchecked items with the given name, case-insensitive
    pub fn find_unchecked_by_name(conn: &Connection, name: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM shopping_items
            WHERE name = ?1 COLLATE NOCASE AND is_checked = 0
            ORDER BY id ASC
            "#,
        )?;

        let items = stmt
            .query_map([name.trim()], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Update a shopping item
    ///
    /// Renaming an item whose category was not set by hand reclassifies it.
    pub fn update(conn: &Connection, id: i64, data: &ShoppingItemUpdate) -> DbResult<Option<Self>> {
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
            add_update!("quantity", quantity);
        }
        if let Some(ref unit) = data.unit {
            add_update!("unit", clean_unit(Some(unit.as_str())));
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
            "UPDATE shopping_items SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Add to an item's quantity (merging a duplicate line)
    pub fn add_quantity(conn: &Connection, id: i64, delta: f64) -> DbResult<Option<Self>> {
        conn.execute(
            "UPDATE shopping_items SET quantity = quantity + ?1, updated_at = datetime('now') WHERE id = ?2",
            params![delta, id],
        )?;
        Self::get_by_id(conn, id)
    }

    /// Check or uncheck an item
    pub fn set_checked(conn: &Connection, id: i64, checked: bool) -> DbResult<Option<Self>> {
        conn.execute(
            "UPDATE shopping_items SET is_checked = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![checked as i32, id],
        )?;
        Self::get_by_id(conn, id)
    }

    /// Overwrite the stored category without locking it
    pub fn set_category(conn: &Connection, id: i64, category: GroceryCategory) -> DbResult<()> {
        conn.execute(
            "UPDATE shopping_items SET category = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![category.as_str(), id],
        )?;
        Ok(())
    }

    /// Delete an item; Ok(false) if it did not exist
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM shopping_items WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Delete every checked item, returning how many were removed
    pub fn clear_checked(conn: &Connection) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM shopping_items WHERE is_checked = 1", [])?;
        Ok(rows)
    }

    /// Count items, optionally only checked or unchecked ones
    pub fn count(conn: &Connection, checked: Option<bool>) -> DbResult<i64> {
        let count: i64 = match checked {
            Some(checked) => conn.query_row(
                "SELECT COUNT(*) FROM shopping_items WHERE is_checked = ?1",
                [checked as i32],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM shopping_items", [], |row| row.get(0))?,
        };
        Ok(count)
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

    fn create(conn: &Connection, name: &str) -> ShoppingItem {
        ShoppingItem::create(
            conn,
            &ShoppingItemCreate {
                name: name.to_string(),
                quantity: 1.0,
                unit: None,
                category: None,
                recipe_id: None,
                notes: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_classifies() {
        let conn = conn();
        let item = create(&conn, "  Chicken Broth ");
        assert_eq!(item.name, "Chicken Broth");
        assert_eq!(item.category, GroceryCategory::MeatSeafood);
        assert!(!item.category_locked);
        assert!(!item.is_checked);
    }

    #[test]
    fn test_create_with_explicit_category_locks() {
        let conn = conn();
        let item = ShoppingItem::create(
            &conn,
            &ShoppingItemCreate {
                name: "chicken broth".to_string(),
                quantity: 2.0,
                unit: Some(" cups ".to_string()),
                category: Some(GroceryCategory::Pantry),
                recipe_id: None,
                notes: None,
            },
        )
        .unwrap();
        assert_eq!(item.category, GroceryCategory::Pantry);
        assert!(item.category_locked);
        assert_eq!(item.unit.as_deref(), Some("cups"));
    }

    #[test]
    fn test_rename_reclassifies_unless_locked() {
        let conn = conn();
        let item = create(&conn, "milk");

        let renamed = ShoppingItem::update(
            &conn,
            item.id,
            &ShoppingItemUpdate {
                name: Some("bananas".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(renamed.category, GroceryCategory::Produce);

        let locked = ShoppingItem::update(
            &conn,
            item.id,
            &ShoppingItemUpdate {
                category: Some(GroceryCategory::Frozen),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert!(locked.category_locked);

        let renamed_again = ShoppingItem::update(
            &conn,
            item.id,
            &ShoppingItemUpdate {
                name: Some("milk".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(renamed_again.category, GroceryCategory::Frozen);
    }

    #[test]
    fn test_update_missing_returns_none() {
        let conn = conn();
        let result = ShoppingItem::update(&conn, 99, &ShoppingItemUpdate::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_check_and_clear() {
        let conn = conn();
        let a = create(&conn, "apples");
        create(&conn, "bread");

        ShoppingItem::set_checked(&conn, a.id, true).unwrap();
        assert_eq!(ShoppingItem::list(&conn, false).unwrap().len(), 1);
        assert_eq!(ShoppingItem::list(&conn, true).unwrap().len(), 2);
        assert_eq!(ShoppingItem::count(&conn, Some(true)).unwrap(), 1);

        assert_eq!(ShoppingItem::clear_checked(&conn).unwrap(), 1);
        assert_eq!(ShoppingItem::count(&conn, None).unwrap(), 1);
    }

    #[test]
    fn test_find_unchecked_by_name_ignores_case() {
        let conn = conn();
        let item = create(&conn, "Eggs");
        assert_eq!(ShoppingItem::find_unchecked_by_name(&conn, "eggs").unwrap().len(), 1);

        ShoppingItem::add_quantity(&conn, item.id, 11.0).unwrap();
        let merged = ShoppingItem::get_by_id(&conn, item.id).unwrap().unwrap();
        assert_eq!(merged.quantity, 12.0);
    }

    #[test]
    fn test_delete() {
        let conn = conn();
        let item = create(&conn, "rice");
        assert!(ShoppingItem::delete(&conn, item.id).unwrap());
        assert!(!ShoppingItem::delete(&conn, item.id).unwrap());
    }
}
