//! Pantry MCP Tools
//!
//! Tools for tracking what is already in the kitchen.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::DeleteResponse;
use crate::db::Database;
use crate::grocery::GroceryCategory;
use crate::measure::format_amount;
use crate::models::{PantryItem, PantryItemCreate, PantryItemUpdate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A pantry item as shown to the user
#[derive(Debug, Serialize)]
pub struct PantryItemView {
    #[serde(flatten)]
    pub item: PantryItem,
    /// "500 g rice"
    pub display: String,
    pub icon: &'static str,
    /// Negative once the item has expired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_expiry: Option<i64>,
}

impl PantryItemView {
    fn new(item: PantryItem, today: NaiveDate) -> Self {
        let days_until_expiry = item
            .expires_on
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
            .map(|d| (d - today).num_days());

        Self {
            display: format!("{} {}", format_amount(item.quantity, item.unit.as_deref()), item.name),
            icon: item.category.icon(),
            days_until_expiry,
            item,
        }
    }
}

/// Response for list/search tools
#[derive(Debug, Serialize)]
pub struct PantryListResponse {
    pub items: Vec<PantryItemView>,
    pub count: usize,
}

/// Response for list_expiring_items
#[derive(Debug, Serialize)]
pub struct ExpiringItemsResponse {
    pub through: String,
    pub expired: Vec<PantryItemView>,
    pub expiring: Vec<PantryItemView>,
}

/// Current local date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Validate an expiry date; an empty string clears it
fn validate_expiry(expires_on: Option<&str>) -> Result<(), String> {
    match expires_on.map(str::trim) {
        Some(date) if !date.is_empty() => NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map(|_| ())
            .map_err(|_| format!("Invalid expiry date '{}': expected YYYY-MM-DD", date)),
        _ => Ok(()),
    }
}

/// Parse an optional category filter
pub fn parse_category(category: Option<&str>) -> Result<Option<GroceryCategory>, String> {
    category
        .map(|c| {
            GroceryCategory::from_str(c).ok_or_else(|| format!("Unknown grocery category '{}'", c))
        })
        .transpose()
}

/// Add an item to the pantry
pub fn add_pantry_item(db: &Database, data: PantryItemCreate) -> Result<PantryItemView, String> {
    if data.name.trim().is_empty() {
        return Err("Item name cannot be empty".to_string());
    }
    if data.quantity < 0.0 {
        return Err("quantity cannot be negative".to_string());
    }
    validate_expiry(data.expires_on.as_deref())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let item = PantryItem::create(&conn, &data)
        .map_err(|e| format!("Failed to add pantry item: {}", e))?;

    tracing::info!(id = item.id, name = %item.name, "added pantry item");
    Ok(PantryItemView::new(item, today()))
}

/// Get a pantry item by ID
pub fn get_pantry_item(db: &Database, id: i64) -> Result<Option<PantryItemView>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let item = PantryItem::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get pantry item: {}", e))?;

    Ok(item.map(|i| PantryItemView::new(i, today())))
}

/// List pantry items, optionally by category
pub fn list_pantry_items(db: &Database, category: Option<&str>) -> Result<PantryListResponse, String> {
    let category = parse_category(category)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let items = PantryItem::list(&conn, category)
        .map_err(|e| format!("Failed to list pantry items: {}", e))?;

    let today = today();
    let items: Vec<PantryItemView> = items.into_iter().map(|i| PantryItemView::new(i, today)).collect();
    let count = items.len();

    Ok(PantryListResponse { items, count })
}

/// Search pantry items by name
pub fn search_pantry_items(db: &Database, query: &str, limit: Option<i64>) -> Result<PantryListResponse, String> {
    let limit = limit.unwrap_or(20).clamp(1, 100);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let items = PantryItem::search(&conn, query, limit)
        .map_err(|e| format!("Failed to search pantry: {}", e))?;

    let today = today();
    let items: Vec<PantryItemView> = items.into_iter().map(|i| PantryItemView::new(i, today)).collect();
    let count = items.len();

    Ok(PantryListResponse { items, count })
}

/// Update a pantry item
pub fn update_pantry_item(
    db: &Database,
    id: i64,
    data: PantryItemUpdate,
) -> Result<Option<PantryItemView>, String> {
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err("Item name cannot be empty".to_string());
        }
    }
    if data.quantity.map_or(false, |q| q < 0.0) {
        return Err("quantity cannot be negative".to_string());
    }
    validate_expiry(data.expires_on.as_deref())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let item = PantryItem::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update pantry item: {}", e))?;

    Ok(item.map(|i| PantryItemView::new(i, today())))
}

/// Add to (or with a negative delta, use up) a pantry item's quantity
///
/// The stored quantity never drops below zero.
pub fn adjust_pantry_quantity(db: &Database, id: i64, delta: f64) -> Result<Option<PantryItemView>, String> {
    if !delta.is_finite() {
        return Err("delta must be a finite number".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let item = PantryItem::adjust_quantity(&conn, id, delta)
        .map_err(|e| format!("Failed to adjust pantry item: {}", e))?;

    if let Some(ref item) = item {
        if item.quantity == 0.0 {
            tracing::info!(id, name = %item.name, "pantry item used up");
        }
    }

    Ok(item.map(|i| PantryItemView::new(i, today())))
}

/// Delete a pantry item
pub fn delete_pantry_item(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted = PantryItem::delete(&conn, id)
        .map_err(|e| format!("Failed to delete pantry item: {}", e))?;

    if !deleted {
        return Err(format!("Pantry item {} not found", id));
    }

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

/// Items that expire within `days` of `today`, split into already expired and upcoming
pub fn list_expiring_items(db: &Database, days: i64, today: NaiveDate) -> Result<ExpiringItemsResponse, String> {
    if days < 0 {
        return Err("days cannot be negative".to_string());
    }

    let through = Duration::try_days(days)
        .and_then(|span| today.checked_add_signed(span))
        .ok_or_else(|| "days out of range".to_string())?;
    let through_str = through.format(DATE_FORMAT).to_string();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let items = PantryItem::list_expiring(&conn, &through_str)
        .map_err(|e| format!("Failed to list expiring items: {}", e))?;

    let (expired, expiring): (Vec<_>, Vec<_>) = items
        .into_iter()
        .map(|i| PantryItemView::new(i, today))
        .partition(|v| v.days_until_expiry.map_or(false, |d| d < 0));

    Ok(ExpiringItemsResponse {
        through: through_str,
        expired,
        expiring,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;

    fn pantry(name: &str, quantity: f64, unit: Option<&str>, expires_on: Option<&str>) -> PantryItemCreate {
        PantryItemCreate {
            name: name.to_string(),
            quantity,
            unit: unit.map(str::to_string),
            category: None,
            expires_on: expires_on.map(str::to_string),
            notes: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_add_and_list_by_category() {
        let db = test_database();
        add_pantry_item(&db, pantry("Basmati rice", 1.0, Some("kg"), None)).unwrap();
        add_pantry_item(&db, pantry("Cheddar", 200.0, Some("g"), None)).unwrap();

        let all = list_pantry_items(&db, None).unwrap();
        assert_eq!(all.count, 2);

        let dairy = list_pantry_items(&db, Some("dairy")).unwrap();
        assert_eq!(dairy.count, 1);
        assert_eq!(dairy.items[0].item.name, "Cheddar");
        assert_eq!(dairy.items[0].display, "200 g Cheddar");

        assert!(list_pantry_items(&db, Some("hardware")).is_err());
    }

    #[test]
    fn test_rejects_bad_input() {
        let db = test_database();
        assert!(add_pantry_item(&db, pantry("", 1.0, None, None)).is_err());
        assert!(add_pantry_item(&db, pantry("milk", -2.0, None, None)).is_err());
        assert!(add_pantry_item(&db, pantry("milk", 1.0, None, Some("next tuesday"))).is_err());
    }

    #[test]
    fn test_adjust_clamps_at_zero() {
        let db = test_database();
        let eggs = add_pantry_item(&db, pantry("eggs", 6.0, None, None)).unwrap();

        let used = adjust_pantry_quantity(&db, eggs.item.id, -4.0).unwrap().unwrap();
        assert_eq!(used.item.quantity, 2.0);

        let empty = adjust_pantry_quantity(&db, eggs.item.id, -10.0).unwrap().unwrap();
        assert_eq!(empty.item.quantity, 0.0);

        assert!(adjust_pantry_quantity(&db, 999, 1.0).unwrap().is_none());
    }

    #[test]
    fn test_list_expiring_items() {
        let db = test_database();
        add_pantry_item(&db, pantry("yogurt", 1.0, None, Some("2024-03-01"))).unwrap();
        add_pantry_item(&db, pantry("spinach", 1.0, Some("bag"), Some("2024-03-06"))).unwrap();
        add_pantry_item(&db, pantry("flour", 1.0, Some("kg"), Some("2024-09-01"))).unwrap();
        add_pantry_item(&db, pantry("salt", 1.0, None, None)).unwrap();

        let result = list_expiring_items(&db, 7, date("2024-03-04")).unwrap();
        assert_eq!(result.through, "2024-03-11");
        assert_eq!(result.expired.len(), 1);
        assert_eq!(result.expired[0].item.name, "yogurt");
        assert_eq!(result.expired[0].days_until_expiry, Some(-3));
        assert_eq!(result.expiring.len(), 1);
        assert_eq!(result.expiring[0].days_until_expiry, Some(2));

        assert!(list_expiring_items(&db, -1, date("2024-03-04")).is_err());
    }

    #[test]
    fn test_delete() {
        let db = test_database();
        let item = add_pantry_item(&db, pantry("oats", 500.0, Some("g"), None)).unwrap();
        assert!(delete_pantry_item(&db, item.item.id).unwrap().success);
        assert!(get_pantry_item(&db, item.item.id).unwrap().is_none());
        assert!(delete_pantry_item(&db, item.item.id).is_err());
    }

    #[test]
    fn test_blank_and_padded_expiry_dates() {
        let db = test_database();
        let honey = add_pantry_item(&db, pantry("honey", 1.0, None, Some(""))).unwrap();
        let rice = add_pantry_item(&db, pantry("rice", 1.0, Some("kg"), Some(" 2099-01-01 "))).unwrap();
        assert_eq!(honey.item.expires_on, None);
        assert_eq!(rice.item.expires_on.as_deref(), Some("2099-01-01"));
        assert!(rice.days_until_expiry.is_some());

        let result = list_expiring_items(&db, 7, date("2024-03-04")).unwrap();
        assert!(result.expired.is_empty());
        assert!(result.expiring.is_empty());
    }

    #[test]
    fn test_expiry_window_out_of_range() {
        let db = test_database();
        let err = list_expiring_items(&db, 100_000_000, date("2024-03-04")).unwrap_err();
        assert_eq!(err, "days out of range");
        assert!(list_expiring_items(&db, i64::MAX, date("2024-03-04")).is_err());
    }
}
