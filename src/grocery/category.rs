//! Grocery categories
//!
//! The fixed taxonomy used to bucket shopping and pantry items by store aisle.

use serde::{Deserialize, Serialize};

/// Grocery aisle an item belongs to
///
/// Declaration order is the display order used when grouping lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GroceryCategory {
    #[serde(rename = "Produce")]
    Produce,
    #[serde(rename = "Meat & Seafood")]
    MeatSeafood,
    #[serde(rename = "Dairy & Eggs")]
    DairyEggs,
    #[serde(rename = "Bakery")]
    Bakery,
    #[serde(rename = "Pantry")]
    Pantry,
    #[serde(rename = "Frozen")]
    Frozen,
    #[serde(rename = "Beverages")]
    Beverages,
    #[serde(rename = "Spices & Seasonings")]
    SpicesSeasonings,
    #[serde(rename = "Other")]
    Other,
}

impl GroceryCategory {
    /// Every category, in display order
    pub const ALL: [GroceryCategory; 9] = [
        GroceryCategory::Produce,
        GroceryCategory::MeatSeafood,
        GroceryCategory::DairyEggs,
        GroceryCategory::Bakery,
        GroceryCategory::Pantry,
        GroceryCategory::Frozen,
        GroceryCategory::Beverages,
        GroceryCategory::SpicesSeasonings,
        GroceryCategory::Other,
    ];

    /// Display name, also the value stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            GroceryCategory::Produce => "Produce",
            GroceryCategory::MeatSeafood => "Meat & Seafood",
            GroceryCategory::DairyEggs => "Dairy & Eggs",
            GroceryCategory::Bakery => "Bakery",
            GroceryCategory::Pantry => "Pantry",
            GroceryCategory::Frozen => "Frozen",
            GroceryCategory::Beverages => "Beverages",
            GroceryCategory::SpicesSeasonings => "Spices & Seasonings",
            GroceryCategory::Other => "Other",
        }
    }

    /// Parse a category name; accepts display names and loose spellings
    /// ("meat", "dairy", "spices"). Unknown names return None.
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "produce" => Some(GroceryCategory::Produce),
            "meat & seafood" | "meat and seafood" | "meat" | "seafood" => {
                Some(GroceryCategory::MeatSeafood)
            }
            "dairy & eggs" | "dairy and eggs" | "dairy" | "eggs" => Some(GroceryCategory::DairyEggs),
            "bakery" => Some(GroceryCategory::Bakery),
            "pantry" => Some(GroceryCategory::Pantry),
            "frozen" => Some(GroceryCategory::Frozen),
            "beverages" | "drinks" => Some(GroceryCategory::Beverages),
            "spices & seasonings" | "spices and seasonings" | "spices" | "seasonings" => {
                Some(GroceryCategory::SpicesSeasonings)
            }
            "other" => Some(GroceryCategory::Other),
            _ => None,
        }
    }

    /// Parse a stored category, falling back to Other for unknown values
    pub fn from_db_str(s: &str) -> Self {
        Self::from_str(s).unwrap_or(GroceryCategory::Other)
    }

    /// Icon token for display
    pub fn icon(&self) -> &'static str {
        match self {
            GroceryCategory::Produce => "leaf",
            GroceryCategory::MeatSeafood => "fish",
            GroceryCategory::DairyEggs => "drop",
            GroceryCategory::Bakery => "birthday.cake",
            GroceryCategory::Pantry => "cabinet",
            GroceryCategory::Frozen => "snowflake",
            GroceryCategory::Beverages => "cup.and.saucer",
            GroceryCategory::SpicesSeasonings => "flame",
            GroceryCategory::Other => "basket",
        }
    }

    /// Color token for display
    pub fn color(&self) -> &'static str {
        match self {
            GroceryCategory::Produce => "green",
            GroceryCategory::MeatSeafood => "red",
            GroceryCategory::DairyEggs => "blue",
            GroceryCategory::Bakery => "brown",
            GroceryCategory::Pantry => "orange",
            GroceryCategory::Frozen => "cyan",
            GroceryCategory::Beverages => "purple",
            GroceryCategory::SpicesSeasonings => "yellow",
            GroceryCategory::Other => "gray",
        }
    }
}

impl std::fmt::Display for GroceryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon token for a category
pub fn category_icon(category: GroceryCategory) -> &'static str {
    category.icon()
}

/// Color token for a category
pub fn category_color(category: GroceryCategory) -> &'static str {
    category.color()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_category_has_icon_and_color() {
        for category in GroceryCategory::ALL {
            assert!(!category_icon(category).is_empty(), "{} has no icon", category);
            assert!(!category_color(category).is_empty(), "{} has no color", category);
        }
    }

    #[test]
    fn test_display_names_round_trip() {
        for category in GroceryCategory::ALL {
            assert_eq!(GroceryCategory::from_str(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_display_names_are_distinct() {
        let names: HashSet<_> = GroceryCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn test_loose_spellings() {
        assert_eq!(GroceryCategory::from_str("dairy"), Some(GroceryCategory::DairyEggs));
        assert_eq!(GroceryCategory::from_str("  SPICES "), Some(GroceryCategory::SpicesSeasonings));
        assert_eq!(GroceryCategory::from_str("aisle 9"), None);
        assert_eq!(GroceryCategory::from_db_str("aisle 9"), GroceryCategory::Other);
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&GroceryCategory::MeatSeafood).unwrap();
        assert_eq!(json, "\"Meat & Seafood\"");
        let parsed: GroceryCategory = serde_json::from_str("\"Dairy & Eggs\"").unwrap();
        assert_eq!(parsed, GroceryCategory::DairyEggs);
    }

    #[test]
    fn test_display_order_matches_declaration() {
        let mut sorted = GroceryCategory::ALL;
        sorted.sort();
        assert_eq!(sorted, GroceryCategory::ALL);
    }
}
