//! Grocery categorization module
//!
//! Classifies ingredient names into store aisles and groups items for display.

pub mod category;
pub mod classifier;

use std::collections::BTreeMap;

pub use category::{category_color, category_icon, GroceryCategory};
pub use classifier::{classify, is_liquid, matched_keyword};

/// Group items by category, in category display order.
///
/// Items keep their relative order within a group; empty categories are omitted.
pub fn group_by_category<T, F>(items: Vec<T>, category_of: F) -> Vec<(GroceryCategory, Vec<T>)>
where
    F: Fn(&T) -> GroceryCategory,
{
    let mut groups: BTreeMap<GroceryCategory, Vec<T>> = BTreeMap::new();
    for item in items {
        groups.entry(category_of(&item)).or_default().push(item);
    }
    groups.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_category_orders_groups() {
        let items = vec!["salt", "apples", "chicken", "bananas", "paper towels"];
        let groups = group_by_category(items, |name| classify(name));

        let order: Vec<GroceryCategory> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            order,
            vec![
                GroceryCategory::Produce,
                GroceryCategory::MeatSeafood,
                GroceryCategory::SpicesSeasonings,
                GroceryCategory::Other,
            ]
        );
        assert_eq!(groups[0].1, vec!["apples", "bananas"]);
    }

    #[test]
    fn test_group_by_category_empty() {
        let groups = group_by_category(Vec::<&str>::new(), |name| classify(name));
        assert!(groups.is_empty());
    }
}
