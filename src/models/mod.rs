//! Data models
//!
//! Rust structs representing database entities.

mod pantry_item;
mod recipe;
mod recipe_ingredient;
mod shopping_item;

pub use pantry_item::{PantryItem, PantryItemCreate, PantryItemUpdate};
pub use recipe::{Recipe, RecipeCreate, RecipeUpdate};
pub use recipe_ingredient::{RecipeIngredient, RecipeIngredientCreate, RecipeIngredientUpdate};
pub use shopping_item::{ShoppingItem, ShoppingItemCreate, ShoppingItemUpdate};
