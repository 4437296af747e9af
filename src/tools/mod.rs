//! Larder Tools module
//!
//! MCP tool implementations for ingredients, recipes, the shopping list and
//! the pantry.

use serde::Serialize;

pub mod ingredients;
pub mod pantry;
pub mod recipes;
pub mod shopping;
pub mod status;

/// Response for delete/remove tools
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}
