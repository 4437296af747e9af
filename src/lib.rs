//! Larder Library
//!
//! Ingredient classification, unit conversion and recipe scaling, plus the
//! recipe book, shopping list and pantry served over MCP.

pub mod build_info;
pub mod config;
pub mod db;
pub mod grocery;
pub mod mcp;
pub mod measure;
pub mod models;
pub mod tools;
