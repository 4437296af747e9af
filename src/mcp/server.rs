//! Larder MCP Server Implementation
//!
//! Implements the MCP server with all Larder tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::measure::MeasurementSystem;
use crate::models::{
    PantryItemCreate, PantryItemUpdate, RecipeCreate, RecipeIngredientCreate, RecipeIngredientUpdate,
    RecipeUpdate, ShoppingItemCreate, ShoppingItemUpdate,
};
use crate::tools::pantry::parse_category;
use crate::tools::status::StatusTracker;
use crate::tools::{ingredients, pantry, recipes, shopping};

/// Larder MCP Service
#[derive(Clone)]
pub struct LarderService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    default_system: MeasurementSystem,
    tool_router: ToolRouter<LarderService>,
}

impl LarderService {
    pub fn new(database_path: PathBuf, database: Database, default_system: MeasurementSystem) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path, default_system))),
            database,
            default_system,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(what: &str, id: i64) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": {}}}"#,
        what, id
    ))]))
}

// ============================================================================
// Ingredient Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClassifyIngredientParams {
    /// Ingredient name, e.g. "chicken broth"
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertUnitsParams {
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertToSystemParams {
    pub value: f64,
    pub unit: String,
    /// "metric" or "imperial"
    pub system: String,
    /// Ingredient name; liquids get liquid imperial units
    pub ingredient: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScaleQuantityParams {
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub base_servings: f64,
    pub servings: f64,
    /// "metric" or "imperial"; omit to keep the unit
    pub system: Option<String>,
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    pub name: String,
    #[serde(default = "default_servings")]
    pub base_servings: f64,
    #[serde(default)]
    pub is_favorite: bool,
    pub notes: Option<String>,
}

fn default_servings() -> f64 { 1.0 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    pub id: i64,
    /// Servings to render for; defaults to the recipe's base servings
    pub servings: Option<f64>,
    /// "metric", "imperial" or "original"; defaults to the configured system
    pub system: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListRecipesParams {
    pub query: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    pub id: i64,
    pub name: Option<String>,
    pub base_servings: Option<f64>,
    pub is_favorite: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRecipeIngredientParams {
    pub recipe_id: i64,
    pub name: String,
    /// Quantity for the recipe's base servings
    pub quantity: f64,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeIngredientParams {
    pub id: i64,
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

// ============================================================================
// Shopping Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddShoppingItemParams {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit: Option<String>,
    /// Grocery category; classified from the name when omitted
    pub category: Option<String>,
    pub notes: Option<String>,
}

fn default_quantity() -> f64 { 1.0 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListShoppingListParams {
    #[serde(default)]
    pub include_checked: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateShoppingItemParams {
    pub id: i64,
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetCheckedParams {
    pub id: i64,
    #[serde(default = "default_checked")]
    pub checked: bool,
}

fn default_checked() -> bool { true }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRecipeToShoppingListParams {
    pub recipe_id: i64,
    /// Defaults to the recipe's base servings
    pub servings: Option<f64>,
}

// ============================================================================
// Pantry Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddPantryItemParams {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit: Option<String>,
    pub category: Option<String>,
    /// YYYY-MM-DD
    pub expires_on: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListPantryItemsParams {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchPantryItemsParams {
    pub query: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdatePantryItemParams {
    pub id: i64,
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: Option<String>,
    /// YYYY-MM-DD; an empty string clears the date
    pub expires_on: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AdjustPantryQuantityParams {
    pub id: i64,
    /// Positive to restock, negative to use up
    pub delta: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListExpiringItemsParams {
    #[serde(default = "default_expiry_days")]
    pub days: i64,
}

fn default_expiry_days() -> i64 { 7 }

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl LarderService {
    // --- Status ---

    #[tool(description = "Get the current status of the Larder service including build info, database status, and process information")]
    async fn larder_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        json_result(&status)
    }

    #[tool(description = "Get instructions for using the recipe, shopping list and pantry tools. Call this when starting a kitchen session.")]
    fn kitchen_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::KITCHEN_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(KITCHEN_INSTRUCTIONS)]))
    }

    // --- Ingredients ---

    #[tool(description = "Classify an ingredient name into a grocery category (Produce, Meat & Seafood, Dairy & Eggs, ...)")]
    fn classify_ingredient(&self, Parameters(p): Parameters<ClassifyIngredientParams>) -> Result<CallToolResult, McpError> {
        json_result(&ingredients::classify_ingredient(&p.name))
    }

    #[tool(description = "List all grocery categories in shopping order with their icon and color")]
    fn list_categories(&self) -> Result<CallToolResult, McpError> {
        json_result(&ingredients::list_categories())
    }

    #[tool(description = "Convert a quantity between two weight units or two volume units")]
    fn convert_units(&self, Parameters(p): Parameters<ConvertUnitsParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::convert_units(p.value, &p.from_unit, &p.to_unit)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Express a quantity in the metric or imperial system, picking a readable unit")]
    fn convert_to_system(&self, Parameters(p): Parameters<ConvertToSystemParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::convert_to_system(p.value, &p.unit, &p.system, p.ingredient.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Scale an ingredient quantity from base servings to a new number of servings")]
    fn scale_quantity(&self, Parameters(p): Parameters<ScaleQuantityParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::scale_quantity(
            &p.name,
            p.quantity,
            p.unit.as_deref(),
            p.base_servings,
            p.servings,
            p.system.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Recipes ---

    #[tool(description = "Create a new recipe. Ingredient quantities are entered for base_servings.")]
    fn create_recipe(&self, Parameters(p): Parameters<CreateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeCreate {
            name: p.name,
            base_servings: p.base_servings,
            is_favorite: p.is_favorite,
            notes: p.notes,
        };
        let result = recipes::create_recipe(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a recipe scaled to any number of servings, with quantities in metric, imperial or original units")]
    fn get_recipe(&self, Parameters(p): Parameters<GetRecipeParams>) -> Result<CallToolResult, McpError> {
        let system = recipes::resolve_system(p.system.as_deref(), self.default_system)
            .map_err(|e| McpError::internal_error(e, None))?;
        let result = recipes::get_recipe(&self.database, p.id, p.servings, system)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(recipe) => json_result(&recipe),
            None => not_found("Recipe", p.id),
        }
    }

    #[tool(description = "List recipes with optional name search, favorites filter, and pagination")]
    fn list_recipes(&self, Parameters(p): Parameters<ListRecipesParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::list_recipes(&self.database, p.query.as_deref(), p.favorites_only, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a recipe's name, base servings, favorite flag or notes")]
    fn update_recipe(&self, Parameters(p): Parameters<UpdateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeUpdate {
            name: p.name,
            base_servings: p.base_servings,
            is_favorite: p.is_favorite,
            notes: p.notes,
        };
        let result = recipes::update_recipe(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a recipe and its ingredients. Shopping list lines already added are kept.")]
    fn delete_recipe(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::delete_recipe(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add an ingredient to a recipe; the grocery category is assigned automatically")]
    fn add_recipe_ingredient(&self, Parameters(p): Parameters<AddRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeIngredientCreate {
            recipe_id: p.recipe_id,
            name: p.name,
            quantity: p.quantity,
            unit: p.unit,
            notes: p.notes,
        };
        let result = recipes::add_recipe_ingredient(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a recipe ingredient's name, quantity, unit or notes")]
    fn update_recipe_ingredient(&self, Parameters(p): Parameters<UpdateRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeIngredientUpdate {
            name: p.name,
            quantity: p.quantity,
            unit: p.unit,
            notes: p.notes,
        };
        let result = recipes::update_recipe_ingredient(&self.database, p.id, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(ingredient) => json_result(&ingredient),
            None => not_found("Recipe ingredient", p.id),
        }
    }

    #[tool(description = "Remove an ingredient from a recipe")]
    fn remove_recipe_ingredient(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let removed = recipes::remove_recipe_ingredient(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = format!(r#"{{"success": {}, "removed_id": {}}}"#, removed, p.id);
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Shopping List ---

    #[tool(description = "Add an item to the shopping list; the grocery category is assigned from the name unless given")]
    fn add_shopping_item(&self, Parameters(p): Parameters<AddShoppingItemParams>) -> Result<CallToolResult, McpError> {
        let category = parse_category(p.category.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        let data = ShoppingItemCreate {
            name: p.name,
            quantity: p.quantity,
            unit: p.unit,
            category,
            recipe_id: None,
            notes: p.notes,
        };
        let result = shopping::add_shopping_item(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the shopping list grouped by grocery category")]
    fn list_shopping_list(&self, Parameters(p): Parameters<ListShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = shopping::list_shopping_list(&self.database, p.include_checked)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a shopping item. Setting a category keeps it through renames.")]
    fn update_shopping_item(&self, Parameters(p): Parameters<UpdateShoppingItemParams>) -> Result<CallToolResult, McpError> {
        let category = parse_category(p.category.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        let data = ShoppingItemUpdate {
            name: p.name,
            quantity: p.quantity,
            unit: p.unit,
            category,
            notes: p.notes,
        };
        let result = shopping::update_shopping_item(&self.database, p.id, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(item) => json_result(&item),
            None => not_found("Shopping item", p.id),
        }
    }

    #[tool(description = "Check (or uncheck with checked=false) a shopping item")]
    fn set_shopping_item_checked(&self, Parameters(p): Parameters<SetCheckedParams>) -> Result<CallToolResult, McpError> {
        let result = shopping::set_shopping_item_checked(&self.database, p.id, p.checked)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(item) => json_result(&item),
            None => not_found("Shopping item", p.id),
        }
    }

    #[tool(description = "Remove an item from the shopping list")]
    fn remove_shopping_item(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = shopping::remove_shopping_item(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove every checked item from the shopping list")]
    fn clear_checked_items(&self) -> Result<CallToolResult, McpError> {
        let result = shopping::clear_checked_items(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add a recipe's ingredients to the shopping list, scaled to servings, minus what the pantry already holds")]
    fn add_recipe_to_shopping_list(&self, Parameters(p): Parameters<AddRecipeToShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = shopping::add_recipe_to_shopping_list(&self.database, p.recipe_id, p.servings)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Pantry ---

    #[tool(description = "Add an item to the pantry (kitchen inventory) with an optional expiry date")]
    fn add_pantry_item(&self, Parameters(p): Parameters<AddPantryItemParams>) -> Result<CallToolResult, McpError> {
        let category = parse_category(p.category.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        let data = PantryItemCreate {
            name: p.name,
            quantity: p.quantity,
            unit: p.unit,
            category,
            expires_on: p.expires_on,
            notes: p.notes,
        };
        let result = pantry::add_pantry_item(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a pantry item by ID")]
    fn get_pantry_item(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = pantry::get_pantry_item(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(item) => json_result(&item),
            None => not_found("Pantry item", p.id),
        }
    }

    #[tool(description = "List pantry items, optionally filtered by grocery category")]
    fn list_pantry_items(&self, Parameters(p): Parameters<ListPantryItemsParams>) -> Result<CallToolResult, McpError> {
        let result = pantry::list_pantry_items(&self.database, p.category.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Search pantry items by name")]
    fn search_pantry_items(&self, Parameters(p): Parameters<SearchPantryItemsParams>) -> Result<CallToolResult, McpError> {
        let result = pantry::search_pantry_items(&self.database, &p.query, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a pantry item")]
    fn update_pantry_item(&self, Parameters(p): Parameters<UpdatePantryItemParams>) -> Result<CallToolResult, McpError> {
        let category = parse_category(p.category.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        let data = PantryItemUpdate {
            name: p.name,
            quantity: p.quantity,
            unit: p.unit,
            category,
            expires_on: p.expires_on,
            notes: p.notes,
        };
        let result = pantry::update_pantry_item(&self.database, p.id, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(item) => json_result(&item),
            None => not_found("Pantry item", p.id),
        }
    }

    #[tool(description = "Restock (positive delta) or use up (negative delta) a pantry item; never drops below zero")]
    fn adjust_pantry_quantity(&self, Parameters(p): Parameters<AdjustPantryQuantityParams>) -> Result<CallToolResult, McpError> {
        let result = pantry::adjust_pantry_quantity(&self.database, p.id, p.delta)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(item) => json_result(&item),
            None => not_found("Pantry item", p.id),
        }
    }

    #[tool(description = "Delete a pantry item")]
    fn delete_pantry_item(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = pantry::delete_pantry_item(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List pantry items that have expired or expire within the given number of days (default 7)")]
    fn list_expiring_items(&self, Parameters(p): Parameters<ListExpiringItemsParams>) -> Result<CallToolResult, McpError> {
        let result = pantry::list_expiring_items(&self.database, p.days, pantry::today())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for LarderService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "larder".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Larder".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Larder - recipes, shopping list and kitchen inventory. \
                 IMPORTANT: Call kitchen_instructions at the start of a session. \
                 Ingredients: classify_ingredient, list_categories, convert_units, convert_to_system, scale_quantity. \
                 Recipes: create/get/list/update/delete_recipe, add/update/remove_recipe_ingredient. \
                 get_recipe takes servings and system (metric, imperial, original). \
                 Shopping: add/update/remove_shopping_item, list_shopping_list, set_shopping_item_checked, \
                 clear_checked_items, add_recipe_to_shopping_list. \
                 Pantry: add/get/update/delete_pantry_item, list/search_pantry_items, adjust_pantry_quantity, \
                 list_expiring_items. \
                 Status: larder_status."
                    .into(),
            ),
        }
    }
}
