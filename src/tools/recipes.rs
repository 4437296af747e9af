//! Recipe MCP Tools
//!
//! Tools for managing recipes and their ingredients, and for rendering a
//! recipe at any number of servings.

use serde::Serialize;

use super::ingredients::parse_system;
use crate::db::Database;
use crate::measure::{scale_factor, scale_ingredient, MeasurementSystem, ScaledIngredient};
use crate::models::{
    Recipe, RecipeCreate, RecipeIngredient, RecipeIngredientCreate, RecipeIngredientUpdate,
    RecipeUpdate,
};

/// Response for create_recipe
#[derive(Debug, Serialize)]
pub struct CreateRecipeResponse {
    pub id: i64,
    pub name: String,
    pub base_servings: f64,
    pub created_at: String,
}

/// One rendered ingredient line
#[derive(Debug, Serialize)]
pub struct RecipeIngredientLine {
    pub id: i64,
    pub position: i64,
    /// Quantity as stored, for the recipe's base servings
    pub base_quantity: f64,
    pub base_unit: Option<String>,
    #[serde(flatten)]
    pub scaled: ScaledIngredient,
    pub notes: Option<String>,
}

/// Full recipe rendered for the requested servings
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub name: String,
    pub base_servings: f64,
    pub servings: f64,
    pub scale_factor: f64,
    /// None when quantities are shown in their original units
    pub system: Option<MeasurementSystem>,
    pub is_favorite: bool,
    pub ingredients: Vec<RecipeIngredientLine>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Recipe summary for listing
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub base_servings: f64,
    pub is_favorite: bool,
    pub ingredient_count: i64,
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for update_recipe
#[derive(Debug, Serialize)]
pub struct RecipeUpdateResponse {
    pub success: bool,
    pub updated_at: String,
}

/// Response for add_recipe_ingredient / update_recipe_ingredient
#[derive(Debug, Serialize)]
pub struct IngredientResponse {
    #[serde(flatten)]
    pub ingredient: RecipeIngredient,
    pub display: String,
}

impl From<RecipeIngredient> for IngredientResponse {
    fn from(ingredient: RecipeIngredient) -> Self {
        let display = scale_ingredient(
            &ingredient.name,
            ingredient.quantity,
            ingredient.unit.as_deref(),
            1.0,
            None,
        )
        .display;
        Self { ingredient, display }
    }
}

/// Resolve a requested system for rendering
///
/// `None` uses the configured default; "original" keeps stored units.
pub fn resolve_system(
    requested: Option<&str>,
    default: MeasurementSystem,
) -> Result<Option<MeasurementSystem>, String> {
    match requested.map(str::trim) {
        None | Some("") => Ok(Some(default)),
        Some(s) if s.eq_ignore_ascii_case("original") => Ok(None),
        Some(s) => parse_system(s).map(Some),
    }
}

fn validate_servings(base_servings: f64) -> Result<(), String> {
    if !(base_servings > 0.0) || !base_servings.is_finite() {
        return Err("base_servings must be greater than 0".to_string());
    }
    Ok(())
}

// ============================================================================
// Recipe Tools
// ============================================================================

/// Create a new recipe
pub fn create_recipe(db: &Database, data: RecipeCreate) -> Result<CreateRecipeResponse, String> {
    if data.name.trim().is_empty() {
        return Err("Recipe name cannot be empty".to_string());
    }
    validate_servings(data.base_servings)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::create(&conn, &data)
        .map_err(|e| format!("Failed to create recipe: {}", e))?;

    tracing::info!(id = recipe.id, name = %recipe.name, "created recipe");

    Ok(CreateRecipeResponse {
        id: recipe.id,
        name: recipe.name,
        base_servings: recipe.base_servings,
        created_at: recipe.created_at,
    })
}

/// Get a recipe scaled to `servings` and shown in `system`
///
/// `servings` defaults to the recipe's base servings. `system` of None keeps
/// every ingredient in the unit it was entered with.
pub fn get_recipe(
    db: &Database,
    id: i64,
    servings: Option<f64>,
    system: Option<MeasurementSystem>,
) -> Result<Option<RecipeDetail>, String> {
    if servings.map_or(false, |s| s < 0.0) {
        return Err("servings cannot be negative".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = match Recipe::get_by_id(&conn, id).map_err(|e| format!("Failed to get recipe: {}", e))? {
        Some(recipe) => recipe,
        None => return Ok(None),
    };

    let ingredients = RecipeIngredient::list_for_recipe(&conn, id)
        .map_err(|e| format!("Failed to get ingredients: {}", e))?;

    let servings = servings.unwrap_or(recipe.base_servings);
    let factor = scale_factor(recipe.base_servings, servings);

    let lines = ingredients
        .into_iter()
        .map(|ingredient| {
            let mut scaled = scale_ingredient(
                &ingredient.name,
                ingredient.quantity,
                ingredient.unit.as_deref(),
                factor,
                system,
            );
            // Report the stored category; recategorize_items keeps it in step with the classifier
            scaled.category = ingredient.category;
            RecipeIngredientLine {
                id: ingredient.id,
                position: ingredient.position,
                base_quantity: ingredient.quantity,
                base_unit: ingredient.unit,
                scaled,
                notes: ingredient.notes,
            }
        })
        .collect();

    Ok(Some(RecipeDetail {
        id: recipe.id,
        name: recipe.name,
        base_servings: recipe.base_servings,
        servings,
        scale_factor: factor,
        system,
        is_favorite: recipe.is_favorite,
        ingredients: lines,
        notes: recipe.notes,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    }))
}

/// List recipes with filtering
pub fn list_recipes(
    db: &Database,
    query: Option<&str>,
    favorites_only: bool,
    limit: i64,
    offset: i64,
) -> Result<ListRecipesResponse, String> {
    let limit = limit.min(200).max(1);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipes = Recipe::list(&conn, query, favorites_only, limit, offset)
        .map_err(|e| format!("Failed to list recipes: {}", e))?;

    let total = Recipe::count(&conn, query, favorites_only)
        .map_err(|e| format!("Failed to count recipes: {}", e))?;

    let mut summaries = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let ingredient_count = RecipeIngredient::count_for_recipe(&conn, recipe.id)
            .map_err(|e| format!("Failed to count ingredients: {}", e))?;

        summaries.push(RecipeSummary {
            id: recipe.id,
            name: recipe.name,
            base_servings: recipe.base_servings,
            is_favorite: recipe.is_favorite,
            ingredient_count,
        });
    }

    Ok(ListRecipesResponse {
        recipes: summaries,
        total,
        limit,
        offset,
    })
}

/// Update a recipe
pub fn update_recipe(db: &Database, id: i64, data: RecipeUpdate) -> Result<RecipeUpdateResponse, String> {
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err("Recipe name cannot be empty".to_string());
        }
    }
    if let Some(base_servings) = data.base_servings {
        validate_servings(base_servings)?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = Recipe::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update recipe: {}", e))?;

    match updated {
        Some(recipe) => Ok(RecipeUpdateResponse {
            success: true,
            updated_at: recipe.updated_at,
        }),
        None => Err(format!("Recipe not found with id: {}", id)),
    }
}

/// Delete a recipe and its ingredients
///
/// Shopping items generated from the recipe stay on the list.
pub fn delete_recipe(db: &Database, id: i64) -> Result<super::DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Recipe::delete(&conn, id)
        .map_err(|e| format!("Failed to delete recipe: {}", e))?;

    if !deleted {
        return Err(format!("Recipe not found with id: {}", id));
    }

    Ok(super::DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

// ============================================================================
// Recipe Ingredient Tools
// ============================================================================

/// Add an ingredient to a recipe
pub fn add_recipe_ingredient(db: &Database, data: RecipeIngredientCreate) -> Result<IngredientResponse, String> {
    if data.name.trim().is_empty() {
        return Err("Ingredient name cannot be empty".to_string());
    }
    if data.quantity < 0.0 {
        return Err("quantity cannot be negative".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_by_id(&conn, data.recipe_id)
        .map_err(|e| format!("Database error: {}", e))?;
    if recipe.is_none() {
        return Err(format!("Recipe not found with id: {}", data.recipe_id));
    }

    let ingredient = RecipeIngredient::create(&conn, &data)
        .map_err(|e| format!("Failed to add ingredient: {}", e))?;

    Ok(ingredient.into())
}

/// Update a recipe ingredient
pub fn update_recipe_ingredient(
    db: &Database,
    id: i64,
    data: RecipeIngredientUpdate,
) -> Result<Option<IngredientResponse>, String> {
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err("Ingredient name cannot be empty".to_string());
        }
    }
    if data.quantity.map_or(false, |q| q < 0.0) {
        return Err("quantity cannot be negative".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let ingredient = RecipeIngredient::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update ingredient: {}", e))?;

    Ok(ingredient.map(IngredientResponse::from))
}

/// Remove an ingredient from a recipe
pub fn remove_recipe_ingredient(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    RecipeIngredient::delete(&conn, id)
        .map_err(|e| format!("Failed to remove ingredient: {}", e))
}
