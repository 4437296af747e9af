//! Ingredient MCP Tools
//!
//! Stateless classification, conversion and scaling tools.

use serde::Serialize;

use crate::grocery::{matched_keyword, GroceryCategory};
use crate::measure::{
    self, convert_to_system as to_system, format_quantity, scale_factor, scale_ingredient,
    unit_kind, MeasurementSystem, ScaledIngredient, UnitKind,
};

/// Response for classify_ingredient
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub name: String,
    pub category: GroceryCategory,
    pub icon: &'static str,
    pub color: &'static str,
    /// Keyword that decided the category; None means the fallback was used
    pub matched_keyword: Option<&'static str>,
}

/// Category entry for list_categories
#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Response for convert_units
#[derive(Debug, Serialize)]
pub struct ConvertUnitsResponse {
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
    pub kind: UnitKind,
    pub result: f64,
    pub formatted: String,
}

/// Response for convert_to_system
#[derive(Debug, Serialize)]
pub struct ConvertToSystemResponse {
    pub input_quantity: f64,
    pub input_unit: String,
    pub system: MeasurementSystem,
    pub quantity: f64,
    pub unit: String,
    pub formatted: String,
    /// False when the unit has no conversion and was passed through
    pub converted: bool,
}

/// Response for scale_quantity
#[derive(Debug, Serialize)]
pub struct ScaleQuantityResponse {
    pub base_quantity: f64,
    pub base_servings: f64,
    pub servings: f64,
    pub scale_factor: f64,
    pub ingredient: ScaledIngredient,
}

/// Parse a measurement system name into a tool error message on failure
pub fn parse_system(system: &str) -> Result<MeasurementSystem, String> {
    MeasurementSystem::from_str(system)
        .ok_or_else(|| format!("Unknown measurement system '{}': use metric or imperial", system))
}

/// Classify an ingredient name
pub fn classify_ingredient(name: &str) -> ClassifyResponse {
    let (category, keyword) = match matched_keyword(name) {
        Some((category, keyword)) => (category, Some(keyword)),
        None => (GroceryCategory::Other, None),
    };

    ClassifyResponse {
        name: name.trim().to_string(),
        category,
        icon: category.icon(),
        color: category.color(),
        matched_keyword: keyword,
    }
}

/// All categories in display order
pub fn list_categories() -> Vec<CategoryInfo> {
    GroceryCategory::ALL
        .iter()
        .map(|c| CategoryInfo {
            name: c.as_str(),
            icon: c.icon(),
            color: c.color(),
        })
        .collect()
}

/// Convert a value between two units of the same kind
pub fn convert_units(value: f64, from_unit: &str, to_unit: &str) -> Result<ConvertUnitsResponse, String> {
    let kind = unit_kind(from_unit)
        .ok_or_else(|| format!("Unrecognized unit '{}': value cannot be converted", from_unit))?;

    let result = match kind {
        UnitKind::Weight => measure::convert_weight(value, from_unit, to_unit),
        UnitKind::Volume => measure::convert_volume(value, from_unit, to_unit),
    }
    .map_err(|e| e.to_string())?;

    Ok(ConvertUnitsResponse {
        value,
        from_unit: from_unit.trim().to_string(),
        to_unit: to_unit.trim().to_string(),
        kind,
        result,
        formatted: format_quantity(result),
    })
}

/// Convert a quantity into a measurement system, choosing a readable unit
pub fn convert_to_system(
    value: f64,
    unit: &str,
    system: &str,
    ingredient: Option<&str>,
) -> Result<ConvertToSystemResponse, String> {
    let system = parse_system(system)?;
    let result = to_system(value, unit, system, ingredient.unwrap_or(""));

    if !result.converted {
        tracing::warn!(unit, "no conversion for unit; returning value unchanged");
    }

    Ok(ConvertToSystemResponse {
        input_quantity: value,
        input_unit: unit.to_string(),
        system,
        formatted: format_quantity(result.quantity),
        quantity: result.quantity,
        unit: result.unit,
        converted: result.converted,
    })
}

/// Scale an ingredient quantity from base servings to the requested servings
pub fn scale_quantity(
    name: &str,
    quantity: f64,
    unit: Option<&str>,
    base_servings: f64,
    servings: f64,
    system: Option<&str>,
) -> Result<ScaleQuantityResponse, String> {
    if base_servings <= 0.0 {
        return Err("base_servings must be greater than 0".to_string());
    }
    if servings < 0.0 {
        return Err("servings cannot be negative".to_string());
    }
    let system = system.map(parse_system).transpose()?;

    let factor = scale_factor(base_servings, servings);
    let ingredient = scale_ingredient(name, quantity, unit, factor, system);

    Ok(ScaleQuantityResponse {
        base_quantity: quantity,
        base_servings,
        servings,
        scale_factor: factor,
        ingredient,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_ingredient() {
        let result = classify_ingredient("Chicken Broth");
        assert_eq!(result.category, GroceryCategory::MeatSeafood);
        assert_eq!(result.matched_keyword, Some("chicken"));
        assert_eq!(result.icon, "fish");

        let other = classify_ingredient("batteries");
        assert_eq!(other.category, GroceryCategory::Other);
        assert_eq!(other.matched_keyword, None);
    }

    #[test]
    fn test_list_categories() {
        let categories = list_categories();
        assert_eq!(categories.len(), 9);
        assert_eq!(categories[0].name, "Produce");
        assert_eq!(categories[8].name, "Other");
    }

    #[test]
    fn test_convert_units() {
        let result = convert_units(1.0, "kg", "g").unwrap();
        assert_eq!(result.kind, UnitKind::Weight);
        assert_eq!(result.formatted, "1000");

        let cups = convert_units(1.0, "cup", "ml").unwrap();
        assert_eq!(cups.formatted, "236.59");
    }

    #[test]
    fn test_convert_units_errors() {
        let err = convert_units(1.0, "kg", "cup").unwrap_err();
        assert!(err.contains("Cannot convert"), "{}", err);
        let err = convert_units(1.0, "pinch", "g").unwrap_err();
        assert!(err.contains("Unrecognized unit"), "{}", err);
    }

    #[test]
    fn test_convert_to_system_tool() {
        let result = convert_to_system(2.0, "cups", "metric", Some("milk")).unwrap();
        assert_eq!(result.unit, "ml");
        assert_eq!(result.formatted, "473.18");

        let passthrough = convert_to_system(1.0, "dash", "imperial", None).unwrap();
        assert!(!passthrough.converted);
        assert_eq!(passthrough.unit, "dash");

        assert!(convert_to_system(1.0, "g", "martian", None).is_err());
    }

    #[test]
    fn test_scale_quantity() {
        let result = scale_quantity("Tomatoes", 6.0, None, 4.0, 8.0, None).unwrap();
        assert_eq!(result.scale_factor, 2.0);
        assert_eq!(result.ingredient.quantity, 12.0);
        assert_eq!(result.ingredient.formatted_quantity, "12");
        assert_eq!(result.ingredient.category, GroceryCategory::Produce);

        assert!(scale_quantity("Tomatoes", 6.0, None, 0.0, 8.0, None).is_err());
        assert!(scale_quantity("Tomatoes", 6.0, None, 4.0, -1.0, None).is_err());
    }
}
