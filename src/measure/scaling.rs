//! Recipe quantity scaling
//!
//! Scales ingredient quantities by a servings ratio and renders the
//! resulting ingredient line.

use serde::Serialize;

use super::converter::{convert_to_system, display_unit};
use super::format::{format_amount, format_quantity};
use super::units::MeasurementSystem;
use crate::grocery::{classify, GroceryCategory};

/// Ratio of desired servings to the recipe's base servings
///
/// A base that is zero, negative or not finite cannot be scaled from; the
/// recipe is shown unscaled (factor 1.0).
pub fn scale_factor(base_servings: f64, servings: f64) -> f64 {
    if !base_servings.is_finite() || base_servings <= 0.0 {
        tracing::warn!(base_servings, "invalid base servings; using unscaled quantities");
        return 1.0;
    }
    servings / base_servings
}

/// Multiply a base quantity by a scale factor
pub fn scaled_quantity(base_quantity: f64, factor: f64) -> f64 {
    base_quantity * factor
}

/// An ingredient line adjusted for servings and measurement system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledIngredient {
    pub name: String,
    pub category: GroceryCategory,
    pub quantity: f64,
    pub unit: Option<String>,
    pub formatted_quantity: String,
    /// "12 Tomatoes", "473.18 ml milk"
    pub display: String,
}

/// Scale one ingredient and render it for display
///
/// With `system` set, convertible units are re-expressed in that system;
/// units with no conversion keep the scaled value and original unit.
pub fn scale_ingredient(
    name: &str,
    base_quantity: f64,
    unit: Option<&str>,
    factor: f64,
    system: Option<MeasurementSystem>,
) -> ScaledIngredient {
    let scaled = scaled_quantity(base_quantity, factor);

    let (quantity, unit) = match (unit.map(str::trim).filter(|u| !u.is_empty()), system) {
        (Some(unit), Some(system)) => {
            let converted = convert_to_system(scaled, unit, system, name);
            if converted.converted {
                (converted.quantity, Some(converted.unit))
            } else {
                (scaled, Some(display_unit(unit)))
            }
        }
        (Some(unit), None) => (scaled, Some(display_unit(unit))),
        (None, _) => (scaled, None),
    };

    let name = name.trim();
    let display = format!("{} {}", format_amount(quantity, unit.as_deref()), name);

    ScaledIngredient {
        name: name.to_string(),
        category: classify(name),
        quantity,
        formatted_quantity: format_quantity(quantity),
        unit,
        display,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_factor() {
        assert_eq!(scale_factor(4.0, 8.0), 2.0);
        assert_eq!(scale_factor(4.0, 2.0), 0.5);
        assert_eq!(scale_factor(4.0, 0.0), 0.0);
    }

    #[test]
    fn test_scale_factor_invalid_base() {
        assert_eq!(scale_factor(0.0, 8.0), 1.0);
        assert_eq!(scale_factor(-2.0, 8.0), 1.0);
        assert_eq!(scale_factor(f64::NAN, 8.0), 1.0);
    }

    #[test]
    fn test_scaled_quantity() {
        for q in [0.0, 1.0, 2.5, 1000.0] {
            assert_eq!(scaled_quantity(q, 1.0), q);
            assert_eq!(scaled_quantity(q, 0.5), q / 2.0);
            assert_eq!(scaled_quantity(q, 2.0), q * 2.0);
        }
        assert_eq!(scaled_quantity(3.0, 0.0), 0.0);
        assert_eq!(scaled_quantity(2.0, 1.0e6), 2.0e6);
    }

    #[test]
    fn test_doubled_cup_formats_whole() {
        let line = scale_ingredient("flour", 1.0, Some("cup"), 2.0, None);
        assert_eq!(line.formatted_quantity, "2");
        assert_eq!(line.display, "2 cup flour");
    }

    #[test]
    fn test_tomatoes_end_to_end() {
        let factor = scale_factor(4.0, 8.0);
        let line = scale_ingredient("Tomatoes", 6.0, None, factor, None);
        assert_eq!(line.quantity, 12.0);
        assert_eq!(line.category, GroceryCategory::Produce);
        assert_eq!(line.formatted_quantity, "12");
        assert_eq!(line.display, "12 Tomatoes");
    }

    #[test]
    fn test_scale_and_convert() {
        let line = scale_ingredient("milk", 1.0, Some("cups"), 2.0, Some(MeasurementSystem::Metric));
        assert_eq!(line.unit.as_deref(), Some("ml"));
        assert_eq!(line.formatted_quantity, "473.18");
        assert_eq!(line.display, "473.18 ml milk");
        assert_eq!(line.category, GroceryCategory::DairyEggs);
    }

    #[test]
    fn test_unconvertible_unit_kept() {
        let line = scale_ingredient("salt", 1.0, Some("pinch"), 3.0, Some(MeasurementSystem::Imperial));
        assert_eq!(line.quantity, 3.0);
        assert_eq!(line.unit.as_deref(), Some("pinch"));
        assert_eq!(line.display, "3 pinch salt");
    }

    #[test]
    fn test_unit_symbol_normalized_without_system() {
        let line = scale_ingredient("olive oil", 2.0, Some("Tablespoons"), 0.5, None);
        assert_eq!(line.display, "1 tbsp olive oil");
    }
}
