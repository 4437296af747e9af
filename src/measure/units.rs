//! Unit types and conversion constants
//!
//! Measurement units, their kinds, and the fixed factors to each kind's
//! canonical base unit (grams for weight, milliliters for volume).

use serde::{Deserialize, Serialize};

/// Kind of a convertible unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Mass units, based on grams
    Weight,
    /// Volume units, based on milliliters
    Volume,
}

impl UnitKind {
    /// Canonical base unit symbol for this kind
    pub fn base_unit(&self) -> &'static str {
        match self {
            UnitKind::Weight => "g",
            UnitKind::Volume => "ml",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Weight => "weight",
            UnitKind::Volume => "volume",
        }
    }
}

/// Measurement system a quantity is displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    #[default]
    Metric,
    Imperial,
}

impl MeasurementSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementSystem::Metric => "metric",
            MeasurementSystem::Imperial => "imperial",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Some(MeasurementSystem::Metric),
            "imperial" | "us" | "us customary" => Some(MeasurementSystem::Imperial),
            _ => None,
        }
    }
}

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

// US customary volumes are defined from the cup so each step of the
// ladder is an exact multiple of the one below it.

/// Milliliters per cup (US)
pub const ML_PER_CUP: f64 = 236.588;
/// Milliliters per teaspoon
pub const ML_PER_TSP: f64 = ML_PER_CUP / 48.0;
/// Milliliters per tablespoon
pub const ML_PER_TBSP: f64 = ML_PER_CUP / 16.0;
/// Milliliters per fluid ounce
pub const ML_PER_FL_OZ: f64 = ML_PER_CUP / 8.0;
/// Milliliters per pint (US)
pub const ML_PER_PINT: f64 = ML_PER_CUP * 2.0;
/// Milliliters per quart (US)
pub const ML_PER_QUART: f64 = ML_PER_CUP * 4.0;
/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;
/// Milliliters per gallon (US)
pub const ML_PER_GALLON: f64 = ML_PER_QUART * 4.0;

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;
/// Grams per ounce
pub const G_PER_OZ: f64 = G_PER_LB / 16.0;

// ============================================================================
// Unit Recognition
// ============================================================================

fn normalize(unit: &str) -> String {
    unit.trim().trim_end_matches('.').trim().to_lowercase()
}

/// Get the conversion factor to grams for a weight unit
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    match normalize(unit).as_str() {
        "g" | "gram" | "grams" | "gramme" | "grammes" => Some(1.0),
        "mg" | "milligram" | "milligrams" => Some(G_PER_MG),
        "kg" | "kilogram" | "kilograms" | "kilo" | "kilos" => Some(G_PER_KG),
        "oz" | "ounce" | "ounces" => Some(G_PER_OZ),
        "lb" | "lbs" | "pound" | "pounds" => Some(G_PER_LB),
        _ => None,
    }
}

/// Get the conversion factor to milliliters for a volume unit
pub fn ml_per_unit(unit: &str) -> Option<f64> {
    match normalize(unit).as_str() {
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Some(1.0),
        "l" | "liter" | "liters" | "litre" | "litres" => Some(ML_PER_LITER),
        "tsp" | "teaspoon" | "teaspoons" => Some(ML_PER_TSP),
        "tbsp" | "tablespoon" | "tablespoons" => Some(ML_PER_TBSP),
        "fl oz" | "floz" | "fl. oz" | "fluid ounce" | "fluid ounces" => Some(ML_PER_FL_OZ),
        "cup" | "cups" => Some(ML_PER_CUP),
        "pint" | "pints" | "pt" => Some(ML_PER_PINT),
        "quart" | "quarts" | "qt" => Some(ML_PER_QUART),
        "gallon" | "gallons" | "gal" => Some(ML_PER_GALLON),
        _ => None,
    }
}

/// Get the factor to the canonical base unit for a unit of the given kind
pub fn base_factor(unit: &str, kind: UnitKind) -> Option<f64> {
    match kind {
        UnitKind::Weight => grams_per_unit(unit),
        UnitKind::Volume => ml_per_unit(unit),
    }
}

/// Look up the kind of a unit; None means the unit is not convertible
pub fn unit_kind(unit: &str) -> Option<UnitKind> {
    if grams_per_unit(unit).is_some() {
        Some(UnitKind::Weight)
    } else if ml_per_unit(unit).is_some() {
        Some(UnitKind::Volume)
    } else {
        None
    }
}

/// Short display symbol for a recognized unit ("tablespoons" -> "tbsp")
pub fn canonical_symbol(unit: &str) -> Option<&'static str> {
    let symbol = match normalize(unit).as_str() {
        "g" | "gram" | "grams" | "gramme" | "grammes" => "g",
        "mg" | "milligram" | "milligrams" => "mg",
        "kg" | "kilogram" | "kilograms" | "kilo" | "kilos" => "kg",
        "oz" | "ounce" | "ounces" => "oz",
        "lb" | "lbs" | "pound" | "pounds" => "lb",
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => "ml",
        "l" | "liter" | "liters" | "litre" | "litres" => "L",
        "tsp" | "teaspoon" | "teaspoons" => "tsp",
        "tbsp" | "tablespoon" | "tablespoons" => "tbsp",
        "fl oz" | "floz" | "fl. oz" | "fluid ounce" | "fluid ounces" => "fl oz",
        "cup" | "cups" => "cup",
        "pint" | "pints" | "pt" => "pint",
        "quart" | "quarts" | "qt" => "quart",
        "gallon" | "gallons" | "gal" => "gallon",
        _ => return None,
    };
    Some(symbol)
}

/// Measurement system a recognized unit belongs to
pub fn unit_system(unit: &str) -> Option<MeasurementSystem> {
    match canonical_symbol(unit)? {
        "g" | "mg" | "kg" | "ml" | "L" => Some(MeasurementSystem::Metric),
        _ => Some(MeasurementSystem::Imperial),
    }
}

/// Whether a unit counts discrete items ("each", "whole", "clove")
pub fn is_count_unit(unit: &str) -> bool {
    matches!(
        normalize(unit).as_str(),
        "" | "each" | "whole" | "piece" | "pieces" | "item" | "items" | "count" | "unit"
            | "units" | "clove" | "cloves" | "slice" | "slices" | "can" | "cans"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_kind_lookup() {
        assert_eq!(unit_kind("kg"), Some(UnitKind::Weight));
        assert_eq!(unit_kind("cup"), Some(UnitKind::Volume));
        assert_eq!(unit_kind("banana"), None);
        assert_eq!(unit_kind("pinch"), None);
    }

    #[test]
    fn test_unit_kind_is_case_and_space_insensitive() {
        assert_eq!(unit_kind(" L "), Some(UnitKind::Volume));
        assert_eq!(unit_kind("Tbsp."), Some(UnitKind::Volume));
        assert_eq!(unit_kind("LBS"), Some(UnitKind::Weight));
    }

    #[test]
    fn test_grams_per_unit() {
        assert_eq!(grams_per_unit("g"), Some(1.0));
        assert_eq!(grams_per_unit("oz"), Some(G_PER_OZ));
        assert_eq!(grams_per_unit("lb"), Some(G_PER_LB));
        assert_eq!(grams_per_unit("tbsp"), None);
    }

    #[test]
    fn test_ml_per_unit() {
        assert_eq!(ml_per_unit("ml"), Some(1.0));
        assert_eq!(ml_per_unit("tbsp"), Some(ML_PER_TBSP));
        assert_eq!(ml_per_unit("cup"), Some(ML_PER_CUP));
        assert_eq!(ml_per_unit("g"), None);
    }

    #[test]
    fn test_every_unit_has_one_kind() {
        for unit in ["g", "mg", "kg", "oz", "lb", "ml", "l", "tsp", "tbsp", "fl oz", "cup",
            "pint", "quart", "gallon"]
        {
            let weight = grams_per_unit(unit).is_some();
            let volume = ml_per_unit(unit).is_some();
            assert!(weight ^ volume, "{} must be exactly one kind", unit);
        }
    }

    #[test]
    fn test_canonical_symbol() {
        assert_eq!(canonical_symbol("Tablespoons"), Some("tbsp"));
        assert_eq!(canonical_symbol("litres"), Some("L"));
        assert_eq!(canonical_symbol("fluid ounces"), Some("fl oz"));
        assert_eq!(canonical_symbol("dash"), None);
    }

    #[test]
    fn test_unit_system() {
        assert_eq!(unit_system("kg"), Some(MeasurementSystem::Metric));
        assert_eq!(unit_system("cups"), Some(MeasurementSystem::Imperial));
        assert_eq!(unit_system("to taste"), None);
    }

    #[test]
    fn test_count_units() {
        assert!(is_count_unit("each"));
        assert!(is_count_unit(""));
        assert!(is_count_unit("Cloves"));
        assert!(!is_count_unit("cup"));
    }

    #[test]
    fn test_measurement_system_from_str() {
        assert_eq!(MeasurementSystem::from_str("Metric"), Some(MeasurementSystem::Metric));
        assert_eq!(MeasurementSystem::from_str(" imperial"), Some(MeasurementSystem::Imperial));
        assert_eq!(MeasurementSystem::from_str("nautical"), None);
    }
}
