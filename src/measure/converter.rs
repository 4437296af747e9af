//! Unit conversion functions
//!
//! Same-kind conversions go through the canonical base unit, so the factor
//! table stays one entry per unit. System conversion also picks which unit
//! to display the result in.

use serde::Serialize;
use thiserror::Error;

use super::units::{
    base_factor, canonical_symbol, is_count_unit, unit_kind, MeasurementSystem, UnitKind, G_PER_KG, G_PER_LB,
    G_PER_OZ, ML_PER_CUP, ML_PER_FL_OZ, ML_PER_GALLON, ML_PER_LITER, ML_PER_QUART, ML_PER_TBSP,
    ML_PER_TSP,
};
use crate::grocery::is_liquid;

/// Conversion error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Unrecognized unit: '{0}'")]
    UnknownUnit(String),

    #[error("Cannot convert '{unit}' as {}: it is a {} unit", .expected.as_str(), .actual.as_str())]
    KindMismatch {
        unit: String,
        expected: UnitKind,
        actual: UnitKind,
    },
}

fn factor_for(unit: &str, kind: UnitKind) -> Result<f64, ConversionError> {
    if let Some(factor) = base_factor(unit, kind) {
        return Ok(factor);
    }
    match unit_kind(unit) {
        Some(actual) => Err(ConversionError::KindMismatch {
            unit: unit.to_string(),
            expected: kind,
            actual,
        }),
        None => Err(ConversionError::UnknownUnit(unit.to_string())),
    }
}

fn convert_within(value: f64, from: &str, to: &str, kind: UnitKind) -> Result<f64, ConversionError> {
    let from_factor = factor_for(from, kind)?;
    let to_factor = factor_for(to, kind)?;
    let base = value * from_factor;
    Ok(base / to_factor)
}

/// Convert a weight between two weight units
///
/// Volume units are rejected with `KindMismatch`, never silently converted.
pub fn convert_weight(value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    convert_within(value, from, to, UnitKind::Weight)
}

/// Convert a volume between two volume units
pub fn convert_volume(value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    convert_within(value, from, to, UnitKind::Volume)
}

/// Convert between any two units of the same kind
pub fn convert(value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    let kind = unit_kind(from).ok_or_else(|| ConversionError::UnknownUnit(from.to_string()))?;
    convert_within(value, from, to, kind)
}

/// Express an amount in another (optional) unit, if the two are comparable
///
/// Missing and count units ("each", "whole") are interchangeable; identical
/// unit strings always compare; otherwise both must share a kind.
pub fn convert_between(value: f64, from: Option<&str>, to: Option<&str>) -> Option<f64> {
    let from = from.unwrap_or("").trim();
    let to = to.unwrap_or("").trim();

    if is_count_unit(from) && is_count_unit(to) {
        return Some(value);
    }
    if from.eq_ignore_ascii_case(to) {
        return Some(value);
    }
    convert(value, from, to).ok()
}

// ============================================================================
// System conversion
// ============================================================================

/// One step of a display ladder
struct Rung {
    unit: &'static str,
    /// Base units per one of this unit
    factor: f64,
    /// Values at or above this (in this unit) move to the next rung
    step_up: f64,
}

/// Relative slack at a rung's threshold
const STEP_TOLERANCE: f64 = 1e-9;

const fn rung(unit: &'static str, factor: f64, step_up: f64) -> Rung {
    Rung { unit, factor, step_up }
}

static METRIC_WEIGHT: &[Rung] = &[rung("g", 1.0, 1000.0), rung("kg", G_PER_KG, f64::INFINITY)];

static METRIC_VOLUME: &[Rung] = &[
    rung("ml", 1.0, 1000.0),
    rung("L", ML_PER_LITER, f64::INFINITY),
];

static IMPERIAL_WEIGHT: &[Rung] = &[rung("oz", G_PER_OZ, 16.0), rung("lb", G_PER_LB, f64::INFINITY)];

static IMPERIAL_DRY_VOLUME: &[Rung] = &[
    rung("tsp", ML_PER_TSP, 3.0),
    rung("tbsp", ML_PER_TBSP, 4.0),
    rung("cup", ML_PER_CUP, f64::INFINITY),
];

static IMPERIAL_LIQUID_VOLUME: &[Rung] = &[
    rung("tsp", ML_PER_TSP, 3.0),
    rung("tbsp", ML_PER_TBSP, 2.0),
    rung("fl oz", ML_PER_FL_OZ, 8.0),
    rung("cup", ML_PER_CUP, 4.0),
    rung("quart", ML_PER_QUART, 4.0),
    rung("gallon", ML_PER_GALLON, f64::INFINITY),
];

fn ladder(system: MeasurementSystem, kind: UnitKind, liquid: bool) -> &'static [Rung] {
    match (system, kind) {
        (MeasurementSystem::Metric, UnitKind::Weight) => METRIC_WEIGHT,
        (MeasurementSystem::Metric, UnitKind::Volume) => METRIC_VOLUME,
        (MeasurementSystem::Imperial, UnitKind::Weight) => IMPERIAL_WEIGHT,
        (MeasurementSystem::Imperial, UnitKind::Volume) if liquid => IMPERIAL_LIQUID_VOLUME,
        (MeasurementSystem::Imperial, UnitKind::Volume) => IMPERIAL_DRY_VOLUME,
    }
}

/// First rung whose value stays under its step-up threshold; the last rung
/// takes everything else, including non-finite values.
fn pick_rung(base_value: f64, ladder: &'static [Rung]) -> (&'static str, f64) {
    for rung in ladder {
        let value = base_value / rung.factor;
        // Rounding in the factors must not keep a whole larger unit on this rung
        if value.abs() < rung.step_up * (1.0 - STEP_TOLERANCE) {
            return (rung.unit, value);
        }
    }
    let last = &ladder[ladder.len() - 1];
    (last.unit, base_value / last.factor)
}

/// A quantity expressed for display in a measurement system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemQuantity {
    pub quantity: f64,
    pub unit: String,
    /// False when the unit was not recognized and the input passed through
    pub converted: bool,
}

/// Convert a quantity into the given measurement system
///
/// The ingredient name decides whether imperial volumes use the liquid
/// ladder (fl oz, quarts) or the dry one (spoons and cups). Units with no
/// kind ("pinch", "each") come back unchanged.
pub fn convert_to_system(
    value: f64,
    unit: &str,
    system: MeasurementSystem,
    ingredient: &str,
) -> SystemQuantity {
    let kind = match unit_kind(unit) {
        Some(kind) => kind,
        None => {
            tracing::debug!(unit, "unit has no conversion; passing through");
            return SystemQuantity {
                quantity: value,
                unit: unit.to_string(),
                converted: false,
            };
        }
    };

    let base = match base_factor(unit, kind) {
        Some(factor) => value * factor,
        None => {
            return SystemQuantity {
                quantity: value,
                unit: unit.to_string(),
                converted: false,
            }
        }
    };

    let liquid = kind == UnitKind::Volume && is_liquid(ingredient);
    let (display_unit, quantity) = pick_rung(base, ladder(system, kind, liquid));

    SystemQuantity {
        quantity,
        unit: display_unit.to_string(),
        converted: true,
    }
}

/// Display symbol for a unit, or the unit as given when unrecognized
pub fn display_unit(unit: &str) -> String {
    canonical_symbol(unit)
        .map(str::to_string)
        .unwrap_or_else(|| unit.trim().to_string())
}
