//! Measurement module
//!
//! Unit recognition, conversion, scaling and quantity formatting.

pub mod converter;
pub mod format;
pub mod scaling;
pub mod units;

pub use converter::{
    convert, convert_between, convert_to_system, convert_volume, convert_weight, display_unit, ConversionError,
    SystemQuantity,
};
pub use format::{format_amount, format_quantity};
pub use scaling::{scale_factor, scale_ingredient, scaled_quantity, ScaledIngredient};
pub use units::{
    canonical_symbol, grams_per_unit, is_count_unit, ml_per_unit, unit_kind, unit_system,
    MeasurementSystem, UnitKind,
};
