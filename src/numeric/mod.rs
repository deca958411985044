// ============================================================================
// Numeric Module
// Fixed-point decimals stored as 18-digit scaled integers
// ============================================================================
//
// This module provides:
// - FixedDecimal<D>: decimal with a compile-time scale, one alias per scale
// - VariableUnits: decimal carrying its scale per value
// - FixedPoint: the operation set shared by both
// - RoundingMode and the rounding primitives
// - Rounding error distribution over a total and its parts
//
// Design principles:
// - No floating-point in the arithmetic path
// - All arithmetic returns Result (no panics)
// - Mantissas never exceed 18 decimal digits

mod distribution;
mod errors;
mod fixed_decimal;
mod fixed_point;
pub(crate) mod rounding;
mod scaled;
mod variable_units;

pub use distribution::{distribute_ratio, scale_with_error_distribution, Breakdown};
pub use errors::{NumericError, NumericResult};
pub use fixed_decimal::{
    FemtoUnits, FixedDecimal, Hundreds, MicroUnits, MilliUnits, NanoUnits, PicoUnits, Tenths, Units,
};
pub use fixed_point::FixedPoint;
pub use rounding::{divide_longs, RoundingMode};
pub use scaled::{
    compare_scaled, parse_mantissa, pow10, rescale_mantissa, MAX_MANTISSA, MAX_SCALE, POWERS_OF_TEN,
};
pub use variable_units::VariableUnits;

pub(crate) use distribution::discrepancy;
pub(crate) use fixed_point::sealed::RawMantissa;
pub(crate) use scaled::{check_mantissa, write_mantissa};
