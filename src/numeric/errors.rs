// ============================================================================
// Numeric Errors
// Error types for fixed-point arithmetic and monetary operations
// ============================================================================

use thiserror::Error;

/// Errors that can occur during fixed-point arithmetic operations.
///
/// All variants describe programming or data errors. None of them are
/// retried internally; callers treat them as fatal for the record at hand.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Mantissa exceeded 18 digits, or a scale exponent exceeded 18
    #[error("arithmetic overflow: result exceeded 18 significant digits")]
    Overflow,

    /// Attempted division by zero
    #[error("division by zero")]
    DivisionByZero,

    /// `RoundingMode::Unnecessary` met a nonzero remainder, or a
    /// precision reduction was requested without a rounding mode
    #[error("rounding required but forbidden")]
    RoundingRequired,

    /// Operands differ in scale, currency, or number of components
    #[error("operands differ in scale, currency or breakdown")]
    ScaleMismatch,

    /// Input string could not be parsed
    #[error("malformed number: {0}")]
    MalformedNumber(&'static str),

    /// Components of a monetary amount do not add up to its gross value
    #[error("sum of components ({sum}) does not match gross ({gross})")]
    SumInvariantViolated { gross: i64, sum: i64 },

    /// Currency code or number of decimals is not acceptable
    #[error("invalid currency: {0}")]
    InvalidCurrency(&'static str),
}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;
