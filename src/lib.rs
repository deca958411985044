// ============================================================================
// Fixed-Point Library
// Decimal arithmetic and monetary amounts on scaled 64-bit integers
// ============================================================================

//! # Fixed Point
//!
//! Exact decimal arithmetic for prices, quantities, rates and money,
//! stored as an `i64` mantissa with at most 18 digits and a scale of 0 to 18.
//!
//! ## Features
//!
//! - **Typed scales** via const generics (`Hundreds`, `MilliUnits`, ...) plus
//!   `VariableUnits` with a per-value scale
//! - **Explicit rounding** with eight rounding modes on every lossy operation
//! - **Wide multiply/divide** without intermediate overflow, on a native
//!   128-bit or a portable 64-bit backend with identical results
//! - **Rounding error distribution** keeping a total equal to its parts
//! - **Monetary amounts** with net + taxes breakdowns
//!
//! ## Example
//!
//! ```rust
//! use fixedpoint::prelude::*;
//!
//! let gross: Hundreds = "19.99".parse()?;
//! let tax_factor: MilliUnits = "1.190".parse()?;
//! let net = gross.divide(tax_factor, RoundingMode::HalfEven)?;
//! assert_eq!(net.to_string(), "16.80");
//!
//! let eur = Currency::iso("EUR")?;
//! let amount = MonetaryAmount::from_value(net, eur)?.net_to_gross(&[Hundreds::of(19)?])?;
//! assert_eq!(amount.to_string(), "19.99 EUR [16.80, 3.19]");
//! # Ok::<(), fixedpoint::numeric::NumericError>(())
//! ```

pub mod config;
#[cfg(feature = "logging")]
pub mod logging;
pub mod money;
pub mod numeric;
pub mod wide;

// Re-exports for convenience
pub mod prelude {
    pub use crate::config::{ArithmeticConfig, BackendPreference};
    pub use crate::money::{Currency, CurrencyDataProvider, Iso4217, MonetaryAmount};
    pub use crate::numeric::{
        FemtoUnits, FixedDecimal, FixedPoint, Hundreds, MicroUnits, MilliUnits, NanoUnits, NumericError,
        NumericResult, PicoUnits, RoundingMode, Tenths, Units, VariableUnits,
    };
}
