// ============================================================================
// Wide Multiply/Divide Module
// Rounded a * b / c without intermediate precision loss
//
// Backends:
// - Accelerated: native u128 intermediate (64-bit x86_64 / aarch64)
// - Portable: 64-bit limb arithmetic, the reference for correctness
// ============================================================================

pub mod detector;
pub mod native;
pub mod portable;
pub mod traits;

pub use detector::{
    accelerated_backend, portable_backend, probe, select_backend, Architecture, CpuCapabilities,
};
pub use native::NativeMulDiv;
pub use portable::PortableMulDiv;
pub use traits::MulDivBackend;

use crate::config::ArithmeticConfig;
use crate::numeric::rounding::apply_rounding;
use crate::numeric::{pow10, NumericError, NumericResult, RoundingMode};
use std::sync::OnceLock;

static INSTALLED: OnceLock<&'static dyn MulDivBackend> = OnceLock::new();

/// Install the backend chosen by `config` for the rest of the process.
///
/// The first call wins; later calls (with any config) return the backend
/// that is already installed.
pub fn install(config: &ArithmeticConfig) -> &'static dyn MulDivBackend {
    let mut fresh = false;
    let backend = *INSTALLED.get_or_init(|| {
        fresh = true;
        select_backend(config)
    });
    if fresh {
        tracing::info!(
            backend = backend.name(),
            preference = %config.backend,
            probe = config.probe_on_install,
            "installed wide multiply/divide backend"
        );
    }
    backend
}

/// The installed backend, installing it from the environment on first use.
pub fn backend() -> &'static dyn MulDivBackend {
    if let Some(backend) = INSTALLED.get() {
        return *backend;
    }
    let config = ArithmeticConfig::from_env().unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring invalid arithmetic configuration");
        ArithmeticConfig::default()
    });
    install(&config)
}

/// Sign and unsigned parts of `a * b / divisor` before rounding.
pub(crate) struct WideQuotient {
    pub negative: bool,
    pub quotient: u64,
    pub remainder: u64,
    pub divisor: u64,
}

impl WideQuotient {
    /// Apply `mode` and restore the sign.
    #[inline]
    pub fn round(&self, mode: RoundingMode) -> NumericResult<i64> {
        apply_rounding(self.negative, self.quotient, self.remainder, self.divisor, mode)
    }

    /// Exact value as a float, for ranking rounding errors.
    pub fn as_f64(&self) -> f64 {
        let magnitude = self.quotient as f64 + self.remainder as f64 / self.divisor as f64;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

pub(crate) fn wide_quotient(
    backend: &dyn MulDivBackend,
    a: i64,
    b: i64,
    divisor: i64,
) -> NumericResult<WideQuotient> {
    if divisor == 0 {
        return Err(NumericError::DivisionByZero);
    }
    let d = divisor.unsigned_abs();
    let (quotient, remainder) = backend
        .mul_div_rem(a.unsigned_abs(), b.unsigned_abs(), d)
        .ok_or(NumericError::Overflow)?;
    Ok(WideQuotient {
        negative: ((a < 0) != (b < 0)) != (divisor < 0),
        quotient,
        remainder,
        divisor: d,
    })
}

/// `round(a * b / divisor)` on an explicit backend.
///
/// # Errors
/// - `DivisionByZero` if `divisor` is zero
/// - `Overflow` if the rounded quotient does not fit in `i64`
/// - `RoundingRequired` for `Unnecessary` with a nonzero remainder
#[inline]
pub fn mul_div_with(
    backend: &dyn MulDivBackend,
    a: i64,
    b: i64,
    divisor: i64,
    mode: RoundingMode,
) -> NumericResult<i64> {
    if divisor == 0 {
        return Err(NumericError::DivisionByZero);
    }
    if a == 0 || b == 0 {
        return Ok(0);
    }
    wide_quotient(backend, a, b, divisor)?.round(mode)
}

/// `round(a * b / divisor)` on the installed backend.
#[inline]
pub fn mul_div(a: i64, b: i64, divisor: i64, mode: RoundingMode) -> NumericResult<i64> {
    mul_div_with(backend(), a, b, divisor, mode)
}

/// `round(a * b / 10^exponent)`, exponent in [0, 18].
#[inline]
pub fn multiply_and_scale(a: i64, b: i64, exponent: i32, mode: RoundingMode) -> NumericResult<i64> {
    mul_div(a, b, pow10(exponent)?, mode)
}

/// `round(a * 10^exponent / divisor)`, exponent in [0, 18].
#[inline]
pub fn scale_and_divide(a: i64, exponent: i32, divisor: i64, mode: RoundingMode) -> NumericResult<i64> {
    mul_div(a, pow10(exponent)?, divisor, mode)
}
