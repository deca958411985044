// ============================================================================
// Accelerated Backend
// Native 128-bit intermediate product
// ============================================================================

use super::traits::MulDivBackend;

/// Wide multiply/divide on the compiler's native `u128`.
///
/// On 64-bit targets the product is a single widening multiply and the
/// division a single wide divide instruction sequence.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeMulDiv;

impl NativeMulDiv {
    /// Create a new native backend.
    pub const fn new() -> Self {
        Self
    }
}

impl MulDivBackend for NativeMulDiv {
    #[inline]
    fn mul_div_rem(&self, a: u64, b: u64, d: u64) -> Option<(u64, u64)> {
        let product = u128::from(a) * u128::from(b);
        let divisor = u128::from(d);
        let quotient = u64::try_from(product / divisor).ok()?;
        // remainder < d, always fits
        let remainder = (product % divisor) as u64;
        Some((quotient, remainder))
    }

    fn name(&self) -> &'static str {
        "Accelerated (u128)"
    }
}
