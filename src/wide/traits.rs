// ============================================================================
// Wide Multiply/Divide Backend Trait
// Abstract interface for double-width multiply followed by division
// ============================================================================

/// Computes `a * b / d` with a 128-bit-equivalent intermediate product.
///
/// Backends only deal in unsigned magnitudes. Sign handling and rounding are
/// done once, in `wide::mul_div_with`, so every backend produces the same
/// rounded result as long as its quotient and remainder are exact.
///
/// # Thread Safety
/// Implementations are installed process-wide and must be `Send + Sync`.
pub trait MulDivBackend: Send + Sync {
    /// Truncated quotient and remainder of `a * b / d`.
    ///
    /// `d` is nonzero. Returns `None` when the quotient does not fit in
    /// 64 bits.
    fn mul_div_rem(&self, a: u64, b: u64, d: u64) -> Option<(u64, u64)>;

    /// Get the name of this backend.
    ///
    /// Used for logging and benchmarking.
    fn name(&self) -> &'static str;
}
