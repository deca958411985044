// ============================================================================
// Portable Backend
// Double-width multiply and divide built from 64-bit operations only
// ============================================================================
//
// This is the reference definition of wide multiply/divide: the accelerated
// backend is only installed when it agrees with this one.

use super::traits::MulDivBackend;

const LOW_MASK: u64 = 0xFFFF_FFFF;

/// Operands below this bound multiply without leaving 64 bits.
const NARROW_LIMIT: u64 = 1 << 31;

/// Wide multiply/divide without any 128-bit integer support.
///
/// The product is formed from 32-bit limbs into a (high, low) pair of
/// 64-bit words, then divided by restoring binary long division.
#[derive(Debug, Default, Clone, Copy)]
pub struct PortableMulDiv;

impl PortableMulDiv {
    /// Create a new portable backend.
    pub const fn new() -> Self {
        Self
    }
}

/// Full 128-bit product of `a * b` as (high, low) words.
#[inline]
pub(crate) fn widening_mul(a: u64, b: u64) -> (u64, u64) {
    let (a_hi, a_lo) = (a >> 32, a & LOW_MASK);
    let (b_hi, b_lo) = (b >> 32, b & LOW_MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    // at most 3 * (2^32 - 1), no overflow
    let mid = (ll >> 32) + (lh & LOW_MASK) + (hl & LOW_MASK);
    let lo = (mid << 32) | (ll & LOW_MASK);
    let hi = hh + (lh >> 32) + (hl >> 32) + (mid >> 32);
    (hi, lo)
}

/// Divide the 128-bit value (hi, lo) by `d`, requiring `hi < d`.
#[inline]
pub(crate) fn div_rem_wide(hi: u64, lo: u64, d: u64) -> (u64, u64) {
    debug_assert!(hi < d);
    let mut rem = hi;
    let mut quot = lo;
    for _ in 0..64 {
        let carry = rem >> 63;
        rem = (rem << 1) | (quot >> 63);
        quot <<= 1;
        // 2 * rem + bit < 2d, so one subtraction restores rem < d
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            quot |= 1;
        }
    }
    (quot, rem)
}

impl MulDivBackend for PortableMulDiv {
    #[inline]
    fn mul_div_rem(&self, a: u64, b: u64, d: u64) -> Option<(u64, u64)> {
        if a < NARROW_LIMIT && b < NARROW_LIMIT {
            let product = a * b;
            return Some((product / d, product % d));
        }
        let (hi, lo) = widening_mul(a, b);
        if hi == 0 {
            return Some((lo / d, lo % d));
        }
        if hi >= d {
            return None;
        }
        Some(div_rem_wide(hi, lo, d))
    }

    fn name(&self) -> &'static str {
        "Portable (64-bit limbs)"
    }
}
