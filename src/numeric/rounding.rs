// ============================================================================
// Rounding Modes
// Rounding of integer quotients, shared by the scalar and the wide paths
// ============================================================================

use super::errors::{NumericError, NumericResult};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rounding strategy applied whenever a quotient has a nonzero remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingMode {
    /// Away from zero
    Up,
    /// Toward zero
    Down,
    /// Toward positive infinity
    Ceiling,
    /// Toward negative infinity
    Floor,
    /// To nearest, ties away from zero
    HalfUp,
    /// To nearest, ties toward zero
    HalfDown,
    /// To nearest, ties to the even neighbour (banker's rounding)
    #[default]
    HalfEven,
    /// Assert that no rounding is needed; fails with `RoundingRequired`
    Unnecessary,
}

impl RoundingMode {
    /// All modes, in declaration order.
    pub const ALL: [RoundingMode; 8] = [
        RoundingMode::Up,
        RoundingMode::Down,
        RoundingMode::Ceiling,
        RoundingMode::Floor,
        RoundingMode::HalfUp,
        RoundingMode::HalfDown,
        RoundingMode::HalfEven,
        RoundingMode::Unnecessary,
    ];

    /// Name used by `Display` and accepted by `FromStr`.
    pub const fn name(self) -> &'static str {
        match self {
            RoundingMode::Up => "UP",
            RoundingMode::Down => "DOWN",
            RoundingMode::Ceiling => "CEILING",
            RoundingMode::Floor => "FLOOR",
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
            RoundingMode::HalfEven => "HALF_EVEN",
            RoundingMode::Unnecessary => "UNNECESSARY",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoundingMode {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RoundingMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(wanted))
            .ok_or(NumericError::MalformedNumber("unknown rounding mode"))
    }
}

// ============================================================================
// Quotient Rounding
// ============================================================================

/// Round an unsigned quotient and re-apply the sign.
///
/// `quotient` and `remainder` are the truncated magnitudes of a division by
/// the strictly positive `divisor`; `negative` is the sign of the exact
/// result. Every division in the crate funnels through here, so both wide
/// backends and the scalar path agree bit for bit.
#[inline]
pub(crate) fn apply_rounding(
    negative: bool,
    quotient: u64,
    remainder: u64,
    divisor: u64,
    mode: RoundingMode,
) -> NumericResult<i64> {
    let bump = if remainder == 0 {
        false
    } else {
        // distance to the next multiple, never overflows since remainder < divisor
        let rest = divisor - remainder;
        match mode {
            RoundingMode::Up => true,
            RoundingMode::Down => false,
            RoundingMode::Ceiling => !negative,
            RoundingMode::Floor => negative,
            RoundingMode::HalfUp => remainder >= rest,
            RoundingMode::HalfDown => remainder > rest,
            RoundingMode::HalfEven => remainder > rest || (remainder == rest && quotient & 1 == 1),
            RoundingMode::Unnecessary => return Err(NumericError::RoundingRequired),
        }
    };

    let magnitude = if bump {
        quotient.checked_add(1).ok_or(NumericError::Overflow)?
    } else {
        quotient
    };

    if negative {
        0i64.checked_sub_unsigned(magnitude)
            .ok_or(NumericError::Overflow)
    } else {
        i64::try_from(magnitude).map_err(|_| NumericError::Overflow)
    }
}

/// Whether `apply_rounding` moved the magnitude away from zero.
///
/// Used by error distribution to learn the direction of each rounding.
#[inline]
pub(crate) fn rounds_away(
    negative: bool,
    quotient: u64,
    remainder: u64,
    divisor: u64,
    mode: RoundingMode,
) -> NumericResult<bool> {
    let rounded = apply_rounding(negative, quotient, remainder, divisor, mode)?;
    Ok(rounded.unsigned_abs() != quotient)
}

/// Divide `dividend / divisor` and round according to `mode`.
///
/// The divisor may have any sign; the sign is moved to the dividend first
/// so the rounding rules only reason about a positive divisor.
///
/// # Errors
/// - `DivisionByZero` if `divisor` is zero
/// - `RoundingRequired` if `mode` is `Unnecessary` and the remainder is nonzero
/// - `Overflow` for `i64::MIN / -1`
pub fn divide_longs(dividend: i64, divisor: i64, mode: RoundingMode) -> NumericResult<i64> {
    if divisor == 0 {
        return Err(NumericError::DivisionByZero);
    }
    let negative = (dividend < 0) != (divisor < 0);
    let a = dividend.unsigned_abs();
    let b = divisor.unsigned_abs();
    apply_rounding(negative, a / b, a % b, b, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAILS: i64 = i64::MAX;

    // dividend, then UP DOWN CEILING FLOOR HALF_UP HALF_DOWN HALF_EVEN UNNECESSARY
    const TABLE: [[i64; 9]; 10] = [
        [55, 6, 5, 6, 5, 6, 5, 6, FAILS],
        [25, 3, 2, 3, 2, 3, 2, 2, FAILS],
        [16, 2, 1, 2, 1, 2, 2, 2, FAILS],
        [11, 2, 1, 2, 1, 1, 1, 1, FAILS],
        [10, 1, 1, 1, 1, 1, 1, 1, 1],
        [-10, -1, -1, -1, -1, -1, -1, -1, -1],
        [-11, -2, -1, -1, -2, -1, -1, -1, FAILS],
        [-16, -2, -1, -1, -2, -2, -2, -2, FAILS],
        [-25, -3, -2, -2, -3, -3, -2, -2, FAILS],
        [-55, -6, -5, -5, -6, -6, -5, -6, FAILS],
    ];

    #[test]
    fn test_rounding_table() {
        for row in TABLE.iter() {
            for (column, mode) in RoundingMode::ALL.iter().enumerate() {
                let expected = row[column + 1];
                let result = divide_longs(row[0], 10, *mode);
                if expected == FAILS {
                    assert_eq!(
                        result,
                        Err(NumericError::RoundingRequired),
                        "{} / 10 with {}",
                        row[0],
                        mode
                    );
                } else {
                    assert_eq!(result, Ok(expected), "{} / 10 with {}", row[0], mode);
                }
            }
        }
    }

    #[test]
    fn test_negative_divisor_moves_sign() {
        assert_eq!(divide_longs(25, -10, RoundingMode::HalfEven), Ok(-2));
        assert_eq!(divide_longs(-25, -10, RoundingMode::HalfUp), Ok(3));
        assert_eq!(divide_longs(15, -10, RoundingMode::Floor), Ok(-2));
        assert_eq!(divide_longs(15, -10, RoundingMode::Ceiling), Ok(-1));
    }

    #[test]
    fn test_half_modes_with_odd_divisor() {
        // 1/3 is below the midpoint, 2/3 above
        assert_eq!(divide_longs(1, 3, RoundingMode::HalfUp), Ok(0));
        assert_eq!(divide_longs(2, 3, RoundingMode::HalfDown), Ok(1));
        assert_eq!(divide_longs(-2, 3, RoundingMode::HalfEven), Ok(-1));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            divide_longs(1, 0, RoundingMode::Down),
            Err(NumericError::DivisionByZero)
        );
    }

    #[test]
    fn test_extremes() {
        assert_eq!(
            divide_longs(i64::MIN, -1, RoundingMode::Down),
            Err(NumericError::Overflow)
        );
        assert_eq!(divide_longs(i64::MIN, 1, RoundingMode::Down), Ok(i64::MIN));
        assert_eq!(divide_longs(i64::MAX, 2, RoundingMode::HalfUp), Ok(i64::MAX / 2 + 1));
    }

    #[test]
    fn test_rounds_away() {
        assert_eq!(rounds_away(false, 2, 9, 10, RoundingMode::HalfEven), Ok(true));
        assert_eq!(rounds_away(true, 2, 1, 10, RoundingMode::HalfEven), Ok(false));
        assert_eq!(rounds_away(true, 2, 0, 10, RoundingMode::Up), Ok(false));
    }

    #[test]
    fn test_mode_names() {
        for mode in RoundingMode::ALL {
            assert_eq!(mode.to_string().parse::<RoundingMode>(), Ok(mode));
        }
        assert_eq!("half_even".parse::<RoundingMode>(), Ok(RoundingMode::HalfEven));
        assert!("sideways".parse::<RoundingMode>().is_err());
        assert_eq!(RoundingMode::default(), RoundingMode::HalfEven);
    }
}
