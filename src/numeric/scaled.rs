// ============================================================================
// Scaled Integer Core
// Mantissa/scale primitives shared by every fixed-point type
// ============================================================================
//
// A value is `mantissa / 10^scale` with `scale` in [0, 18] and
// `|mantissa| <= 10^18 - 1`. Everything here works on raw (mantissa, scale)
// pairs so the typed layer stays a thin specialization.

use super::errors::{NumericError, NumericResult};
use super::rounding::{divide_longs, RoundingMode};
use std::cmp::Ordering;
use std::fmt;

/// Largest supported scale (number of fractional digits).
pub const MAX_SCALE: u8 = 18;

/// Largest mantissa magnitude: 18 significant digits.
pub const MAX_MANTISSA: i64 = 999_999_999_999_999_999;

/// Powers of ten, index i holds 10^i.
pub const POWERS_OF_TEN: [i64; 19] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
];

/// Compute 10^n at compile time
pub(crate) const fn pow10_const(n: u8) -> i64 {
    let mut result: i64 = 1;
    let mut i = 0;
    while i < n {
        result *= 10;
        i += 1;
    }
    result
}

/// 10^exponent, rejecting exponents outside [0, 18] as overflow.
#[inline]
pub fn pow10(exponent: i32) -> NumericResult<i64> {
    usize::try_from(exponent)
        .ok()
        .and_then(|i| POWERS_OF_TEN.get(i).copied())
        .ok_or(NumericError::Overflow)
}

/// Reject scales above 18.
#[inline]
pub fn check_scale(scale: u8) -> NumericResult<u8> {
    if scale > MAX_SCALE {
        Err(NumericError::Overflow)
    } else {
        Ok(scale)
    }
}

/// Reject mantissas with more than 18 significant digits.
#[inline]
pub fn check_mantissa(mantissa: i64) -> NumericResult<i64> {
    if (-MAX_MANTISSA..=MAX_MANTISSA).contains(&mantissa) {
        Ok(mantissa)
    } else {
        Err(NumericError::Overflow)
    }
}

/// Numeric comparison of two scaled values.
///
/// Signs are compared first. For equal signs and different scales the
/// larger-scale mantissa is scaled down and compared; only when that
/// truncated difference is zero is the smaller-scale mantissa scaled up,
/// which then cannot overflow. No wider integer type is involved.
pub fn compare_scaled(m1: i64, s1: u8, m2: i64, s2: u8) -> Ordering {
    let sign1 = m1.signum();
    let sign2 = m2.signum();
    if sign1 != sign2 {
        return sign1.cmp(&sign2);
    }
    if sign1 == 0 {
        return Ordering::Equal;
    }
    match s1.cmp(&s2) {
        Ordering::Equal => m1.cmp(&m2),
        Ordering::Less => {
            let factor = POWERS_OF_TEN[usize::from(s2 - s1)];
            let diff = m1 - m2 / factor;
            if diff != 0 {
                return diff.cmp(&0);
            }
            (m1 * factor - m2).cmp(&0)
        }
        Ordering::Greater => {
            let factor = POWERS_OF_TEN[usize::from(s1 - s2)];
            let diff = m1 / factor - m2;
            if diff != 0 {
                return diff.cmp(&0);
            }
            (m1 - m2 * factor).cmp(&0)
        }
    }
}

/// Re-express `mantissa` (at `from` scale) at the `to` scale.
///
/// Widening is exact; narrowing divides the excess digits out with `mode`.
pub fn rescale_mantissa(mantissa: i64, from: u8, to: u8, mode: RoundingMode) -> NumericResult<i64> {
    if mantissa == 0 || from == to {
        return Ok(mantissa);
    }
    let shift = i32::from(to) - i32::from(from);
    if shift > 0 {
        let widened = mantissa
            .checked_mul(pow10(shift)?)
            .ok_or(NumericError::Overflow)?;
        check_mantissa(widened)
    } else {
        divide_longs(mantissa, pow10(-shift)?, mode)
    }
}

/// Number of fractional digits in a textual number (0 without a point).
pub fn fractional_digits(src: &str) -> usize {
    let src = src.trim();
    src.find('.').map_or(0, |pos| src.len() - pos - 1)
}

/// Parse a decimal string into a mantissa at `target_scale`.
///
/// Accepted: optional leading sign, digits, optional `.` and fraction
/// (`-.5`, `1.` and `-0.` are fine). Extra fractional digits beyond the
/// target scale must all be zero; nothing is rounded.
pub fn parse_mantissa(src: &str, target_scale: u8) -> NumericResult<i64> {
    check_scale(target_scale)?;
    let src = src.trim();
    if src.is_empty() {
        return Err(NumericError::MalformedNumber("empty input"));
    }

    let (negative, body) = match src.as_bytes()[0] {
        b'-' => (true, &src[1..]),
        b'+' => (false, &src[1..]),
        _ => (false, src),
    };

    let (int_str, frac_str) = match body.find('.') {
        Some(pos) => (&body[..pos], &body[pos + 1..]),
        None => (body, ""),
    };
    if int_str.is_empty() && frac_str.is_empty() {
        return Err(NumericError::MalformedNumber("no digits"));
    }
    if frac_str.starts_with(['-', '+']) {
        return Err(NumericError::MalformedNumber("sign inside fractional digits"));
    }
    if !int_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumericError::MalformedNumber("invalid integral digits"));
    }
    if !frac_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumericError::MalformedNumber("invalid fractional digits"));
    }

    let scale = usize::from(target_scale);
    let (kept, excess) = frac_str.split_at(frac_str.len().min(scale));
    if excess.bytes().any(|b| b != b'0') {
        return Err(NumericError::MalformedNumber("too many significant fractional digits"));
    }

    let mut integral: i64 = 0;
    for digit in int_str.bytes() {
        integral = integral
            .checked_mul(10)
            .and_then(|v| v.checked_add(i64::from(digit - b'0')))
            .ok_or(NumericError::Overflow)?;
    }
    let mut fraction: i64 = 0;
    for digit in kept.bytes() {
        fraction = fraction * 10 + i64::from(digit - b'0');
    }
    fraction *= POWERS_OF_TEN[scale - kept.len()];

    let magnitude = integral
        .checked_mul(POWERS_OF_TEN[scale])
        .and_then(|v| v.checked_add(fraction))
        .ok_or(NumericError::Overflow)?;
    let magnitude = check_mantissa(magnitude)?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Write `mantissa` at `scale` in canonical form.
///
/// With `full_scale` every fractional digit is printed; otherwise an
/// integral value is printed without fraction.
pub fn write_mantissa(
    f: &mut impl fmt::Write,
    mantissa: i64,
    scale: u8,
    full_scale: bool,
) -> fmt::Result {
    if scale == 0 {
        return write!(f, "{}", mantissa);
    }
    let unit = POWERS_OF_TEN[usize::from(scale)];
    let int_part = mantissa / unit;
    let frac_part = (mantissa % unit).unsigned_abs();

    if frac_part == 0 && !full_scale {
        write!(f, "{}", int_part)
    } else if mantissa < 0 && int_part == 0 {
        // -0.xxx case
        write!(f, "-0.{:0>width$}", frac_part, width = usize::from(scale))
    } else {
        write!(f, "{}.{:0>width$}", int_part, frac_part, width = usize::from(scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_powers_of_ten() {
        for (i, p) in POWERS_OF_TEN.iter().enumerate() {
            assert_eq!(*p, pow10_const(i as u8));
            assert_eq!(pow10(i as i32), Ok(*p));
        }
        assert_eq!(pow10(19), Err(NumericError::Overflow));
        assert_eq!(pow10(-1), Err(NumericError::Overflow));
    }

    #[test]
    fn test_check_mantissa() {
        assert!(check_mantissa(MAX_MANTISSA).is_ok());
        assert!(check_mantissa(-MAX_MANTISSA).is_ok());
        assert_eq!(check_mantissa(MAX_MANTISSA + 1), Err(NumericError::Overflow));
        assert_eq!(check_mantissa(i64::MIN), Err(NumericError::Overflow));
    }

    #[test]
    fn test_compare_across_scales() {
        // 1.00 vs 1.000
        assert_eq!(compare_scaled(100, 2, 1000, 3), Ordering::Equal);
        // -0.001 vs 0
        assert_eq!(compare_scaled(-1, 3, 0, 0), Ordering::Less);
        assert_eq!(compare_scaled(0, 0, -1, 3), Ordering::Greater);
        // 1.005 vs 1.00 shares the truncated prefix
        assert_eq!(compare_scaled(1005, 3, 100, 2), Ordering::Greater);
        assert_eq!(compare_scaled(-1005, 3, -100, 2), Ordering::Less);
    }

    #[test]
    fn test_compare_near_bounds() {
        assert_eq!(compare_scaled(MAX_MANTISSA, 0, MAX_MANTISSA, 18), Ordering::Greater);
        assert_eq!(compare_scaled(-MAX_MANTISSA, 0, -MAX_MANTISSA, 18), Ordering::Less);
        assert_eq!(compare_scaled(MAX_MANTISSA, 18, 1, 0), Ordering::Less);
        assert_eq!(compare_scaled(i64::MIN, 3, i64::MAX, 0), Ordering::Less);
        assert_eq!(
            compare_scaled(1_000_000_000_000_000_000, 18, 1, 0),
            Ordering::Equal
        );
    }

    #[test]
    fn test_rescale() {
        assert_eq!(rescale_mantissa(314, 2, 5, RoundingMode::Unnecessary), Ok(314_000));
        assert_eq!(rescale_mantissa(31_415, 4, 2, RoundingMode::HalfEven), Ok(314));
        assert_eq!(
            rescale_mantissa(31_415, 4, 2, RoundingMode::Unnecessary),
            Err(NumericError::RoundingRequired)
        );
        assert_eq!(
            rescale_mantissa(MAX_MANTISSA, 0, 1, RoundingMode::Unnecessary),
            Err(NumericError::Overflow)
        );
    }

    #[test]
    fn test_parse_mantissa() {
        assert_eq!(parse_mantissa("-1.000", 3), Ok(-1000));
        assert_eq!(parse_mantissa("3.14", 3), Ok(3140));
        assert_eq!(parse_mantissa("-0.14", 3), Ok(-140));
        assert_eq!(parse_mantissa("-0.", 3), Ok(0));
        assert_eq!(parse_mantissa("-1.", 3), Ok(-1000));
        assert_eq!(parse_mantissa("-.1", 3), Ok(-100));
        assert_eq!(parse_mantissa("+7", 0), Ok(7));
        assert_eq!(parse_mantissa("-3.14000000000000000", 3), Ok(-3140));
    }

    #[test]
    fn test_parse_mantissa_rejects() {
        for bad in ["", "-", ".", "-.", "-3.14159", "-3.+14", "-3.-14", "--1", "1-", "1.2.3", "abc", "1e5", "1 000"] {
            assert!(
                matches!(parse_mantissa(bad, 3), Err(NumericError::MalformedNumber(_))),
                "{:?} should not parse",
                bad
            );
        }
        assert_eq!(parse_mantissa("99999999999999999999", 0), Err(NumericError::Overflow));
        assert_eq!(parse_mantissa("1000000000000000000", 0), Err(NumericError::Overflow));
        assert_eq!(parse_mantissa("1", 19), Err(NumericError::Overflow));
    }

    #[test]
    fn test_write_mantissa() {
        let render = |m, s, full| {
            let mut out = String::new();
            write_mantissa(&mut out, m, s, full).unwrap();
            out
        };
        assert_eq!(render(314, 2, false), "3.14");
        assert_eq!(render(1980, 2, false), "19.80");
        assert_eq!(render(200, 2, false), "2");
        assert_eq!(render(200, 2, true), "2.00");
        assert_eq!(render(-17, 2, false), "-0.17");
        assert_eq!(render(1, 3, false), "0.001");
        assert_eq!(render(-42, 0, false), "-42");
    }

    #[test]
    fn test_fractional_digits() {
        assert_eq!(fractional_digits("19.80"), 2);
        assert_eq!(fractional_digits("-19"), 0);
        assert_eq!(fractional_digits("1."), 0);
    }
}
