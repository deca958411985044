// ============================================================================
// Fixed-Point Trait
// Operations shared by every scaled-integer type
// ============================================================================

use super::distribution::{scale_with_error_distribution, Breakdown};
use super::errors::{NumericError, NumericResult};
use super::rounding::{divide_longs, RoundingMode};
use super::scaled::{check_mantissa, compare_scaled, pow10, rescale_mantissa, POWERS_OF_TEN};
use super::variable_units::VariableUnits;
use crate::wide;
use std::cmp::Ordering;
use std::fmt;

pub(crate) mod sealed {
    /// Unchecked construction, implemented only by the types of this crate.
    pub trait RawMantissa: Copy {
        /// A value of the same type and scale with another mantissa.
        ///
        /// The caller guarantees `|mantissa| <= 999_999_999_999_999_999`.
        fn with_raw_mantissa(self, mantissa: i64) -> Self;
    }
}

use sealed::RawMantissa;

/// A decimal value stored as `mantissa / 10^scale`.
///
/// Implementors provide storage and the scale; everything else is derived
/// here and returns `Self`, so a `MilliUnits` computation stays a
/// `MilliUnits` and heterogeneous arithmetic needs an explicit conversion.
///
/// Every constructed value keeps `|mantissa| <= 999_999_999_999_999_999`
/// and `scale <= 18`. Operations that would leave that range fail with
/// `NumericError::Overflow`. The trait is sealed: only `FixedDecimal` and
/// `VariableUnits` implement it.
pub trait FixedPoint: RawMantissa + fmt::Debug + fmt::Display {
    /// The raw scaled integer.
    fn mantissa(self) -> i64;

    /// Number of fractional digits.
    fn scale(self) -> u8;

    /// True if every value of the type has the same scale.
    fn is_fixed_scale(self) -> bool;

    // ========================================================================
    // Construction
    // ========================================================================

    /// A value of the same type and scale with another mantissa.
    #[inline]
    fn with_mantissa(self, mantissa: i64) -> NumericResult<Self> {
        check_mantissa(mantissa).map(|m| self.with_raw_mantissa(m))
    }

    /// Zero at this scale.
    #[inline]
    fn zero_like(self) -> Self {
        self.with_raw_mantissa(0)
    }

    /// One at this scale.
    #[inline]
    fn one_like(self) -> Self {
        self.with_raw_mantissa(self.unit_mantissa())
    }

    /// One unit in the last place.
    #[inline]
    fn ulp(self) -> Self {
        self.with_raw_mantissa(1)
    }

    /// The mantissa representing 1 at this scale.
    #[inline]
    fn unit_mantissa(self) -> i64 {
        POWERS_OF_TEN[usize::from(self.scale())]
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    fn is_zero(self) -> bool {
        self.mantissa() == 0
    }

    #[inline]
    fn is_one(self) -> bool {
        self.mantissa() == self.unit_mantissa()
    }

    #[inline]
    fn is_minus_one(self) -> bool {
        self.mantissa() == -self.unit_mantissa()
    }

    /// -1, 0 or 1.
    #[inline]
    fn signum(self) -> i32 {
        self.mantissa().signum() as i32
    }

    #[inline]
    fn is_negative(self) -> bool {
        self.mantissa() < 0
    }

    /// True if the value has no fractional digits other than zeros.
    #[inline]
    fn is_integral(self) -> bool {
        self.mantissa() % self.unit_mantissa() == 0
    }

    /// True if the mantissa has at most `digits` decimal digits.
    fn is_within_digits(self, digits: u8) -> bool {
        match POWERS_OF_TEN.get(usize::from(digits)) {
            Some(limit) => self.mantissa().unsigned_abs() < limit.unsigned_abs(),
            None => true,
        }
    }

    #[inline]
    fn is_within_18_digits(self) -> bool {
        self.is_within_digits(18)
    }

    /// True if the value can be written with at most `digits` fractional
    /// digits without loss.
    fn has_max_scale(self, digits: u8) -> bool {
        if digits >= self.scale() {
            return true;
        }
        self.mantissa() % POWERS_OF_TEN[usize::from(self.scale() - digits)] == 0
    }

    /// Integral part, truncated toward zero.
    #[inline]
    fn integer_part(self) -> i64 {
        self.mantissa() / self.unit_mantissa()
    }

    /// Absolute value of the fractional digits, as a mantissa.
    #[inline]
    fn fractional_part(self) -> u64 {
        (self.mantissa() % self.unit_mantissa()).unsigned_abs()
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Numeric ordering, across types and scales.
    #[inline]
    fn compare<T: FixedPoint>(self, other: T) -> Ordering {
        compare_scaled(self.mantissa(), self.scale(), other.mantissa(), other.scale())
    }

    /// Numeric equality, so `1.00` equals `1.000`.
    #[inline]
    fn numeric_eq<T: FixedPoint>(self, other: T) -> bool {
        self.compare(other) == Ordering::Equal
    }

    /// The smaller of both, `self` on ties.
    #[inline]
    fn min(self, other: Self) -> Self {
        if self.compare(other) == Ordering::Greater {
            other
        } else {
            self
        }
    }

    /// The bigger of both, `self` on ties.
    #[inline]
    fn max(self, other: Self) -> Self {
        if self.compare(other) == Ordering::Less {
            other
        } else {
            self
        }
    }

    /// The numerically smaller of two values of any types, `self` on ties.
    fn min_any<T: FixedPoint>(self, other: T) -> NumericResult<VariableUnits> {
        if self.compare(other) == Ordering::Greater {
            VariableUnits::from_fixed(other)
        } else {
            VariableUnits::from_fixed(self)
        }
    }

    /// The numerically bigger of two values of any types, `self` on ties.
    fn max_any<T: FixedPoint>(self, other: T) -> NumericResult<VariableUnits> {
        if self.compare(other) == Ordering::Less {
            VariableUnits::from_fixed(other)
        } else {
            VariableUnits::from_fixed(self)
        }
    }

    // ========================================================================
    // Sign
    // ========================================================================

    #[inline]
    fn negate(self) -> Self {
        self.with_raw_mantissa(-self.mantissa())
    }

    #[inline]
    fn abs(self) -> Self {
        if self.mantissa() < 0 {
            self.negate()
        } else {
            self
        }
    }

    // ========================================================================
    // Additive Arithmetic
    // ========================================================================

    /// Sum at the larger of both scales.
    ///
    /// A zero operand returns the other operand unchanged, so its scale is
    /// kept even when it is the smaller one.
    fn add(self, other: Self) -> NumericResult<Self> {
        if other.is_zero() {
            return Ok(self);
        }
        if self.is_zero() {
            return Ok(other);
        }
        let (wide, narrow) = if self.scale() >= other.scale() {
            (self, other)
        } else {
            (other, self)
        };
        let shifted = rescale_mantissa(narrow.mantissa(), narrow.scale(), wide.scale(), RoundingMode::Unnecessary)?;
        let sum = wide.mantissa().checked_add(shifted).ok_or(NumericError::Overflow)?;
        wide.with_mantissa(sum)
    }

    /// Difference, scaled like `add`.
    fn subtract(self, other: Self) -> NumericResult<Self> {
        self.add(other.negate())
    }

    /// Checked sum of all `values`, or `None` when there are none.
    ///
    /// The result's scale follows `add`: for `VariableUnits` the largest
    /// scale among the nonzero values.
    fn sum_all<I: IntoIterator<Item = Self>>(values: I) -> NumericResult<Option<Self>> {
        values.into_iter().try_fold(None, |acc: Option<Self>, v| match acc {
            None => Ok(Some(v)),
            Some(sum) => sum.add(v).map(Some),
        })
    }

    /// Heterogeneous sum as `VariableUnits`.
    ///
    /// Both operands are widened to the larger scale, except that a zero
    /// operand returns the other one at its own scale.
    fn add_any<T: FixedPoint>(self, other: T) -> NumericResult<VariableUnits> {
        VariableUnits::from_fixed(self)?.add(VariableUnits::from_fixed(other)?)
    }

    /// Heterogeneous difference, scaled like `add_any`.
    fn subtract_any<T: FixedPoint>(self, other: T) -> NumericResult<VariableUnits> {
        VariableUnits::from_fixed(self)?.subtract(VariableUnits::from_fixed(other)?)
    }

    /// `self + 1`.
    fn increment(self) -> NumericResult<Self> {
        self.with_mantissa(self.mantissa() + self.unit_mantissa())
    }

    /// `self - 1`.
    fn decrement(self) -> NumericResult<Self> {
        self.with_mantissa(self.mantissa() - self.unit_mantissa())
    }

    // ========================================================================
    // Integer Scaling
    // ========================================================================

    /// Exact product with an integer.
    fn multiply_int(self, factor: i64) -> NumericResult<Self> {
        match factor {
            1 => Ok(self),
            -1 => Ok(self.negate()),
            _ => {
                let product = self.mantissa().checked_mul(factor).ok_or(NumericError::Overflow)?;
                self.with_mantissa(product)
            }
        }
    }

    /// Quotient by an integer, truncated toward zero.
    fn divide_int(self, divisor: i64) -> NumericResult<Self> {
        match divisor {
            0 => Err(NumericError::DivisionByZero),
            1 => Ok(self),
            -1 => Ok(self.negate()),
            _ => Ok(self.with_raw_mantissa(self.mantissa() / divisor)),
        }
    }

    /// Remainder of the truncating division by an integer, in mantissa units.
    fn remainder_int(self, divisor: i64) -> NumericResult<Self> {
        match divisor {
            0 => Err(NumericError::DivisionByZero),
            1 | -1 => Ok(self.zero_like()),
            _ => Ok(self.with_raw_mantissa(self.mantissa() % divisor)),
        }
    }

    // ========================================================================
    // Multiplicative Arithmetic
    // ========================================================================

    /// Product with any fixed-point value, rounded to this scale.
    fn multiply<T: FixedPoint>(self, other: T, mode: RoundingMode) -> NumericResult<Self> {
        if self.is_zero() || other.is_zero() {
            return Ok(self.zero_like());
        }
        if other.is_one() {
            return Ok(self);
        }
        if other.is_minus_one() {
            return Ok(self.negate());
        }
        let product = wide::multiply_and_scale(
            self.mantissa(),
            other.mantissa(),
            i32::from(other.scale()),
            mode,
        )?;
        self.with_mantissa(product)
    }

    /// Quotient by any fixed-point value, rounded to this scale.
    fn divide<T: FixedPoint>(self, other: T, mode: RoundingMode) -> NumericResult<Self> {
        if other.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(self);
        }
        if other.is_one() {
            return Ok(self);
        }
        if other.is_minus_one() {
            return Ok(self.negate());
        }
        let quotient = wide::scale_and_divide(
            self.mantissa(),
            i32::from(other.scale()),
            other.mantissa(),
            mode,
        )?;
        self.with_mantissa(quotient)
    }

    /// Product rounded to `digits` fractional digits, kept in this type.
    ///
    /// `digits` beyond this scale are clamped to it.
    fn multiply_and_round<T: FixedPoint>(
        self,
        other: T,
        digits: u8,
        mode: RoundingMode,
    ) -> NumericResult<Self> {
        if self.is_zero() || other.is_zero() {
            return Ok(self.zero_like());
        }
        let digits = digits.min(self.scale());
        let shift = i32::from(self.scale()) + i32::from(other.scale()) - i32::from(digits);
        let product = wide::multiply_and_scale(self.mantissa(), other.mantissa(), shift, mode)?;
        let widened = product
            .checked_mul(pow10(i32::from(self.scale() - digits))?)
            .ok_or(NumericError::Overflow)?;
        self.with_mantissa(widened)
    }

    /// Quotient rounded to `digits` fractional digits, kept in this type.
    fn divide_and_round<T: FixedPoint>(
        self,
        other: T,
        digits: u8,
        mode: RoundingMode,
    ) -> NumericResult<Self> {
        if other.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(self);
        }
        let digits = digits.min(self.scale());
        let shift = i32::from(other.scale()) + i32::from(digits) - i32::from(self.scale());
        let quotient = if shift >= 0 {
            wide::scale_and_divide(self.mantissa(), shift, other.mantissa(), mode)?
        } else {
            let divisor = other
                .mantissa()
                .checked_mul(pow10(-shift)?)
                .ok_or(NumericError::Overflow)?;
            wide::mul_div(self.mantissa(), 1, divisor, mode)?
        };
        let widened = quotient
            .checked_mul(pow10(i32::from(self.scale() - digits))?)
            .ok_or(NumericError::Overflow)?;
        self.with_mantissa(widened)
    }

    /// Quotient by an integer rounded to `digits` fractional digits.
    fn divide_int_and_round(self, divisor: i64, digits: u8, mode: RoundingMode) -> NumericResult<Self> {
        if divisor == 0 {
            return Err(NumericError::DivisionByZero);
        }
        let digits = digits.min(self.scale());
        let unit = pow10(i32::from(self.scale() - digits))?;
        let scaled_divisor = divisor.checked_mul(unit).ok_or(NumericError::Overflow)?;
        let quotient = divide_longs(self.mantissa(), scaled_divisor, mode)?;
        let widened = quotient.checked_mul(unit).ok_or(NumericError::Overflow)?;
        self.with_mantissa(widened)
    }

    /// `round(self * numerator / denominator)` at this scale.
    fn multiply_ratio(self, numerator: i64, denominator: i64, mode: RoundingMode) -> NumericResult<Self> {
        if denominator == 0 {
            return Err(NumericError::DivisionByZero);
        }
        if numerator == denominator {
            return Ok(self);
        }
        let result = wide::mul_div(self.mantissa(), numerator, denominator, mode)?;
        self.with_mantissa(result)
    }

    // ========================================================================
    // Rounding
    // ========================================================================

    /// Round to `digits` fractional digits, keeping this type and scale.
    ///
    /// A no-op when `digits >= scale`.
    fn round(self, digits: u8, mode: RoundingMode) -> NumericResult<Self> {
        if digits >= self.scale() || self.is_zero() {
            return Ok(self);
        }
        let unit = POWERS_OF_TEN[usize::from(self.scale() - digits)];
        let rounded = divide_longs(self.mantissa(), unit, mode)?;
        let widened = rounded.checked_mul(unit).ok_or(NumericError::Overflow)?;
        self.with_mantissa(widened)
    }

    /// Rescale mantissas given at `source_scale` to this scale, keeping
    /// `result[0] == sum(result[1..])`.
    fn round_with_error_distribution(self, unscaled: &[i64], source_scale: u8) -> NumericResult<Breakdown> {
        scale_with_error_distribution(unscaled, source_scale, self.scale())
    }

    /// This value scaled by 0.01.
    fn percent(self) -> NumericResult<VariableUnits> {
        match self.scale() {
            18 => VariableUnits::new(self.mantissa() / 100, 18),
            17 => VariableUnits::new(self.mantissa() / 10, 18),
            scale => VariableUnits::new(self.mantissa(), scale + 2),
        }
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Integral part as `i32`.
    fn to_i32(self) -> NumericResult<i32> {
        i32::try_from(self.integer_part()).map_err(|_| NumericError::Overflow)
    }

    /// Integral part, truncated toward zero.
    #[inline]
    fn to_i64(self) -> i64 {
        self.integer_part()
    }

    /// Best effort; loses precision above 15 significant digits.
    #[inline]
    fn to_f64(self) -> f64 {
        self.mantissa() as f64 / self.unit_mantissa() as f64
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }

    /// Exact (mantissa, scale) pair.
    #[inline]
    fn to_decimal_triple(self) -> (i64, u8) {
        (self.mantissa(), self.scale())
    }

    /// Exact conversion into `rust_decimal::Decimal`.
    fn to_decimal(self) -> rust_decimal::Decimal {
        rust_decimal::Decimal::new(self.mantissa(), u32::from(self.scale()))
    }
}
