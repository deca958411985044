// ============================================================================
// Fixed-Point Decimal
// Fixed-scale decimals with the scale carried in the type
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::fixed_point::{sealed::RawMantissa, FixedPoint};
use super::rounding::RoundingMode;
use super::scaled::{
    check_mantissa, parse_mantissa, pow10_const, rescale_mantissa, write_mantissa, MAX_MANTISSA,
    MAX_SCALE,
};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;

/// Fixed-point decimal number with compile-time precision.
///
/// Internally stores `value × 10^DECIMALS` as an i64, with at most 18
/// significant digits. Each `DECIMALS` is a distinct type: adding a
/// `Hundreds` to a `MilliUnits` requires an explicit conversion.
///
/// # Type Parameter
/// - `DECIMALS`: Number of decimal places (0-18). Larger values fail to
///   compile as soon as the type is used.
///
/// # Value Range
/// With DECIMALS=3:
/// - Minimum: -999,999,999,999,999.999
/// - Maximum: +999,999,999,999,999.999
/// - Precision: 0.001
///
/// # Example
/// ```
/// use fixedpoint::numeric::{FixedPoint, MilliUnits, RoundingMode};
///
/// let price: MilliUnits = "19.99".parse()?;
/// let rate = MilliUnits::from_parts(1, 190)?;          // 1.190
/// let net = price.divide(rate, RoundingMode::HalfEven)?;
/// assert_eq!(net.to_string(), "16.798");
/// # Ok::<(), fixedpoint::numeric::NumericError>(())
/// ```
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct FixedDecimal<const DECIMALS: u8>(i64);

// ============================================================================
// Scale Constants
// ============================================================================

impl<const D: u8> FixedDecimal<D> {
    /// Number of decimals, rejected at compile time above 18
    pub const DECIMALS: u8 = {
        assert!(D <= MAX_SCALE, "FixedDecimal supports at most 18 decimals");
        D
    };

    /// The scale factor (10^DECIMALS), also the mantissa of one
    pub const SCALE: i64 = pow10_const(Self::DECIMALS);

    /// Zero value
    pub const ZERO: Self = Self(0);

    /// One (1.0)
    pub const ONE: Self = Self(Self::SCALE);

    /// Minus one (-1.0)
    pub const MINUS_ONE: Self = Self(-Self::SCALE);

    /// Maximum representable value
    pub const MAX: Self = Self(MAX_MANTISSA);

    /// Minimum representable value
    pub const MIN: Self = Self(-MAX_MANTISSA);

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from raw internal representation without checking the bound.
    ///
    /// Only for mantissas already known to have at most 18 digits; `of`
    /// is the checked public constructor.
    #[inline]
    pub(crate) const fn from_raw(raw: i64) -> Self {
        debug_assert!(raw >= -MAX_MANTISSA && raw <= MAX_MANTISSA);
        Self(raw)
    }

    /// Create from a mantissa.
    ///
    /// # Errors
    /// Returns `Overflow` for more than 18 digits.
    #[inline]
    pub fn of(mantissa: i64) -> NumericResult<Self> {
        check_mantissa(mantissa).map(Self)
    }

    /// Create from an integer value.
    ///
    /// # Errors
    /// Returns `Overflow` if the value is too large to represent.
    #[inline]
    pub fn from_integer(value: i64) -> NumericResult<Self> {
        value
            .checked_mul(Self::SCALE)
            .ok_or(NumericError::Overflow)
            .and_then(Self::of)
    }

    /// Create from integer and fractional parts.
    ///
    /// # Arguments
    /// - `integer`: The integer part (can be negative)
    /// - `fraction`: The fractional digits as a mantissa (must be < SCALE)
    ///
    /// # Example
    /// ```
    /// # use fixedpoint::numeric::MilliUnits;
    /// let x = MilliUnits::from_parts(-5, 500)?;   // -5.500
    /// assert_eq!(x.to_string(), "-5.500");
    /// # Ok::<(), fixedpoint::numeric::NumericError>(())
    /// ```
    pub fn from_parts(integer: i64, fraction: u64) -> NumericResult<Self> {
        if fraction >= Self::SCALE as u64 {
            return Err(NumericError::MalformedNumber("fraction out of range"));
        }

        let int_scaled = integer
            .checked_mul(Self::SCALE)
            .ok_or(NumericError::Overflow)?;

        let frac_signed = if integer < 0 {
            -(fraction as i64)
        } else {
            fraction as i64
        };

        int_scaled
            .checked_add(frac_signed)
            .ok_or(NumericError::Overflow)
            .and_then(Self::of)
    }

    /// Create from a float, rounding to the nearest mantissa.
    ///
    /// # Errors
    /// - `MalformedNumber` for NaN and infinities
    /// - `Overflow` if the value is too large
    pub fn from_f64(value: f64) -> NumericResult<Self> {
        if !value.is_finite() {
            return Err(NumericError::MalformedNumber("not a finite number"));
        }
        let scaled = (value * Self::SCALE as f64).round();
        if scaled.abs() > MAX_MANTISSA as f64 {
            return Err(NumericError::Overflow);
        }
        Self::of(scaled as i64)
    }

    /// Retype another fixed-point value, widening only.
    ///
    /// # Errors
    /// - `RoundingRequired` if `other` has more decimals than this type;
    ///   use `from_fixed_rounded` to narrow
    /// - `Overflow` if widening exceeds 18 digits
    pub fn from_fixed<T: FixedPoint>(other: T) -> NumericResult<Self> {
        if other.scale() > Self::DECIMALS {
            return Err(NumericError::RoundingRequired);
        }
        rescale_mantissa(other.mantissa(), other.scale(), Self::DECIMALS, RoundingMode::Unnecessary)
            .map(Self)
    }

    /// Retype another fixed-point value, rounding with `mode` if it has more
    /// decimals than this type.
    pub fn from_fixed_rounded<T: FixedPoint>(other: T, mode: RoundingMode) -> NumericResult<Self> {
        rescale_mantissa(other.mantissa(), other.scale(), Self::DECIMALS, mode).map(Self)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the raw internal value (scaled).
    #[inline]
    pub const fn raw_value(self) -> i64 {
        self.0
    }

    /// Check if value is positive.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns the minimum of two values.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Returns the maximum of two values.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    // ========================================================================
    // Marshalling
    // ========================================================================

    /// The mantissa, for binary encoders. The scale is implied by the type.
    #[inline]
    pub const fn marshal(self) -> i64 {
        self.0
    }

    /// Inverse of `marshal`; `None` stays `None`.
    pub fn unmarshal(mantissa: Option<i64>) -> NumericResult<Option<Self>> {
        mantissa.map(Self::of).transpose()
    }
}

impl<const D: u8> RawMantissa for FixedDecimal<D> {
    #[inline]
    fn with_raw_mantissa(self, mantissa: i64) -> Self {
        Self(mantissa)
    }
}

impl<const D: u8> FixedPoint for FixedDecimal<D> {
    #[inline]
    fn mantissa(self) -> i64 {
        self.0
    }

    #[inline]
    fn scale(self) -> u8 {
        Self::DECIMALS
    }

    #[inline]
    fn is_fixed_scale(self) -> bool {
        true
    }

    #[inline]
    fn unit_mantissa(self) -> i64 {
        Self::SCALE
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl<const D: u8> Default for FixedDecimal<D> {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const D: u8> PartialEq for FixedDecimal<D> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<const D: u8> Eq for FixedDecimal<D> {}

impl<const D: u8> PartialOrd for FixedDecimal<D> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const D: u8> Ord for FixedDecimal<D> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<const D: u8> Hash for FixedDecimal<D> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<const D: u8> Neg for FixedDecimal<D> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

// Checked operators: each returns NumericResult, so `(a + b)?` never panics
impl<const D: u8> std::ops::Add for FixedDecimal<D> {
    type Output = NumericResult<Self>;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        FixedPoint::add(self, rhs)
    }
}

impl<const D: u8> std::ops::Sub for FixedDecimal<D> {
    type Output = NumericResult<Self>;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.subtract(rhs)
    }
}

impl<const D: u8> std::ops::Mul<i64> for FixedDecimal<D> {
    type Output = NumericResult<Self>;

    #[inline]
    fn mul(self, rhs: i64) -> Self::Output {
        self.multiply_int(rhs)
    }
}

impl<const D: u8> std::ops::Div<i64> for FixedDecimal<D> {
    type Output = NumericResult<Self>;

    /// Truncating, like `divide_int`.
    #[inline]
    fn div(self, rhs: i64) -> Self::Output {
        self.divide_int(rhs)
    }
}

impl<const D: u8> std::ops::Rem<i64> for FixedDecimal<D> {
    type Output = NumericResult<Self>;

    #[inline]
    fn rem(self, rhs: i64) -> Self::Output {
        self.remainder_int(rhs)
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl<const D: u8> fmt::Debug for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedDecimal<{}>({}, raw={})", D, self, self.0)
    }
}

impl<const D: u8> fmt::Display for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_mantissa(f, self.0, Self::DECIMALS, false)
    }
}

// ============================================================================
// Conversion from rust_decimal (for API boundaries)
// ============================================================================

impl<const D: u8> FixedDecimal<D> {
    /// Convert from rust_decimal::Decimal, exactly.
    ///
    /// # Errors
    /// - `RoundingRequired` if significant digits would be lost
    /// - `Overflow` if the value is too large
    pub fn from_decimal(d: rust_decimal::Decimal) -> NumericResult<Self> {
        let mantissa = d.mantissa();
        let source = d.scale();
        let target = u32::from(Self::DECIMALS);

        let rescaled = if source <= target {
            10i128
                .checked_pow(target - source)
                .and_then(|factor| mantissa.checked_mul(factor))
                .ok_or(NumericError::Overflow)?
        } else {
            let factor = 10i128.pow(source - target);
            if mantissa % factor != 0 {
                return Err(NumericError::RoundingRequired);
            }
            mantissa / factor
        };

        i64::try_from(rescaled)
            .map_err(|_| NumericError::Overflow)
            .and_then(Self::of)
    }
}

impl<const D: u8> TryFrom<rust_decimal::Decimal> for FixedDecimal<D> {
    type Error = NumericError;

    fn try_from(d: rust_decimal::Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(d)
    }
}

impl<const D: u8> From<FixedDecimal<D>> for rust_decimal::Decimal {
    fn from(value: FixedDecimal<D>) -> Self {
        value.to_decimal()
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl<const D: u8> std::str::FromStr for FixedDecimal<D> {
    type Err = NumericError;

    /// Parse from a decimal string.
    ///
    /// # Examples
    /// - "123" -> 123.000 (for 3 decimals)
    /// - "-0.001" -> -0.001
    /// - "1.2340" -> 1.234 (excess zeros are accepted)
    /// - "1.2345" -> error, no silent rounding
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_mantissa(s, Self::DECIMALS).map(Self)
    }
}

// ============================================================================
// Serde (canonical string form)
// ============================================================================

#[cfg(feature = "serde")]
impl<const D: u8> serde::Serialize for FixedDecimal<D> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
struct FixedDecimalVisitor<const D: u8>;

#[cfg(feature = "serde")]
impl<'de, const D: u8> serde::de::Visitor<'de> for FixedDecimalVisitor<D> {
    type Value = FixedDecimal<D>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a decimal string or an integer with at most {} decimals", D)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        FixedDecimal::from_integer(value).map_err(E::custom)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        i64::try_from(value)
            .map_err(|_| E::custom(NumericError::Overflow))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        value.parse().map_err(E::custom)
    }
}

#[cfg(feature = "serde")]
impl<'de, const D: u8> serde::Deserialize<'de> for FixedDecimal<D> {
    fn deserialize<De>(deserializer: De) -> Result<Self, De::Error>
    where
        De: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(FixedDecimalVisitor::<D>)
    }
}

// ============================================================================
// Type Aliases for the Supported Scales
// ============================================================================

/// Integral values (0 decimals)
pub type Units = FixedDecimal<0>;

/// 1 decimal
pub type Tenths = FixedDecimal<1>;

/// 2 decimals, the minor unit of most currencies
pub type Hundreds = FixedDecimal<2>;

/// 3 decimals
pub type MilliUnits = FixedDecimal<3>;

/// 6 decimals
pub type MicroUnits = FixedDecimal<6>;

/// 9 decimals
pub type NanoUnits = FixedDecimal<9>;

/// 12 decimals
pub type PicoUnits = FixedDecimal<12>;

/// 15 decimals
pub type FemtoUnits = FixedDecimal<15>;

// ============================================================================
// Tests
// ============================================================================
