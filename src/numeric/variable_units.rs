// ============================================================================
// Variable-Scale Decimal
// Scaled integer carrying its own scale per value
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::fixed_point::{sealed::RawMantissa, FixedPoint};
use super::rounding::RoundingMode;
use super::scaled::{
    check_mantissa, check_scale, fractional_digits, parse_mantissa, rescale_mantissa, write_mantissa,
    MAX_SCALE, POWERS_OF_TEN,
};
use std::fmt;

/// Decimal with a scale of 0 to 18 chosen per value.
///
/// Equality and hashing are structural: `2.0` and `2.00` are different
/// values. Use `compare` or `numeric_eq` for numeric equality. There is
/// deliberately no `Ord` implementation for the same reason.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableUnits {
    mantissa: i64,
    scale: u8,
}

const fn build_table(unit: bool) -> [VariableUnits; 19] {
    let mut table = [VariableUnits { mantissa: 0, scale: 0 }; 19];
    let mut scale = 0;
    while scale <= MAX_SCALE as usize {
        table[scale] = VariableUnits {
            mantissa: if unit { POWERS_OF_TEN[scale] } else { 0 },
            scale: scale as u8,
        };
        scale += 1;
    }
    table
}

/// Zero for every scale, built at compile time.
static ZEROS: [VariableUnits; 19] = build_table(false);

/// One for every scale, built at compile time.
static ONES: [VariableUnits; 19] = build_table(true);

impl VariableUnits {
    /// Create from a mantissa and a scale.
    ///
    /// # Errors
    /// Returns `Overflow` for a scale above 18 or more than 18 digits.
    pub fn new(mantissa: i64, scale: u8) -> NumericResult<Self> {
        let scale = check_scale(scale)?;
        let mantissa = check_mantissa(mantissa)?;
        Ok(Self { mantissa, scale })
    }

    /// Create from an integer value at scale 0.
    pub fn from_integer(value: i64) -> NumericResult<Self> {
        Self::new(value, 0)
    }

    /// Zero at `scale`, or `None` above 18.
    pub fn zero_of(scale: u8) -> Option<Self> {
        ZEROS.get(usize::from(scale)).copied()
    }

    /// One at `scale`, or `None` above 18.
    pub fn one_of(scale: u8) -> Option<Self> {
        ONES.get(usize::from(scale)).copied()
    }

    /// Retype any fixed-point value; always exact.
    pub fn from_fixed<T: FixedPoint>(other: T) -> NumericResult<Self> {
        Self::new(other.mantissa(), other.scale())
    }

    /// Same value at another scale, rounding with `mode` when narrowing.
    pub fn with_scale(self, scale: u8, mode: RoundingMode) -> NumericResult<Self> {
        let scale = check_scale(scale)?;
        let mantissa = rescale_mantissa(self.mantissa, self.scale, scale, mode)?;
        Ok(Self { mantissa, scale })
    }

    /// Parse at an explicit scale
    pub fn parse_with_scale(src: &str, scale: u8) -> NumericResult<Self> {
        let scale = check_scale(scale)?;
        let mantissa = parse_mantissa(src, scale)?;
        Ok(Self { mantissa, scale })
    }

    /// Sum of heterogeneous values at the largest scale among them,
    /// optionally plus one; no intermediate rounding.
    ///
    /// `sum_of(&[rate_a, rate_b], true)` is `1 + rate_a + rate_b`.
    pub fn sum_of<T: FixedPoint>(components: &[T], add_one: bool) -> NumericResult<Self> {
        let scale = components.iter().map(|c| c.scale()).max().unwrap_or(0);
        let start = if add_one { POWERS_OF_TEN[usize::from(scale)] } else { 0 };
        let sum = components.iter().try_fold(start, |acc, c| {
            let shifted = rescale_mantissa(c.mantissa(), c.scale(), scale, RoundingMode::Unnecessary)?;
            acc.checked_add(shifted).ok_or(NumericError::Overflow)
        })?;
        Self::new(sum, scale)
    }

    /// Create from a float at `scale`, rounding to the nearest mantissa.
    pub fn from_f64(value: f64, scale: u8) -> NumericResult<Self> {
        let scale = check_scale(scale)?;
        if !value.is_finite() {
            return Err(NumericError::MalformedNumber("not a finite number"));
        }
        let scaled = (value * POWERS_OF_TEN[usize::from(scale)] as f64).round();
        if scaled.abs() > super::scaled::MAX_MANTISSA as f64 {
            return Err(NumericError::Overflow);
        }
        Self::new(scaled as i64, scale)
    }

    /// Convert from rust_decimal::Decimal, keeping its scale.
    ///
    /// # Errors
    /// Returns `Overflow` for scales above 18 or more than 18 digits.
    pub fn from_decimal(d: rust_decimal::Decimal) -> NumericResult<Self> {
        let scale = u8::try_from(d.scale()).map_err(|_| NumericError::Overflow)?;
        let mantissa = i64::try_from(d.mantissa()).map_err(|_| NumericError::Overflow)?;
        Self::new(mantissa, scale)
    }

    /// The (mantissa, scale) pair, for binary encoders.
    #[inline]
    pub const fn marshal(self) -> (i64, u8) {
        (self.mantissa, self.scale)
    }

    /// Inverse of `marshal`; `None` stays `None`.
    pub fn unmarshal(value: Option<(i64, u8)>) -> NumericResult<Option<Self>> {
        value.map(|(m, s)| Self::new(m, s)).transpose()
    }
}

impl RawMantissa for VariableUnits {
    #[inline]
    fn with_raw_mantissa(self, mantissa: i64) -> Self {
        Self {
            mantissa,
            scale: self.scale,
        }
    }
}

impl FixedPoint for VariableUnits {
    #[inline]
    fn mantissa(self) -> i64 {
        self.mantissa
    }

    #[inline]
    fn scale(self) -> u8 {
        self.scale
    }

    #[inline]
    fn is_fixed_scale(self) -> bool {
        false
    }
}

impl Default for VariableUnits {
    fn default() -> Self {
        ZEROS[0]
    }
}

impl fmt::Debug for VariableUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariableUnits({}, scale={})", self, self.scale)
    }
}

impl fmt::Display for VariableUnits {
    /// Always prints every fractional digit, so parsing restores the scale.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_mantissa(f, self.mantissa, self.scale, true)
    }
}

impl std::str::FromStr for VariableUnits {
    type Err = NumericError;

    /// Parse, inferring the scale from the number of fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = fractional_digits(s);
        let scale = u8::try_from(digits)
            .ok()
            .filter(|s| *s <= MAX_SCALE)
            .ok_or(NumericError::MalformedNumber("more than 18 fractional digits"))?;
        Self::parse_with_scale(s, scale)
    }
}

impl std::ops::Neg for VariableUnits {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl std::ops::Add for VariableUnits {
    type Output = NumericResult<Self>;

    fn add(self, rhs: Self) -> Self::Output {
        FixedPoint::add(self, rhs)
    }
}

impl std::ops::Sub for VariableUnits {
    type Output = NumericResult<Self>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.subtract(rhs)
    }
}

impl std::ops::Mul<i64> for VariableUnits {
    type Output = NumericResult<Self>;

    fn mul(self, rhs: i64) -> Self::Output {
        self.multiply_int(rhs)
    }
}

impl std::ops::Div<i64> for VariableUnits {
    type Output = NumericResult<Self>;

    fn div(self, rhs: i64) -> Self::Output {
        self.divide_int(rhs)
    }
}

impl std::ops::Rem<i64> for VariableUnits {
    type Output = NumericResult<Self>;

    fn rem(self, rhs: i64) -> Self::Output {
        self.remainder_int(rhs)
    }
}

// ============================================================================
// Serde (canonical string form, scale preserved)
// ============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for VariableUnits {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
struct VariableUnitsVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for VariableUnitsVisitor {
    type Value = VariableUnits;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal string or an integer")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        VariableUnits::from_integer(value).map_err(E::custom)
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
impl<'de> serde::Deserialize<'de> for VariableUnits {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(VariableUnitsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{Hundreds, MilliUnits};
    use quickcheck::quickcheck;
    use std::cmp::Ordering;

    #[test]
    fn test_singleton_tables() {
        for scale in 0..=MAX_SCALE {
            let zero = VariableUnits::zero_of(scale).unwrap();
            let one = VariableUnits::one_of(scale).unwrap();
            assert!(zero.is_zero());
            assert!(one.is_one());
            assert_eq!(zero.scale(), scale);
            assert_eq!(one.mantissa(), POWERS_OF_TEN[usize::from(scale)]);
        }
        assert_eq!(VariableUnits::zero_of(19), None);
        assert!(!VariableUnits::default().is_fixed_scale());
    }

    #[test]
    fn test_new_checks() {
        assert_eq!(VariableUnits::new(1, 19), Err(NumericError::Overflow));
        assert_eq!(VariableUnits::new(i64::MAX, 0), Err(NumericError::Overflow));
    }

    #[test]
    fn test_parse_infers_scale() {
        let v: VariableUnits = "19.80".parse().unwrap();
        assert_eq!(v.scale(), 2);
        assert_eq!(v.mantissa(), 1980);
        assert_eq!(v.to_string(), "19.80");

        let v: VariableUnits = "-3".parse().unwrap();
        assert_eq!(v, VariableUnits::new(-3, 0).unwrap());

        let v: VariableUnits = "0.000".parse().unwrap();
        assert_eq!(v.to_string(), "0.000");

        assert!("1.0000000000000000000".parse::<VariableUnits>().is_err());
        assert!("".parse::<VariableUnits>().is_err());
    }

    #[test]
    fn test_structural_vs_numeric_equality() {
        let a = VariableUnits::new(20, 1).unwrap();
        let b = VariableUnits::new(200, 2).unwrap();
        assert_ne!(a, b);
        assert!(a.numeric_eq(b));
        assert_eq!(a.compare(b), Ordering::Equal);

        let minus = VariableUnits::new(-1, 3).unwrap();
        assert_eq!(minus.compare(VariableUnits::zero_of(0).unwrap()), Ordering::Less);
    }

    #[test]
    fn test_add_uses_larger_scale() {
        let a = VariableUnits::new(150, 2).unwrap();
        let b = VariableUnits::new(1, 3).unwrap();
        assert_eq!(a.add(b), Ok(VariableUnits::new(1501, 3).unwrap()));
        assert_eq!(b.add(a), Ok(VariableUnits::new(1501, 3).unwrap()));
        assert_eq!(a.subtract(b), Ok(VariableUnits::new(1499, 3).unwrap()));
        assert_eq!(b.subtract(a), Ok(VariableUnits::new(-1499, 3).unwrap()));
    }

    #[test]
    fn test_divide_net_of_tax() {
        let gross = VariableUnits::new(1999, 2).unwrap();
        let taxed = MilliUnits::from_raw(1190);
        let net = gross.divide(taxed, RoundingMode::HalfEven).unwrap();
        assert_eq!(net, VariableUnits::new(1680, 2).unwrap());
    }

    #[test]
    fn test_sum_of() {
        let rates = [
            VariableUnits::new(19, 2).unwrap(),
            VariableUnits::new(5, 3).unwrap(),
        ];
        assert_eq!(VariableUnits::sum_of(&rates, true), Ok(VariableUnits::new(1195, 3).unwrap()));
        assert_eq!(VariableUnits::sum_of(&rates, false), Ok(VariableUnits::new(195, 3).unwrap()));

        let empty: [Hundreds; 0] = [];
        assert_eq!(VariableUnits::sum_of(&empty, true), Ok(VariableUnits::one_of(0).unwrap()));
    }

    #[test]
    fn test_with_scale() {
        let v = VariableUnits::new(31_415, 4).unwrap();
        assert_eq!(v.with_scale(2, RoundingMode::HalfEven), Ok(VariableUnits::new(314, 2).unwrap()));
        assert_eq!(v.with_scale(6, RoundingMode::Unnecessary), Ok(VariableUnits::new(3_141_500, 6).unwrap()));
        assert_eq!(v.with_scale(2, RoundingMode::Unnecessary), Err(NumericError::RoundingRequired));
        assert_eq!(v.with_scale(19, RoundingMode::HalfEven), Err(NumericError::Overflow));
    }

    #[test]
    fn test_percent_at_high_scales() {
        let v = VariableUnits::new(12_345, 17).unwrap();
        assert_eq!(v.percent(), Ok(VariableUnits::new(1_234, 18).unwrap()));
        let v = VariableUnits::new(12_345, 18).unwrap();
        assert_eq!(v.percent(), Ok(VariableUnits::new(123, 18).unwrap()));
    }

    #[test]
    fn test_marshal() {
        let v = VariableUnits::new(-1980, 2).unwrap();
        assert_eq!(v.marshal(), (-1980, 2));
        assert_eq!(VariableUnits::unmarshal(Some(v.marshal())), Ok(Some(v)));
        assert_eq!(VariableUnits::unmarshal(None), Ok(None));
        assert_eq!(VariableUnits::unmarshal(Some((1, 30))), Err(NumericError::Overflow));
    }

    #[test]
    fn test_decimal_interop() {
        let d: rust_decimal::Decimal = "19.80".parse().unwrap();
        let v = VariableUnits::from_decimal(d).unwrap();
        assert_eq!(v, VariableUnits::new(1980, 2).unwrap());
        assert_eq!(v.to_decimal(), d);
        assert_eq!(VariableUnits::from_f64(0.125, 3), Ok(VariableUnits::new(125, 3).unwrap()));
    }

    #[test]
    fn test_negation() {
        let v = VariableUnits::new(5, 1).unwrap();
        assert_eq!(-v, VariableUnits::new(-5, 1).unwrap());
        assert_eq!((-v).to_string(), "-0.5");
    }

    fn bounded(m: i64, s: u8) -> VariableUnits {
        VariableUnits::new(m % 1_000_000_000_000_000_000, s % 19).unwrap()
    }

    #[test]
    fn test_checked_operators() {
        let a = VariableUnits::new(150, 2).unwrap();
        let b = VariableUnits::new(1, 3).unwrap();
        assert_eq!(a + b, Ok(VariableUnits::new(1501, 3).unwrap()));
        assert_eq!(a - b, Ok(VariableUnits::new(1499, 3).unwrap()));
        assert_eq!(a * -4, Ok(VariableUnits::new(-600, 2).unwrap()));
        assert_eq!(VariableUnits::new(151, 2).unwrap() / 2, Ok(VariableUnits::new(75, 2).unwrap()));
        assert_eq!(VariableUnits::new(151, 2).unwrap() % 2, Ok(VariableUnits::new(1, 2).unwrap()));
        assert_eq!(a / 0, Err(NumericError::DivisionByZero));

        // 10^16 at scale 0 cannot be widened to scale 3 within 18 digits
        let big = VariableUnits::new(10_000_000_000_000_000, 0).unwrap();
        assert_eq!(big + b, Err(NumericError::Overflow));
    }

    #[test]
    fn test_sum_all() {
        let values = [
            VariableUnits::new(15, 1).unwrap(),
            VariableUnits::new(25, 2).unwrap(),
            VariableUnits::zero_of(6).unwrap(),
        ];
        assert_eq!(VariableUnits::sum_all(values), Ok(Some(VariableUnits::new(175, 2).unwrap())));
        assert_eq!(VariableUnits::sum_all(std::iter::empty()), Ok(None));
    }

    quickcheck! {
        fn qc_compare_antisymmetric(a: i64, sa: u8, b: i64, sb: u8) -> bool {
            let x = bounded(a, sa);
            let y = bounded(b, sb);
            x.compare(y) == y.compare(x).reverse()
        }

        fn qc_display_round_trip(m: i64, s: u8) -> bool {
            let x = bounded(m, s);
            x.to_string().parse::<VariableUnits>() == Ok(x)
        }
    }

    #[cfg(feature = "serde")]
    mod serde_tests {
        use super::*;

        #[test]
        fn test_scale_survives_json() {
            let v = VariableUnits::new(200, 2).unwrap();
            let json = serde_json::to_string(&v).unwrap();
            assert_eq!(json, "\"2.00\"");
            let back: VariableUnits = serde_json::from_str(&json).unwrap();
            assert_eq!(back, v);
        }

        #[test]
        fn test_integer_deserializes_at_scale_zero() {
            let back: VariableUnits = serde_json::from_str("-7").unwrap();
            assert_eq!(back, VariableUnits::new(-7, 0).unwrap());
        }
    }
}
