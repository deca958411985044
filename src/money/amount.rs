// ============================================================================
// Monetary Amount
// Gross amount in a currency with an optional net + taxes breakdown
// ============================================================================

use super::currency::Currency;
use crate::numeric::{
    check_mantissa, discrepancy, distribute_ratio, pow10, rescale_mantissa, write_mantissa, FixedPoint, RawMantissa,
    NumericError, NumericResult, RoundingMode, VariableUnits,
};
use crate::wide;
use smallvec::SmallVec;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Net amount plus a few taxes, stored inline.
pub type Components = SmallVec<[i64; 4]>;

/// An immutable amount of money.
///
/// All mantissas are at the currency's scale. When a breakdown exists,
/// `gross == sum(components)` holds for every constructed value; the first
/// component is the net amount and the rest are taxes.
///
/// Equality is structural: currency, gross and every component must match.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "AmountWire"))]
pub struct MonetaryAmount {
    currency: Currency,
    gross: i64,
    components: Components,
}

impl MonetaryAmount {
    /// Create an amount from mantissas at the currency's scale.
    ///
    /// # Errors
    /// - `Overflow` for a mantissa with more than 18 digits
    /// - `SumInvariantViolated` if `components` is non-empty and does not
    ///   add up to `gross`
    pub fn new(currency: Currency, gross: i64, components: &[i64]) -> NumericResult<Self> {
        let amount = Self {
            currency,
            gross: check_mantissa(gross)?,
            components: components.iter().map(|c| check_mantissa(*c)).collect::<NumericResult<_>>()?,
        };
        amount.validate()?;
        Ok(amount)
    }

    /// A scalar amount without breakdown.
    ///
    /// # Errors
    /// `RoundingRequired` if `value` has more digits than the currency.
    pub fn from_value<T: FixedPoint>(value: T, currency: Currency) -> NumericResult<Self> {
        let gross = rescale_mantissa(value.mantissa(), value.scale(), currency.decimals(), RoundingMode::Unnecessary)?;
        Ok(Self {
            currency,
            gross,
            components: Components::new(),
        })
    }

    /// Check `gross == sum(components)` when a breakdown exists.
    pub fn validate(&self) -> NumericResult<()> {
        if self.components.is_empty() {
            return Ok(());
        }
        let diff = self.gross.checked_sub(self.component_sum()?).ok_or(NumericError::Overflow)?;
        if diff != 0 {
            return Err(NumericError::SumInvariantViolated {
                gross: self.gross,
                sum: self.gross - diff,
            });
        }
        Ok(())
    }

    fn component_sum(&self) -> NumericResult<i64> {
        self.components
            .iter()
            .try_fold(0i64, |acc, c| acc.checked_add(*c))
            .ok_or(NumericError::Overflow)
    }

    fn with_parts(&self, currency: Currency, gross: i64, components: Components) -> Self {
        Self {
            currency,
            gross,
            components,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Gross mantissa at the currency's scale.
    #[inline]
    pub fn gross(&self) -> i64 {
        self.gross
    }

    /// The gross amount as a decimal at the currency's scale.
    pub fn gross_as_value(&self) -> VariableUnits {
        self.value_of(self.gross)
    }

    /// Net followed by taxes; empty without breakdown.
    #[inline]
    pub fn components(&self) -> &[i64] {
        &self.components
    }

    /// The net component, if a breakdown exists.
    pub fn net(&self) -> Option<VariableUnits> {
        self.components.first().map(|net| self.value_of(*net))
    }

    /// Tax components, in the order they were applied.
    pub fn taxes(&self) -> &[i64] {
        self.components.get(1..).unwrap_or(&[])
    }

    #[inline]
    pub fn has_breakdown(&self) -> bool {
        !self.components.is_empty()
    }

    fn value_of(&self, mantissa: i64) -> VariableUnits {
        VariableUnits::zero_of(self.currency.decimals())
            .unwrap_or_default()
            .with_raw_mantissa(mantissa)
    }

    // ========================================================================
    // Additive Arithmetic
    // ========================================================================

    fn check_matching(&self, other: &Self) -> NumericResult<()> {
        if self.currency != other.currency {
            return Err(NumericError::InvalidCurrency("currencies don't match"));
        }
        if self.components.len() != other.components.len() {
            return Err(NumericError::ScaleMismatch);
        }
        Ok(())
    }

    /// Zero in the same currency with the same number of components.
    pub fn zero(&self) -> Self {
        self.with_parts(self.currency, 0, self.components.iter().map(|_| 0).collect())
    }

    pub fn negate(&self) -> Self {
        self.with_parts(self.currency, -self.gross, self.components.iter().map(|c| -c).collect())
    }

    /// Element-wise sum.
    ///
    /// # Errors
    /// `InvalidCurrency` for another currency, `ScaleMismatch` for another
    /// number of components.
    pub fn add(&self, other: &Self) -> NumericResult<Self> {
        self.combine(other, i64::checked_add)
    }

    /// Element-wise difference.
    pub fn subtract(&self, other: &Self) -> NumericResult<Self> {
        self.combine(other, i64::checked_sub)
    }

    fn combine(&self, other: &Self, op: fn(i64, i64) -> Option<i64>) -> NumericResult<Self> {
        self.check_matching(other)?;
        let apply = |a: i64, b: i64| op(a, b).ok_or(NumericError::Overflow).and_then(check_mantissa);
        let gross = apply(self.gross, other.gross)?;
        let components = self
            .components
            .iter()
            .zip(other.components.iter())
            .map(|(a, b)| apply(*a, *b))
            .collect::<NumericResult<_>>()?;
        Ok(self.with_parts(self.currency, gross, components))
    }

    /// Exact product with an integer.
    pub fn multiply_int(&self, factor: i64) -> NumericResult<Self> {
        if factor == 1 {
            return Ok(self.clone());
        }
        let scale = |v: i64| v.checked_mul(factor).ok_or(NumericError::Overflow).and_then(check_mantissa);
        let components = self.components.iter().map(|c| scale(*c)).collect::<NumericResult<_>>()?;
        Ok(self.with_parts(self.currency, scale(self.gross)?, components))
    }

    // ========================================================================
    // Multiplicative Arithmetic
    // ========================================================================

    /// Scale by `numerator / denominator`.
    ///
    /// With a breakdown, the rounding error is distributed so that the
    /// components still add up to the rounded gross.
    pub fn multiply_ratio(&self, numerator: i64, denominator: i64, mode: RoundingMode) -> NumericResult<Self> {
        if denominator == 0 {
            return Err(NumericError::DivisionByZero);
        }
        if numerator == denominator {
            return Ok(self.clone());
        }
        self.scaled(self.currency, numerator, denominator, mode)
    }

    fn scaled(&self, currency: Currency, numerator: i64, denominator: i64, mode: RoundingMode) -> NumericResult<Self> {
        if self.components.is_empty() {
            let gross = check_mantissa(wide::mul_div(self.gross, numerator, denominator, mode)?)?;
            return Ok(self.with_parts(currency, gross, Components::new()));
        }
        let mut values: SmallVec<[i64; 8]> = SmallVec::with_capacity(self.components.len() + 1);
        values.push(self.gross);
        values.extend_from_slice(&self.components);
        let scaled = distribute_ratio(&values, numerator, denominator, mode)?;
        Ok(self.with_parts(currency, scaled[0], Components::from_slice(&scaled[1..])))
    }

    /// Multiply by a decimal factor, rounding `HalfEven` to the currency's
    /// scale with rounding error distribution.
    pub fn multiply_by<T: FixedPoint>(&self, factor: T) -> NumericResult<Self> {
        if factor.is_one() {
            return Ok(self.clone());
        }
        if factor.is_minus_one() {
            return Ok(self.negate());
        }
        if factor.is_zero() {
            return Ok(self.zero());
        }
        if factor.scale() == 0 {
            return self.multiply_int(factor.mantissa());
        }
        self.scaled(self.currency, factor.mantissa(), factor.unit_mantissa(), RoundingMode::HalfEven)
    }

    /// Multiply by an exchange rate and re-denominate in `currency`.
    ///
    /// The rate's scale and the difference in minor-unit digits are folded
    /// into one power of ten, so at most one rounding step happens.
    pub fn convert<T: FixedPoint>(&self, rate: T, currency: Currency) -> NumericResult<Self> {
        let shift = i32::from(rate.scale()) + i32::from(self.currency.decimals()) - i32::from(currency.decimals());
        if shift > 0 {
            return self.scaled(currency, rate.mantissa(), pow10(shift)?, RoundingMode::HalfEven);
        }
        let factor = rate
            .mantissa()
            .checked_mul(pow10(-shift)?)
            .ok_or(NumericError::Overflow)?;
        let converted = self.multiply_int(factor)?;
        Ok(self.with_parts(currency, converted.gross, converted.components))
    }

    // ========================================================================
    // Taxes
    // ========================================================================

    /// Treat this scalar amount as net and add one tax per rate.
    ///
    /// Each tax is `net * rate`, rounded `HalfEven`. The result has the
    /// breakdown `[net, tax1, tax2, ...]`.
    ///
    /// # Errors
    /// `ScaleMismatch` if a breakdown exists already.
    pub fn net_to_gross<T: FixedPoint>(&self, rates: &[T]) -> NumericResult<Self> {
        if self.has_breakdown() {
            return Err(NumericError::ScaleMismatch);
        }
        if rates.is_empty() {
            return Ok(self.clone());
        }
        let mut components = Components::with_capacity(rates.len() + 1);
        components.push(self.gross);
        let mut gross = self.gross;
        for rate in rates {
            let tax = wide::multiply_and_scale(self.gross, rate.mantissa(), i32::from(rate.scale()), RoundingMode::HalfEven)?;
            gross = gross.checked_add(tax).ok_or(NumericError::Overflow)?;
            components.push(tax);
        }
        Ok(self.with_parts(self.currency, check_mantissa(gross)?, components))
    }

    /// Treat this scalar amount as gross and split it into net and one tax
    /// per rate.
    ///
    /// Net is `gross / (1 + sum(rates))`, each tax is
    /// `gross * rate / (1 + sum(rates))`, all rounded `HalfEven`. A residual
    /// is absorbed by the net component so the breakdown adds up exactly.
    ///
    /// # Errors
    /// `ScaleMismatch` if a breakdown exists already.
    pub fn gross_to_net<T: FixedPoint>(&self, rates: &[T]) -> NumericResult<Self> {
        if self.has_breakdown() {
            return Err(NumericError::ScaleMismatch);
        }
        if rates.is_empty() {
            return Ok(self.clone());
        }
        let total = VariableUnits::sum_of(rates, true)?;
        let mut components = Components::with_capacity(rates.len() + 1);
        let net = wide::scale_and_divide(self.gross, i32::from(total.scale()), total.mantissa(), RoundingMode::HalfEven)?;
        components.push(net);
        for rate in rates {
            let aligned = rescale_mantissa(rate.mantissa(), rate.scale(), total.scale(), RoundingMode::Unnecessary)?;
            components.push(wide::mul_div(self.gross, aligned, total.mantissa(), RoundingMode::HalfEven)?);
        }

        let mut values: SmallVec<[i64; 8]> = SmallVec::with_capacity(components.len() + 1);
        values.push(self.gross);
        values.extend_from_slice(&components);
        let residual = discrepancy(&values)?;
        components[0] = check_mantissa(components[0] + residual)?;
        Ok(self.with_parts(self.currency, self.gross, components))
    }
}

impl fmt::Debug for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MonetaryAmount({})", self)
    }
}

impl fmt::Display for MonetaryAmount {
    /// `19.99 EUR [16.80, 3.19]`, the list only when a breakdown exists.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = self.currency.decimals();
        write_mantissa(f, self.gross, scale, true)?;
        write!(f, " {}", self.currency)?;
        for (i, component) in self.components.iter().enumerate() {
            f.write_str(if i == 0 { " [" } else { ", " })?;
            write_mantissa(f, *component, scale, true)?;
        }
        if self.has_breakdown() {
            f.write_str("]")?;
        }
        Ok(())
    }
}

// ============================================================================
// Checked Operators
// ============================================================================

impl std::ops::Add for &MonetaryAmount {
    type Output = NumericResult<MonetaryAmount>;

    fn add(self, rhs: Self) -> Self::Output {
        MonetaryAmount::add(self, rhs)
    }
}

impl std::ops::Add for MonetaryAmount {
    type Output = NumericResult<MonetaryAmount>;

    fn add(self, rhs: Self) -> Self::Output {
        MonetaryAmount::add(&self, &rhs)
    }
}

impl std::ops::Sub for &MonetaryAmount {
    type Output = NumericResult<MonetaryAmount>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.subtract(rhs)
    }
}

impl std::ops::Sub for MonetaryAmount {
    type Output = NumericResult<MonetaryAmount>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.subtract(&rhs)
    }
}

impl std::ops::Neg for &MonetaryAmount {
    type Output = MonetaryAmount;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl std::ops::Neg for MonetaryAmount {
    type Output = MonetaryAmount;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl std::ops::Mul<i64> for &MonetaryAmount {
    type Output = NumericResult<MonetaryAmount>;

    fn mul(self, rhs: i64) -> Self::Output {
        self.multiply_int(rhs)
    }
}

impl std::ops::Div<i64> for &MonetaryAmount {
    type Output = NumericResult<MonetaryAmount>;

    /// `HalfEven` quotient with rounding error distribution.
    fn div(self, rhs: i64) -> Self::Output {
        self.multiply_ratio(1, rhs, RoundingMode::HalfEven)
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct AmountWire {
    currency: Currency,
    gross: i64,
    #[serde(default)]
    components: Vec<i64>,
}

#[cfg(feature = "serde")]
impl TryFrom<AmountWire> for MonetaryAmount {
    type Error = NumericError;

    fn try_from(wire: AmountWire) -> Result<Self, Self::Error> {
        Self::new(wire.currency, wire.gross, &wire.components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{Hundreds, MicroUnits, MilliUnits, Units};
    use proptest::prelude::*;

    fn eur() -> Currency {
        Currency::iso("EUR").unwrap()
    }

    fn jpy() -> Currency {
        Currency::iso("JPY").unwrap()
    }

    fn rate(percent: i64) -> Hundreds {
        Hundreds::of(percent).unwrap()
    }

    #[test]
    fn test_new_validates_breakdown() {
        assert!(MonetaryAmount::new(eur(), 1999, &[1680, 319]).is_ok());
        assert!(MonetaryAmount::new(eur(), 1999, &[]).is_ok());
        assert_eq!(
            MonetaryAmount::new(eur(), 100, &[50, 40]),
            Err(NumericError::SumInvariantViolated { gross: 100, sum: 90 })
        );
        assert_eq!(
            MonetaryAmount::new(eur(), 1_000_000_000_000_000_000, &[]),
            Err(NumericError::Overflow)
        );
    }

    #[test]
    fn test_from_value() {
        let amount = MonetaryAmount::from_value(Hundreds::of(1999).unwrap(), eur()).unwrap();
        assert_eq!(amount.gross(), 1999);
        let amount = MonetaryAmount::from_value(Units::of(5).unwrap(), eur()).unwrap();
        assert_eq!(amount.gross(), 500);
        assert_eq!(
            MonetaryAmount::from_value(MilliUnits::of(19_995).unwrap(), eur()),
            Err(NumericError::RoundingRequired)
        );
    }

    #[test]
    fn test_net_to_gross() {
        let net = MonetaryAmount::new(eur(), 1680, &[]).unwrap();
        let gross = net.net_to_gross(&[rate(19)]).unwrap();
        assert_eq!(gross.to_string(), "19.99 EUR [16.80, 3.19]");
        assert_eq!(gross.net(), Some(VariableUnits::new(1680, 2).unwrap()));
        assert_eq!(gross.taxes(), &[319]);
        assert_eq!(gross.gross_as_value(), VariableUnits::new(1999, 2).unwrap());

        assert_eq!(gross.net_to_gross(&[rate(7)]), Err(NumericError::ScaleMismatch));
        assert_eq!(net.net_to_gross::<Hundreds>(&[]), Ok(net.clone()));
    }

    #[test]
    fn test_gross_to_net() {
        let gross = MonetaryAmount::new(eur(), 1999, &[]).unwrap();
        let split = gross.gross_to_net(&[rate(19)]).unwrap();
        assert_eq!(split.components(), &[1680, 319]);
        assert_eq!(split.validate(), Ok(()));
    }

    #[test]
    fn test_gross_to_net_corrects_residual() {
        // 100.00 / 1.26 = 79.365 -> 79.37, taxes 15.08 and 5.56 overshoot by 0.01
        let gross = MonetaryAmount::new(eur(), 10_000, &[]).unwrap();
        let split = gross.gross_to_net(&[rate(19), rate(7)]).unwrap();
        assert_eq!(split.components(), &[7936, 1508, 556]);
        assert_eq!(split.gross(), 10_000);
    }

    #[test]
    fn test_add_and_subtract() {
        let a = MonetaryAmount::new(eur(), 1999, &[1680, 319]).unwrap();
        let b = MonetaryAmount::new(eur(), 119, &[100, 19]).unwrap();
        assert_eq!(a.add(&b).unwrap().components(), &[1780, 338]);
        assert_eq!(a.subtract(&b).unwrap().gross(), 1880);
        assert_eq!(a.add(&a.negate()).unwrap(), a.zero());

        let scalar = MonetaryAmount::new(eur(), 100, &[]).unwrap();
        assert_eq!(a.add(&scalar), Err(NumericError::ScaleMismatch));
        let yen = MonetaryAmount::new(jpy(), 100, &[]).unwrap();
        assert_eq!(
            scalar.add(&yen),
            Err(NumericError::InvalidCurrency("currencies don't match"))
        );
    }

    #[test]
    fn test_multiply_int() {
        let a = MonetaryAmount::new(eur(), 1999, &[1680, 319]).unwrap();
        assert_eq!(a.multiply_int(3).unwrap().to_string(), "59.97 EUR [50.40, 9.57]");
        assert_eq!(a.multiply_int(i64::MAX), Err(NumericError::Overflow));
    }

    #[test]
    fn test_multiply_ratio_distributes() {
        let a = MonetaryAmount::new(eur(), 100, &[50, 50]).unwrap();
        let quarter = a.multiply_ratio(1, 4, RoundingMode::HalfEven).unwrap();
        assert_eq!(quarter.gross(), 25);
        assert_eq!(quarter.components(), &[13, 12]);
        assert_eq!(quarter.validate(), Ok(()));
        assert_eq!(a.multiply_ratio(1, 0, RoundingMode::HalfEven), Err(NumericError::DivisionByZero));
    }

    #[test]
    fn test_multiply_by_decimal() {
        let a = MonetaryAmount::new(eur(), 3, &[1, 2]).unwrap();
        let half = a.multiply_by(Hundreds::of(50).unwrap()).unwrap();
        assert_eq!(half.gross(), 2);
        assert_eq!(half.components(), &[1, 1]);

        assert_eq!(a.multiply_by(Hundreds::ONE), Ok(a.clone()));
        assert_eq!(a.multiply_by(Hundreds::MINUS_ONE), Ok(a.negate()));
        assert_eq!(a.multiply_by(Hundreds::ZERO), Ok(a.zero()));
        assert_eq!(a.multiply_by(Units::of(2).unwrap()).unwrap().gross(), 6);
    }

    #[test]
    fn test_convert() {
        let a = MonetaryAmount::new(eur(), 1000, &[840, 160]).unwrap();
        let yen = a.convert(MicroUnits::of(161_234_567).unwrap(), jpy()).unwrap();
        assert_eq!(yen.to_string(), "1612 JPY [1354, 258]");

        let b = MonetaryAmount::new(jpy(), 100, &[]).unwrap();
        let back = b.convert(Units::of(2).unwrap(), eur()).unwrap();
        assert_eq!(back.to_string(), "200.00 EUR");
    }

    #[test]
    fn test_structural_equality() {
        let a = MonetaryAmount::new(eur(), 1999, &[1680, 319]).unwrap();
        let b = MonetaryAmount::new(eur(), 1999, &[1681, 318]).unwrap();
        let c = MonetaryAmount::new(eur(), 1999, &[]).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_display_without_breakdown() {
        let a = MonetaryAmount::new(eur(), -5, &[]).unwrap();
        assert_eq!(a.to_string(), "-0.05 EUR");
        assert_eq!(format!("{:?}", a), "MonetaryAmount(-0.05 EUR)");
    }

    #[test]
    fn test_checked_operators() {
        let a = MonetaryAmount::new(eur(), 1999, &[1680, 319]).unwrap();
        let b = MonetaryAmount::new(eur(), 119, &[100, 19]).unwrap();
        assert_eq!((&a + &b).unwrap().components(), &[1780, 338]);
        assert_eq!((&a - &b).unwrap().components(), &[1580, 300]);
        assert_eq!(-&a, a.negate());
        assert_eq!((&a * 3).unwrap().to_string(), "59.97 EUR [50.40, 9.57]");

        // 19.99 / 4 = 4.9975 -> 5.00, parts 4.20 and 0.7975 -> 0.80
        let quarter = (&a / 4).unwrap();
        assert_eq!(quarter.gross(), 500);
        assert_eq!(quarter.components(), &[420, 80]);
        assert_eq!(quarter.validate(), Ok(()));
        assert_eq!(&a / 0, Err(NumericError::DivisionByZero));

        let yen = MonetaryAmount::new(jpy(), 100, &[]).unwrap();
        let euro = MonetaryAmount::new(eur(), 100, &[]).unwrap();
        assert_eq!(
            euro.clone() + yen.clone(),
            Err(NumericError::InvalidCurrency("currencies don't match"))
        );
        assert_eq!(euro.clone() - euro.clone(), Ok(euro.zero()));
        assert_eq!(-euro.clone(), euro.negate());
    }

    fn breakdown(parts: &[i64]) -> MonetaryAmount {
        MonetaryAmount::new(eur(), parts.iter().sum(), parts).unwrap()
    }

    proptest! {
        #[test]
        fn prop_operations_keep_breakdown_consistent(
            pairs in prop::collection::vec((-1_000_000_000i64..1_000_000_000, -1_000_000_000i64..1_000_000_000), 1..5),
            numerator in 1i64..1000,
            denominator in 1i64..1000,
            factor in -5_000i64..5_000,
            rate in 1i64..500_000_000,
        ) {
            let left: Vec<i64> = pairs.iter().map(|(a, _)| *a).collect();
            let right: Vec<i64> = pairs.iter().map(|(_, b)| *b).collect();
            let a = breakdown(&left);
            let b = breakdown(&right);

            prop_assert_eq!(a.add(&b).unwrap().validate(), Ok(()));
            prop_assert_eq!(a.subtract(&b).unwrap().validate(), Ok(()));
            prop_assert_eq!(
                a.multiply_ratio(numerator, denominator, RoundingMode::HalfEven).unwrap().validate(),
                Ok(())
            );
            prop_assert_eq!(a.multiply_by(MilliUnits::of(factor).unwrap()).unwrap().validate(), Ok(()));
            prop_assert_eq!(a.multiply_by(Hundreds::of(factor).unwrap()).unwrap().validate(), Ok(()));
            prop_assert_eq!(a.convert(MicroUnits::of(rate).unwrap(), jpy()).unwrap().validate(), Ok(()));
        }

        #[test]
        fn prop_taxes_keep_breakdown_consistent(
            gross in -1_000_000_000_000i64..1_000_000_000_000,
            percents in prop::collection::vec(0i64..=30, 1..4),
        ) {
            let scalar = MonetaryAmount::new(eur(), gross, &[]).unwrap();
            let rates: Vec<Hundreds> = percents.iter().map(|p| rate(*p)).collect();

            let taxed = scalar.net_to_gross(&rates).unwrap();
            prop_assert_eq!(taxed.validate(), Ok(()));
            prop_assert_eq!(taxed.components()[0], gross);

            let split = scalar.gross_to_net(&rates).unwrap();
            prop_assert_eq!(split.validate(), Ok(()));
            prop_assert_eq!(split.gross(), gross);
            prop_assert_eq!(split.components().len(), rates.len() + 1);
        }
    }

    #[cfg(feature = "serde")]
    mod serde_tests {
        use super::*;

        #[test]
        fn test_round_trip() {
            let a = MonetaryAmount::new(eur(), 1999, &[1680, 319]).unwrap();
            let json = serde_json::to_string(&a).unwrap();
            assert_eq!(
                json,
                r#"{"currency":{"code":"EUR","decimals":2},"gross":1999,"components":[1680,319]}"#
            );
            assert_eq!(serde_json::from_str::<MonetaryAmount>(&json).unwrap(), a);
        }

        #[test]
        fn test_rejects_broken_breakdown() {
            let json = r#"{"currency":{"code":"EUR","decimals":2},"gross":1999,"components":[1680,318]}"#;
            assert!(serde_json::from_str::<MonetaryAmount>(json).is_err());
        }
    }
}
