// ============================================================================
// Rounding Error Distribution
// Rescaling of a total and its parts so that the parts still add up
// ============================================================================
//
// Input vectors hold the total at index 0 and its parts at 1..n. Each
// element is rounded on its own first; any remaining discrepancy between
// the rounded total and the sum of the rounded parts is then absorbed one
// unit at a time by the elements whose rounding went the "wrong" way,
// largest relative error first.

use super::errors::{NumericError, NumericResult};
use super::rounding::RoundingMode;
use super::scaled::{check_mantissa, POWERS_OF_TEN};
use crate::wide::{self, WideQuotient};
use smallvec::SmallVec;

/// A total followed by its parts, inline for up to eight elements.
pub type Breakdown = SmallVec<[i64; 8]>;

/// `values[0] - sum(values[1..])`, or overflow.
pub(crate) fn discrepancy(values: &[i64]) -> NumericResult<i64> {
    let Some((total, parts)) = values.split_first() else {
        return Ok(0);
    };
    let sum = parts
        .iter()
        .try_fold(0i64, |acc, v| acc.checked_add(*v))
        .ok_or(NumericError::Overflow)?;
    total.checked_sub(sum).ok_or(NumericError::Overflow)
}

fn require_sum(values: &[i64]) -> NumericResult<()> {
    match discrepancy(values)? {
        0 => Ok(()),
        diff => Err(NumericError::SumInvariantViolated {
            gross: values[0],
            sum: values[0] - diff,
        }),
    }
}

/// Rescale `unscaled` (mantissas at `source_scale`) to `target_scale`.
///
/// Scaling up is an exact multiplication. Scaling down rounds every element
/// with `HalfEven` and then distributes the rounding error, so that
/// `result[0] == sum(result[1..])` holds whenever it held for the input.
///
/// # Errors
/// - `SumInvariantViolated` if the input does not add up
/// - `Overflow` if a rescaled element leaves the 18-digit range
pub fn scale_with_error_distribution(
    unscaled: &[i64],
    source_scale: u8,
    target_scale: u8,
) -> NumericResult<Breakdown> {
    require_sum(unscaled)?;
    if target_scale >= source_scale {
        let factor = POWERS_OF_TEN
            .get(usize::from(target_scale - source_scale))
            .copied()
            .ok_or(NumericError::Overflow)?;
        return unscaled
            .iter()
            .map(|v| v.checked_mul(factor).ok_or(NumericError::Overflow).and_then(check_mantissa))
            .collect();
    }
    let factor = POWERS_OF_TEN
        .get(usize::from(source_scale - target_scale))
        .copied()
        .ok_or(NumericError::Overflow)?;
    distribute_ratio(unscaled, 1, factor, RoundingMode::HalfEven)
}

/// Multiply every element by `numerator / denominator`, rounding each with
/// `mode`, then distribute the rounding error across the elements.
///
/// The input must satisfy `values[0] == sum(values[1..])`; so does the
/// output. Every output element differs from its exact product by less
/// than one unit.
pub fn distribute_ratio(
    values: &[i64],
    numerator: i64,
    denominator: i64,
    mode: RoundingMode,
) -> NumericResult<Breakdown> {
    require_sum(values)?;
    let backend = wide::backend();

    let exact: SmallVec<[WideQuotient; 8]> = values
        .iter()
        .map(|v| wide::wide_quotient(backend, *v, numerator, denominator))
        .collect::<NumericResult<_>>()?;
    let mut scaled: Breakdown = exact
        .iter()
        .map(|q| q.round(mode).and_then(check_mantissa))
        .collect::<NumericResult<_>>()?;

    let mut diff = discrepancy(&scaled)?;
    if diff == 0 {
        return Ok(scaled);
    }

    let adjustment: i64 = if diff > 0 { 1 } else { -1 };
    tracing::debug!(
        discrepancy = diff,
        elements = values.len(),
        "distributing rounding error"
    );

    let mut weights: SmallVec<[f64; 8]> = exact
        .iter()
        .zip(scaled.iter())
        .enumerate()
        .map(|(i, (q, rounded))| {
            let position: i64 = if i > 0 { 1 } else { -1 };
            if error_sign(q, *rounded) * adjustment * position > 0 {
                relative_error(q, *rounded)
            } else {
                0.0
            }
        })
        .collect();

    while diff != 0 {
        let mut picked = None;
        let mut worst = 0.0;
        for (i, weight) in weights.iter().enumerate() {
            if *weight > worst {
                worst = *weight;
                picked = Some(i);
            }
        }
        let Some(index) = picked else {
            return Err(NumericError::SumInvariantViolated {
                gross: scaled[0],
                sum: scaled[0] - diff,
            });
        };
        weights[index] = 0.0;
        let step = if index > 0 { adjustment } else { -adjustment };
        scaled[index] = check_mantissa(scaled[index] + step)?;
        tracing::trace!(index, step, "adjusted element");
        diff -= adjustment;
    }
    Ok(scaled)
}

/// Sign of `exact - rounded`.
fn error_sign(exact: &WideQuotient, rounded: i64) -> i64 {
    if exact.remainder == 0 {
        return 0;
    }
    let moved_away = rounded.unsigned_abs() != exact.quotient;
    let value_sign = if exact.negative { -1 } else { 1 };
    if moved_away {
        -value_sign
    } else {
        value_sign
    }
}

/// Rounding error relative to the exact value, or the exact value itself
/// when it rounded to zero.
fn relative_error(exact: &WideQuotient, rounded: i64) -> f64 {
    let fraction = exact.remainder as f64 / exact.divisor as f64;
    if rounded == 0 {
        return fraction + exact.quotient as f64;
    }
    let error = if rounded.unsigned_abs() != exact.quotient {
        1.0 - fraction
    } else {
        fraction
    };
    error / exact.as_f64().abs()
}
