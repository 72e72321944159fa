//! Compound interest calculator
//!
//! Discrete compounding over the term:
//!
//! ```text
//! n        = periods per year
//! maturity = principal * (1 + rate / 100 / n) ^ (n * years)
//! interest = maturity - principal
//! ```
//!
//! No rounding is applied; formatting is left to the presentation layer
//! (see [`crate::format`]).

use std::time::Duration;

use crate::models::{CalculationResult, CompoundingFrequency, ValidParameters};

/// Factor by which the principal grows over the term
pub(crate) fn growth_factor(
    annual_rate: f64,
    term_years: f64,
    frequency: CompoundingFrequency,
) -> f64 {
    let n = f64::from(frequency.periods_per_year());
    (1.0 + annual_rate / 100.0 / n).powf(n * term_years)
}

/// Compute maturity amount and total interest
pub fn calculate(params: &ValidParameters) -> CalculationResult {
    let principal = params.principal();
    let frequency = params.compounding_frequency();
    let n = frequency.periods_per_year();
    let periods = f64::from(n) * params.term_years();

    let maturity_amount =
        principal * growth_factor(params.annual_rate(), params.term_years(), frequency);

    CalculationResult {
        principal,
        maturity_amount,
        total_interest: maturity_amount - principal,
        periods_per_year: n,
        periods,
    }
}

/// Compute after a cosmetic delay
///
/// The delay only drives loading indicators; a zero delay returns immediately.
pub async fn calculate_with_delay(params: &ValidParameters, delay: Duration) -> CalculationResult {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    calculate(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompoundingFrequency, InvestmentParameters};

    fn valid(principal: f64, rate: f64, years: f64, freq: CompoundingFrequency) -> ValidParameters {
        InvestmentParameters::new(principal, rate, years, freq)
            .validate()
            .unwrap()
    }

    #[test]
    fn test_reference_quarterly_scenario() {
        let result = calculate(&valid(50_000.0, 6.5, 5.0, CompoundingFrequency::Quarterly));

        // 50000 * (1 + 0.065 / 4) ^ 20
        assert!((result.maturity_amount - 69_020.99).abs() < 0.01);
        assert!((result.total_interest - 19_020.99).abs() < 0.01);
        assert_eq!(result.periods_per_year, 4);
        assert_eq!(result.periods, 20.0);
    }

    #[test]
    fn test_annual_compounding_matches_simple_power() {
        let result = calculate(&valid(10_000.0, 10.0, 2.0, CompoundingFrequency::Annually));
        assert!((result.maturity_amount - 12_100.0).abs() < 1e-9);
        assert!((result.total_interest - 2_100.0).abs() < 1e-9);
    }

    #[test]
    fn test_interest_is_exact_difference() {
        for &freq in CompoundingFrequency::all() {
            let result = calculate(&valid(123_456.78, 7.25, 13.0, freq));
            assert_eq!(result.total_interest, result.maturity_amount - result.principal);
            assert!(result.maturity_amount >= result.principal);
        }
    }

    #[test]
    fn test_more_frequent_compounding_never_yields_less() {
        let grid = [
            (1_000.0, 0.11, 1.0),
            (50_000.0, 6.5, 5.0),
            (250_000.0, 25.0, 50.0),
            (1_500.0, 3.3, 17.5),
        ];
        for (principal, rate, years) in grid {
            let annual = calculate(&valid(principal, rate, years, CompoundingFrequency::Annually));
            let quarterly =
                calculate(&valid(principal, rate, years, CompoundingFrequency::Quarterly));
            let monthly = calculate(&valid(principal, rate, years, CompoundingFrequency::Monthly));

            assert!(monthly.maturity_amount >= quarterly.maturity_amount);
            assert!(quarterly.maturity_amount >= annual.maturity_amount);
        }
    }

    #[test]
    fn test_repeated_calls_are_bit_identical() {
        let params = valid(77_777.0, 8.8, 9.0, CompoundingFrequency::Monthly);
        let a = calculate(&params);
        let b = calculate(&params);
        assert_eq!(a.maturity_amount.to_bits(), b.maturity_amount.to_bits());
        assert_eq!(a.total_interest.to_bits(), b.total_interest.to_bits());
    }

    #[test]
    fn test_validated_inputs_give_finite_results() {
        let principals = [1_000.0, 1e12, 1e300, 1e305, f64::MAX];
        let mut accepted = 0;
        for principal in principals {
            for rate in [0.11, 25.0] {
                for years in [1.0, 50.0] {
                    for &freq in CompoundingFrequency::all() {
                        let Ok(params) =
                            InvestmentParameters::new(principal, rate, years, freq).validate()
                        else {
                            continue;
                        };
                        accepted += 1;
                        let result = calculate(&params);
                        assert!(result.maturity_amount.is_finite());
                        assert!(result.total_interest.is_finite());
                    }
                }
            }
        }
        assert!(accepted > 0);

        // Highest rate, longest term, monthly: 1e300 fits, 1e305 overflows
        assert!(InvestmentParameters::new(1e300, 25.0, 50.0, CompoundingFrequency::Monthly)
            .validate()
            .is_ok());
        assert!(InvestmentParameters::new(1e305, 25.0, 50.0, CompoundingFrequency::Monthly)
            .validate()
            .is_err());
    }

    #[tokio::test]
    async fn test_delayed_calculation_matches() {
        let params = valid(50_000.0, 6.5, 5.0, CompoundingFrequency::Quarterly);
        let delayed = calculate_with_delay(&params, Duration::from_millis(5)).await;
        assert_eq!(delayed, calculate(&params));
    }
}
