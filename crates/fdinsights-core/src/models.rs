//! Domain models for FD Insights

use serde::{Deserialize, Deserializer, Serialize};

use crate::calculator;

/// Smallest principal accepted (INR)
pub const MIN_PRINCIPAL: f64 = 1000.0;

/// Annual rate must be strictly greater than this (percent)
pub const MIN_RATE_EXCLUSIVE: f64 = 0.1;

/// Largest annual rate accepted (percent)
pub const MAX_RATE: f64 = 25.0;

/// Shortest term accepted (years)
pub const MIN_TERM_YEARS: f64 = 1.0;

/// Longest term accepted (years)
pub const MAX_TERM_YEARS: f64 = 50.0;

/// How often interest is added to the principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompoundingFrequency {
    Monthly,
    #[default]
    Quarterly,
    Annually,
}

impl CompoundingFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annually => "annually",
        }
    }

    /// Human-readable label for select boxes and CLI output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Annually => "Annually",
        }
    }

    /// Compounding periods per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Monthly => 12,
            Self::Quarterly => 4,
            Self::Annually => 1,
        }
    }

    /// All frequencies, least frequent first
    pub fn all() -> &'static [CompoundingFrequency] {
        &[Self::Annually, Self::Quarterly, Self::Monthly]
    }
}

impl std::str::FromStr for CompoundingFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "12" => Ok(Self::Monthly),
            "quarterly" | "4" => Ok(Self::Quarterly),
            "annually" | "yearly" | "1" => Ok(Self::Annually),
            _ => Err(format!("Unknown compounding frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for CompoundingFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed deposit parameters as entered by the user
///
/// Field names follow the wire format (`principal`, `annualRate`, `termYears`,
/// `compoundingFrequency`). The older form names `fdAmount`, `interestRate` and
/// `period` are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentParameters {
    /// Amount invested (INR)
    #[serde(alias = "fdAmount")]
    pub principal: f64,
    /// Annual interest rate in percent
    #[serde(alias = "interestRate")]
    pub annual_rate: f64,
    /// Term in years
    #[serde(alias = "period")]
    pub term_years: f64,
    pub compounding_frequency: CompoundingFrequency,
}

impl Default for InvestmentParameters {
    /// The calculator form's initial values
    fn default() -> Self {
        Self {
            principal: 50_000.0,
            annual_rate: 6.5,
            term_years: 5.0,
            compounding_frequency: CompoundingFrequency::Quarterly,
        }
    }
}

impl InvestmentParameters {
    pub fn new(
        principal: f64,
        annual_rate: f64,
        term_years: f64,
        compounding_frequency: CompoundingFrequency,
    ) -> Self {
        Self {
            principal,
            annual_rate,
            term_years,
            compounding_frequency,
        }
    }

    /// Check every field against its declared range
    pub fn validate(&self) -> std::result::Result<ValidParameters, ValidationErrors> {
        ParameterInput::from(*self).validate()
    }
}

/// Untrusted parameter input, as received at a boundary
///
/// Every field is optional and the frequency is kept as text so that a missing
/// or unknown value becomes a field error instead of a deserialization failure.
/// Numeric fields also accept numbers written as strings (`"50000"`), as form
/// posts send them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInput {
    #[serde(default, alias = "fdAmount", deserialize_with = "number_or_text")]
    pub principal: Option<f64>,
    #[serde(default, alias = "interestRate", deserialize_with = "number_or_text")]
    pub annual_rate: Option<f64>,
    #[serde(default, alias = "period", deserialize_with = "number_or_text")]
    pub term_years: Option<f64>,
    #[serde(default)]
    pub compounding_frequency: Option<String>,
}

/// Accept a JSON number or numeric text; blank text counts as missing and
/// other text becomes NaN so validation reports it against the field
fn number_or_text<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Number(v)) => Some(v),
        Some(Raw::Text(text)) => match text.trim() {
            "" => None,
            t => Some(t.parse().unwrap_or(f64::NAN)),
        },
    })
}

impl From<InvestmentParameters> for ParameterInput {
    fn from(params: InvestmentParameters) -> Self {
        Self {
            principal: Some(params.principal),
            annual_rate: Some(params.annual_rate),
            term_years: Some(params.term_years),
            compounding_frequency: Some(params.compounding_frequency.as_str().to_string()),
        }
    }
}

impl ParameterInput {
    /// Validate all fields at once
    ///
    /// Collects every field error rather than stopping at the first, so a form
    /// can mark each offending input.
    pub fn validate(&self) -> std::result::Result<ValidParameters, ValidationErrors> {
        let mut errors = Vec::new();

        let principal = match self.principal {
            None => {
                errors.push(FieldError::new("principal", "Principal amount is required."));
                None
            }
            Some(v) if !v.is_finite() => {
                errors.push(FieldError::new("principal", "Principal amount must be a number."));
                None
            }
            Some(v) if v < MIN_PRINCIPAL => {
                errors.push(FieldError::new(
                    "principal",
                    "Principal amount must be at least ₹1,000.",
                ));
                None
            }
            Some(v) => Some(v),
        };

        let annual_rate = match self.annual_rate {
            None => {
                errors.push(FieldError::new("annualRate", "Interest rate is required."));
                None
            }
            Some(v) if !v.is_finite() => {
                errors.push(FieldError::new("annualRate", "Interest rate must be a number."));
                None
            }
            Some(v) if v <= MIN_RATE_EXCLUSIVE => {
                errors.push(FieldError::new("annualRate", "Interest rate must be positive."));
                None
            }
            Some(v) if v > MAX_RATE => {
                errors.push(FieldError::new("annualRate", "Interest rate seems too high."));
                None
            }
            Some(v) => Some(v),
        };

        let term_years = match self.term_years {
            None => {
                errors.push(FieldError::new("termYears", "Period is required."));
                None
            }
            Some(v) if !v.is_finite() => {
                errors.push(FieldError::new("termYears", "Period must be a number."));
                None
            }
            Some(v) if v < MIN_TERM_YEARS => {
                errors.push(FieldError::new("termYears", "Period must be at least 1 year."));
                None
            }
            Some(v) if v > MAX_TERM_YEARS => {
                errors.push(FieldError::new("termYears", "Period cannot exceed 50 years."));
                None
            }
            Some(v) => Some(v),
        };

        let compounding_frequency = match self.compounding_frequency.as_deref() {
            None => {
                errors.push(FieldError::new(
                    "compoundingFrequency",
                    "Compounding frequency is required.",
                ));
                None
            }
            // Only the canonical names are accepted at the boundary
            Some(s) => match s {
                "monthly" => Some(CompoundingFrequency::Monthly),
                "quarterly" => Some(CompoundingFrequency::Quarterly),
                "annually" => Some(CompoundingFrequency::Annually),
                _ => {
                    errors.push(FieldError::new(
                        "compoundingFrequency",
                        "Compounding frequency must be monthly, quarterly or annually.",
                    ));
                    None
                }
            },
        };

        match (principal, annual_rate, term_years, compounding_frequency) {
            (Some(principal), Some(annual_rate), Some(term_years), Some(compounding_frequency))
                if errors.is_empty() =>
            {
                // Ranges are checked per field; the product must still fit in an f64
                let maturity = principal
                    * calculator::growth_factor(annual_rate, term_years, compounding_frequency);
                if !maturity.is_finite() {
                    return Err(ValidationErrors(vec![FieldError::new(
                        "principal",
                        "Principal amount is too large.",
                    )]));
                }
                Ok(ValidParameters(InvestmentParameters {
                    principal,
                    annual_rate,
                    term_years,
                    compounding_frequency,
                }))
            }
            _ => Err(ValidationErrors(errors)),
        }
    }
}

/// Parameters that passed range validation
///
/// Only obtainable through [`InvestmentParameters::validate`] or
/// [`ParameterInput::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidParameters(InvestmentParameters);

impl ValidParameters {
    pub fn principal(&self) -> f64 {
        self.0.principal
    }

    pub fn annual_rate(&self) -> f64 {
        self.0.annual_rate
    }

    pub fn term_years(&self) -> f64 {
        self.0.term_years
    }

    pub fn compounding_frequency(&self) -> CompoundingFrequency {
        self.0.compounding_frequency
    }

    pub fn into_inner(self) -> InvestmentParameters {
        self.0
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Wire name of the field (e.g. `annualRate`)
    pub field: String,
    /// Message suitable for display next to the input
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// All field errors from one validation pass (never empty)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// Message for a given field, if it was rejected
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.message_for(field).is_some()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Output of the compounding calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub principal: f64,
    /// Principal plus accrued interest at the end of the term
    pub maturity_amount: f64,
    /// `maturity_amount - principal`
    pub total_interest: f64,
    pub periods_per_year: u32,
    /// Total compounding periods over the term (`periods_per_year * term_years`)
    pub periods: f64,
}
