// Transaction input model, form parsing and quick presets.

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// One card transaction as submitted for analysis.
///
/// `time_offset` is seconds elapsed since the first transaction in the
/// dataset; `v1..v4` are anonymized PCA components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub amount: f64,
    pub time_offset: f64,
    pub v1: f64,
    pub v2: f64,
    pub v3: f64,
    pub v4: f64,
}

impl TransactionInput {
    pub fn new(amount: f64, time_offset: f64, pca: [f64; 4]) -> Self {
        Self {
            amount,
            time_offset,
            v1: pca[0],
            v2: pca[1],
            v3: pca[2],
            v4: pca[3],
        }
    }

    pub fn pca(&self) -> [f64; 4] {
        [self.v1, self.v2, self.v3, self.v4]
    }
}

/// Raw, user-typed form values. Every field is a string until `parse`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionForm {
    pub amount: String,
    pub time: String,
    pub v1: String,
    pub v2: String,
    pub v3: String,
    pub v4: String,
}

impl TransactionForm {
    /// Validate and convert the form.
    ///
    /// Amount and time are required and must be non-negative. The PCA
    /// fields default to 0 when left blank.
    pub fn parse(&self) -> Result<TransactionInput, FormError> {
        let amount = parse_required("amount", &self.amount)?;
        let time_offset = parse_required("time", &self.time)?;
        Ok(TransactionInput {
            amount,
            time_offset,
            v1: parse_optional("v1", &self.v1)?,
            v2: parse_optional("v2", &self.v2)?,
            v3: parse_optional("v3", &self.v3)?,
            v4: parse_optional("v4", &self.v4)?,
        })
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, FormError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FormError::NotANumber { field }),
    }
}

fn parse_required(field: &'static str, raw: &str) -> Result<f64, FormError> {
    if raw.trim().is_empty() {
        return Err(FormError::Missing { field });
    }
    let value = parse_number(field, raw)?;
    if value < 0.0 {
        return Err(FormError::Negative { field });
    }
    Ok(value)
}

fn parse_optional(field: &'static str, raw: &str) -> Result<f64, FormError> {
    if raw.trim().is_empty() {
        return Ok(0.0);
    }
    parse_number(field, raw)
}

// =============================================================================
// Presets
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub slug: &'static str,
    values: [&'static str; 6],
}

impl Preset {
    pub fn form(&self) -> TransactionForm {
        let [amount, time, v1, v2, v3, v4] = self.values;
        TransactionForm {
            amount: amount.to_string(),
            time: time.to_string(),
            v1: v1.to_string(),
            v2: v2.to_string(),
            v3: v3.to_string(),
            v4: v4.to_string(),
        }
    }

    pub fn input(&self) -> Result<TransactionInput, FormError> {
        self.form().parse()
    }
}

pub static PRESETS: [Preset; 3] = [
    Preset {
        name: "Low Amount",
        slug: "low-amount",
        values: ["50.75", "5400", "-1.3598", "1.1918", "0.2661", "0.1664"],
    },
    Preset {
        name: "High Amount",
        slug: "high-amount",
        values: ["3500.00", "25000", "-2.7871", "-0.3274", "1.0787", "-0.7080"],
    },
    Preset {
        name: "Suspicious",
        slug: "suspicious",
        values: ["2150.33", "10800", "-4.7359", "-3.5230", "-5.3104", "-1.9271"],
    },
];

pub fn presets() -> &'static [Preset] {
    &PRESETS
}

/// Look up a preset by slug or display name, case-insensitively.
pub fn find_preset(key: &str) -> Option<&'static Preset> {
    let key = key.trim();
    PRESETS
        .iter()
        .find(|p| p.slug.eq_ignore_ascii_case(key) || p.name.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(amount: &str, time: &str) -> TransactionForm {
        TransactionForm {
            amount: amount.to_string(),
            time: time.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_blank_pca_fields_default_to_zero() {
        let input = form("12.5", "300").parse().unwrap();
        assert_eq!(input.amount, 12.5);
        assert_eq!(input.time_offset, 300.0);
        assert_eq!(input.pca(), [0.0; 4]);
    }

    #[test]
    fn test_missing_amount_rejected() {
        let err = form("  ", "300").parse().unwrap_err();
        assert_eq!(err, FormError::Missing { field: "amount" });
    }

    #[test]
    fn test_negative_time_rejected() {
        let err = form("10", "-1").parse().unwrap_err();
        assert_eq!(err, FormError::Negative { field: "time" });
    }

    #[test]
    fn test_garbage_and_non_finite_rejected() {
        assert_eq!(
            form("abc", "1").parse().unwrap_err(),
            FormError::NotANumber { field: "amount" }
        );
        let mut f = form("1", "1");
        f.v3 = "NaN".to_string();
        assert_eq!(f.parse().unwrap_err(), FormError::NotANumber { field: "v3" });
        f.v3 = "inf".to_string();
        assert_eq!(f.parse().unwrap_err(), FormError::NotANumber { field: "v3" });
    }

    #[test]
    fn test_whitespace_trimmed() {
        let mut f = form(" 99.5 ", "\t10");
        f.v1 = " -2.5 ".to_string();
        let input = f.parse().unwrap();
        assert_eq!(input.amount, 99.5);
        assert_eq!(input.v1, -2.5);
    }

    #[test]
    fn test_presets_parse() {
        for preset in presets() {
            let input = preset.input().unwrap();
            assert!(input.amount > 0.0, "{} should have an amount", preset.name);
        }
        let suspicious = find_preset("Suspicious").unwrap().input().unwrap();
        assert_eq!(suspicious.v1, -4.7359);
        assert_eq!(suspicious.v2, -3.5230);
        assert!(find_preset("HIGH-AMOUNT").is_some());
        assert!(find_preset("nope").is_none());
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let input = TransactionInput::new(1.0, 2.0, [0.0; 4]);
        let json = serde_json::to_value(input).unwrap();
        assert_eq!(json["timeOffset"], 2.0);
    }
}
