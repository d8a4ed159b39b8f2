//! Derived values computed from combinations of manifest fields

use crate::manifest::{fields, ManifestDocument};
use crate::{ConvertError, Result};

/// Price assumed when the manifest has no `<price>`
pub const DEFAULT_PRICE: &str = "0.00";

/// Name fragments that mark a package as hidden
const HIDDEN_NAME_MARKERS: [&str; 2] = ["lite", "trial"];

/// Values that are not copied from the input but computed from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedValues {
    /// Whether the package is hidden from listings
    pub hidden: bool,

    /// Parsed price; the raw text is what gets written out
    pub price: f64,
}

impl DerivedValues {
    /// A trial block is written only for priced packages
    pub fn has_trial(&self) -> bool {
        self.price > 0.0
    }
}

/// Compute the visibility flag and numeric price of a manifest.
///
/// Fails with `MissingRequiredField` when `<name>` is absent and with
/// `InvalidNumericField` when `<price>` is not a decimal number, in that order.
pub fn derive(doc: &ManifestDocument) -> Result<DerivedValues> {
    let name = doc
        .name()
        .ok_or_else(|| ConvertError::MissingRequiredField(fields::NAME.to_string()))?;

    let hidden = name_marks_hidden(&name)
        || doc
            .hidden()
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));

    let price = parse_price(doc.price().as_deref().unwrap_or(DEFAULT_PRICE))?;

    tracing::trace!(name = %name, hidden, price, "Derived manifest values");

    Ok(DerivedValues { hidden, price })
}

/// Ordinal, ASCII-only case-insensitive match; never locale-aware
fn name_marks_hidden(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    HIDDEN_NAME_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Parse the trimmed price text; `inf`, `nan` and overflowing values are rejected
fn parse_price(text: &str) -> Result<f64> {
    let invalid = |reason: String| ConvertError::InvalidNumericField {
        field: fields::PRICE.to_string(),
        value: text.to_string(),
        reason,
    };

    let price = text
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(e.to_string()))?;
    if !price.is_finite() {
        return Err(invalid("not a finite number".to_string()));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> ManifestDocument {
        ManifestDocument::parse(&format!("<manifest>{}</manifest>", body)).unwrap()
    }

    #[test]
    fn test_lite_name_is_hidden() {
        let values = derive(&doc("<name>My Game LITE</name>")).unwrap();
        assert!(values.hidden);
    }

    #[test]
    fn test_trial_name_is_hidden() {
        let values = derive(&doc("<name>TrialEdition</name>")).unwrap();
        assert!(values.hidden);
    }

    #[test]
    fn test_plain_name_not_hidden() {
        let values = derive(&doc("<name>Full Game</name>")).unwrap();
        assert!(!values.hidden);
    }

    #[test]
    fn test_hidden_flag_case_insensitive() {
        let values = derive(&doc("<name>Full Game</name><hidden>TRUE</hidden>")).unwrap();
        assert!(values.hidden);
    }

    #[test]
    fn test_hidden_flag_other_values() {
        for value in ["false", "yes", "1", " true"] {
            let body = format!("<name>Full Game</name><hidden>{}</hidden>", value);
            assert!(!derive(&doc(&body)).unwrap().hidden, "hidden = {:?}", value);
        }
    }

    #[test]
    fn test_non_ascii_case_folding_ignored() {
        // Dotless i does not fold to ASCII 'i'
        let values = derive(&doc("<name>L\u{131}te</name>")).unwrap();
        assert!(!values.hidden);
    }

    #[test]
    fn test_price_defaults_to_zero() {
        let values = derive(&doc("<name>Free</name>")).unwrap();
        assert_eq!(values.price, 0.0);
        assert!(!values.has_trial());
    }

    #[test]
    fn test_price_parsed() {
        let values = derive(&doc("<name>Paid</name><price> 4.99 </price>")).unwrap();
        assert_eq!(values.price, 4.99);
        assert!(values.has_trial());
    }

    #[test]
    fn test_zero_and_negative_price_have_no_trial() {
        assert!(!derive(&doc("<name>a</name><price>0</price>")).unwrap().has_trial());
        assert!(!derive(&doc("<name>a</name><price>-1</price>")).unwrap().has_trial());
    }

    #[test]
    fn test_invalid_price() {
        let err = derive(&doc("<name>Paid</name><price>free</price>")).unwrap_err();
        match err {
            ConvertError::InvalidNumericField { field, value, .. } => {
                assert_eq!(field, "price");
                assert_eq!(value, "free");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_price_is_invalid() {
        for value in ["inf", "-Infinity", "NaN", "1e400"] {
            let body = format!("<name>Paid</name><price>{}</price>", value);
            let err = derive(&doc(&body)).unwrap_err();
            assert!(
                matches!(err, ConvertError::InvalidNumericField { .. }),
                "price = {:?}",
                value
            );
        }
    }

    #[test]
    fn test_thousands_separator_is_invalid() {
        let err = derive(&doc("<name>Paid</name><price>1,299.00</price>")).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidNumericField { .. }));
    }

    #[test]
    fn test_empty_price_is_invalid() {
        let err = derive(&doc("<name>Paid</name><price/>")).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidNumericField { .. }));
    }

    #[test]
    fn test_missing_name() {
        let err = derive(&doc("<price>1.00</price>")).unwrap_err();
        assert!(matches!(err, ConvertError::MissingRequiredField(ref f) if f == "name"));
    }

    #[test]
    fn test_missing_name_reported_before_bad_price() {
        let err = derive(&doc("<price>oops</price>")).unwrap_err();
        assert!(matches!(err, ConvertError::MissingRequiredField(_)));
    }

    #[test]
    fn test_empty_name_is_allowed() {
        let values = derive(&doc("<name/>")).unwrap();
        assert!(!values.hidden);
    }
}
