//! Analysis configuration.

use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// Switches shared by every detection pass.
///
/// Missing JSON fields take their default:
///
/// ```json
/// {
///   "consider_media_queries": true,
///   "ignore_vendor_prefixes": false,
///   "min_support": 2,
///   "report_equivalent_selectors": true
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalysisOptions {
    /// Declarations and selectors in different `@media` contexts never
    /// duplicate each other.
    pub consider_media_queries: bool,
    /// Compare `-webkit-transition` and `transition` as the same property.
    pub ignore_vendor_prefixes: bool,
    /// Fewest selectors an item, or a mined itemset, must occur in.
    pub min_support: usize,
    /// Run Type IV-B when a document is bound.
    pub report_equivalent_selectors: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            consider_media_queries: true,
            ignore_vendor_prefixes: false,
            min_support: 2,
            report_equivalent_selectors: true,
        }
    }
}

impl AnalysisOptions {
    /// Read options from JSON.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::Json`] for malformed JSON or unknown
    /// fields; [`AnalysisError::InvalidOptions`] when the values fail
    /// [`AnalysisOptions::validate`].
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check the values can drive an analysis.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidOptions`] when `min_support` is zero.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.min_support == 0 {
            return Err(AnalysisError::InvalidOptions {
                reason: "min_support must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let options = AnalysisOptions::from_json(r#"{ "min_support": 3 }"#).unwrap();
        assert_eq!(
            options,
            AnalysisOptions {
                min_support: 3,
                ..AnalysisOptions::default()
            }
        );
    }

    #[test]
    fn test_rejects_bad_options() {
        assert!(matches!(
            AnalysisOptions::from_json(r#"{ "min_support": 0 }"#),
            Err(AnalysisError::InvalidOptions { .. })
        ));
        assert!(matches!(
            AnalysisOptions::from_json(r#"{ "min_suport": 2 }"#),
            Err(AnalysisError::Json(_))
        ));
    }
}
