//! Duplication detection over a normalized stylesheet.
//!
//! # Passes
//!
//! - **Type I**: literally equal declarations in different selectors
//! - **Type II**: equivalent declarations that are not literally equal
//! - **Type III**: a shorthand in one selector duplicating longhands in
//!   another
//! - **Type IV-A**: structurally equal selectors
//! - **Type IV-B**: different selectors matching the same elements of a
//!   document
//!
//! The declaration passes also build [`Item`]s, the input of an external
//! frequent-itemset miner ([`ItemsetMiner`]).
//!
//! ```
//! use sift_duplication::{AnalysisOptions, DuplicationKind, analyze};
//!
//! let report = analyze(
//!     ".a { color: red } .b { color: #f00 } .a { margin: 0 }",
//!     AnalysisOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(report.count(DuplicationKind::EquivalentDeclarations), 1);
//! assert_eq!(report.count(DuplicationKind::IdenticalSelectors), 1);
//! ```

/// The detector and its passes.
pub mod detector;
/// Error types.
pub mod error;
/// Duplication instances.
pub mod instance;
/// Items and the per-selector item sets.
pub mod items;
/// The itemset-miner contract.
pub mod miner;
/// Analysis options.
pub mod options;
/// Serializable results.
pub mod report;

pub use detector::DuplicationDetector;
pub use error::AnalysisError;
pub use instance::{DeclarationRef, DuplicationIncidents, DuplicationInstance, DuplicationKind};
pub use items::{Item, ItemId, ItemRegistry, ItemSet, ItemSignature};
pub use miner::{FrequentItemset, ItemsetMiner};
pub use options::AnalysisOptions;
pub use report::{DuplicationReport, ReportedInstance, ReportedItem};

/// Parse `css` and run every pass except Type IV-B.
///
/// # Errors
///
/// [`AnalysisError::Css`] if the stylesheet cannot be built, or
/// [`AnalysisError::InvalidOptions`].
pub fn analyze(css: &str, options: AnalysisOptions) -> Result<DuplicationReport, AnalysisError> {
    options.validate()?;
    let mut sheet = sift_css::parse_stylesheet(css)?;
    DuplicationDetector::new(&mut sheet, options).run_all()
}
