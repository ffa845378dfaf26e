//! Name-variation heuristic for nested stack discovery.
//!
//! Sub-templates produced by stack splitting are opaque at patch time: their
//! resources are not part of the compiled graph. A function that moved into
//! one is recognised only by the nested stack's logical id containing a
//! recognisable form of the function's name.

use lambda_logging_types::ServiceTarget;

/// The five name forms a nested stack id is tested against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameVariations([String; 5]);

impl NameVariations {
    /// Derive the variations of `function_id` under `target`.
    ///
    /// Underscores in the function id are replaced with `-` first. With
    /// `f` the result and service `s`, stage `t`, the forms are:
    /// `f`, `ft`, `f-t`, `sf`, `s-t-f`.
    pub fn new(function_id: &str, target: &ServiceTarget) -> Self {
        let f = function_id.replace('_', "-");
        let service = &target.service;
        let stage = &target.stage;
        Self([
            f.clone(),
            format!("{}{}", f, stage),
            format!("{}-{}", f, stage),
            format!("{}{}", service, f),
            format!("{}-{}-{}", service, stage, f),
        ])
    }

    /// The variations, in order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Whether a nested stack with logical id `candidate` plausibly holds the
/// function the variations were derived from.
pub fn matches_nested_stack(candidate: &str, variations: &[String]) -> bool {
    variations
        .iter()
        .any(|variation| !variation.is_empty() && candidate.contains(variation.as_str()))
}
