//! Compiler configuration.
//!
//! Every field has a serde default, so a partial `[compiler]` table (or none
//! at all) yields a working compiler.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::facets::FacetDimension;

/// How free text becomes a relevance query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStrategy {
    /// `multi_match` over analyzed and exact field sets; text is sent as data.
    #[default]
    Structured,
    /// Legacy Lucene `query_string` with reserved-character escaping.
    QueryString,
}

/// How facet counts relate to the applied filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetMode {
    /// Each facet reflects every applied filter except its own.
    #[default]
    Filtered,
    /// Catalog filter moves to `post_filter`; only the catalog facet is planned.
    Browse,
}

/// Decay curve used for the recency boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayFunction {
    #[default]
    Gauss,
    Exp,
    Linear,
}

impl DecayFunction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gauss => "gauss",
            Self::Exp => "exp",
            Self::Linear => "linear",
        }
    }
}

/// Per-rank text field boosts (artist, title, label/catalogue number).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub primary: u32,
    pub secondary: u32,
    pub tertiary: u32,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            primary: 3,
            secondary: 2,
            tertiary: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub min_score: f64,
    /// Boost applied to the exact-match branch of the structured text query.
    pub exact_boost: f64,
    pub field_weights: FieldWeights,
    /// Constant weight summed with the decay function.
    pub boost_factor: f64,
    pub decay_function: DecayFunction,
    pub decay_scale: String,
    /// Taxon id that the `recommended` status filters on.
    pub recommended_category_id: String,
    /// Umbrella format tag to its concrete member tags.
    pub format_expansions: BTreeMap<String, Vec<String>>,
    pub text_strategy: TextStrategy,
    pub facet_mode: FacetMode,
    pub facet_dimensions: Vec<FacetDimension>,
    /// Bucket limit for terms facets.
    pub facet_max_buckets: u32,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        let mut format_expansions = BTreeMap::new();
        format_expansions.insert(
            "vinyl".to_string(),
            ["lp", "2xlp", "3xlp", "7-inch", "10-inch", "12-inch", "box-set"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );

        Self {
            min_score: 0.1,
            exact_boost: 2.0,
            field_weights: FieldWeights::default(),
            boost_factor: 1.0,
            decay_function: DecayFunction::Gauss,
            decay_scale: "365d".to_string(),
            recommended_category_id: "recommended".to_string(),
            format_expansions,
            text_strategy: TextStrategy::Structured,
            facet_mode: FacetMode::Filtered,
            facet_dimensions: FacetDimension::ALL.to_vec(),
            facet_max_buckets: 10_000,
        }
    }
}

impl CompilerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.min_score.is_finite() || self.min_score < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "min_score must be a non-negative number, got {}",
                self.min_score
            )));
        }
        if !self.exact_boost.is_finite() || self.exact_boost <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "exact_boost must be positive, got {}",
                self.exact_boost
            )));
        }
        if !self.boost_factor.is_finite() || self.boost_factor < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "boost_factor must be a non-negative number, got {}",
                self.boost_factor
            )));
        }
        if self.decay_scale.trim().is_empty() {
            return Err(Error::InvalidConfig("decay_scale cannot be empty".into()));
        }
        if self.recommended_category_id.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "recommended_category_id cannot be empty".into(),
            ));
        }
        if self.facet_max_buckets == 0 {
            return Err(Error::InvalidConfig(
                "facet_max_buckets must be at least 1".into(),
            ));
        }
        for (umbrella, members) in &self.format_expansions {
            if members.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "format expansion '{}' has no members",
                    umbrella
                )));
            }
        }
        Ok(())
    }

    /// Concrete tags for a requested format, the tag itself included.
    pub(crate) fn expand_format<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a str> {
        let members = self
            .format_expansions
            .get(tag)
            .map(|m| m.as_slice())
            .unwrap_or(&[]);
        std::iter::once(tag).chain(members.iter().map(String::as_str))
    }
}
