//! Typed search criteria.
//!
//! Every symbolic token a storefront request can carry is resolved into an
//! enum here, once, so the compiler never re-interprets strings.

use std::collections::BTreeSet;

use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

/// Sentinel value meaning "do not filter on this dimension".
pub const ALL_SENTINEL: &str = "all";

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Which text fields (and weights) a keyword search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryScope {
    #[default]
    Default,
    Artist,
    Title,
    Label,
    CatalogueNumber,
}

impl CategoryScope {
    /// Unknown scopes fall back to [`CategoryScope::Default`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "artist" | "artists" => Self::Artist,
            "title" | "name" => Self::Title,
            "label" => Self::Label,
            "catalogue_number" | "catalogue-number" | "catno" => Self::CatalogueNumber,
            _ => Self::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Artist => "artist",
            Self::Title => "title",
            Self::Label => "label",
            Self::CatalogueNumber => "catalogue_number",
        }
    }
}

/// Availability tokens accepted by the `status` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusTag {
    InStock,
    OutOfStock,
    OnSale,
    Recommended,
    PreOrder,
}

impl StatusTag {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "in-stock" | "in_stock" | "instock" => Some(Self::InStock),
            "out-of-stock" | "out_of_stock" | "outofstock" => Some(Self::OutOfStock),
            "on-sale" | "on_sale" | "sale" => Some(Self::OnSale),
            "recommended" => Some(Self::Recommended),
            "pre-order" | "pre_order" | "preorder" => Some(Self::PreOrder),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "in-stock",
            Self::OutOfStock => "out-of-stock",
            Self::OnSale => "on-sale",
            Self::Recommended => "recommended",
            Self::PreOrder => "pre-order",
        }
    }
}

/// Relative lower bound on the release date of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseDateBucket {
    #[default]
    Anytime,
    LastWeek,
    LastMonth,
    LastYear,
}

impl ReleaseDateBucket {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "last_week" | "last-week" | "week" => Self::LastWeek,
            "last_month" | "last-month" | "month" => Self::LastMonth,
            "last_year" | "last-year" | "year" => Self::LastYear,
            _ => Self::Anytime,
        }
    }
}

/// Symbolic sort selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// In-stock releases first, then relevance.
    #[default]
    Default,
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    PreOrder,
    Oldest,
    Newest,
    Relevance,
    /// Deepest discount first.
    Discount,
    /// Most popular first (`sorting=recommended`).
    Popularity,
}

impl SortKey {
    /// Unknown or blank keys fall back to [`SortKey::Default`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "name_asc" => Self::NameAsc,
            "name_desc" => Self::NameDesc,
            "price_asc" => Self::PriceAsc,
            "price_desc" => Self::PriceDesc,
            "preorder" | "pre_order" | "pre-order" => Self::PreOrder,
            "oldest" => Self::Oldest,
            "newest" => Self::Newest,
            "score" | "relevance" => Self::Relevance,
            "discount" => Self::Discount,
            "recommended" | "popularity" => Self::Popularity,
            _ => Self::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::PreOrder => "preorder",
            Self::Oldest => "oldest",
            Self::Newest => "newest",
            Self::Relevance => "score",
            Self::Discount => "discount",
            Self::Popularity => "recommended",
        }
    }
}

/// Everything a single search request asks for.
///
/// Sets are ordered so that compiling the same criteria twice yields
/// byte-identical request bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    /// Free text; blank means match everything.
    pub text: String,
    pub category_scope: CategoryScope,
    /// Catalog taxon ids (including ancestors, as indexed).
    pub catalog_ids: BTreeSet<String>,
    /// Genre ids; may contain [`ALL_SENTINEL`].
    pub tag_ids: BTreeSet<String>,
    /// Format tags; may contain [`ALL_SENTINEL`] or umbrella tags.
    pub format_tags: BTreeSet<String>,
    pub status_tags: BTreeSet<StatusTag>,
    pub release_date_bucket: ReleaseDateBucket,
    pub sort_key: SortKey,
    pub include_description_text: bool,
    pub include_sub_item_text: bool,
    /// Pre-built filter fragments inserted verbatim at top level.
    pub raw_clauses: Vec<JsonValue>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            text: String::new(),
            category_scope: CategoryScope::Default,
            catalog_ids: BTreeSet::new(),
            tag_ids: BTreeSet::new(),
            format_tags: BTreeSet::new(),
            status_tags: BTreeSet::new(),
            release_date_bucket: ReleaseDateBucket::Anytime,
            sort_key: SortKey::Default,
            include_description_text: false,
            include_sub_item_text: false,
            raw_clauses: Vec::new(),
            price_min: None,
            price_max: None,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchCriteria {
    /// Attach a pre-built filter clause.
    ///
    /// The clause is opaque to the compiler but must be a single-key JSON
    /// object (`{"term": {...}}`, `{"bool": {...}}`, ...).
    pub fn with_raw_clause(mut self, clause: JsonValue) -> Result<Self> {
        match clause.as_object() {
            Some(obj) if obj.len() == 1 => {
                self.raw_clauses.push(clause);
                Ok(self)
            }
            Some(obj) => Err(Error::InvalidClause(format!(
                "expected exactly one query type, found {}",
                obj.len()
            ))),
            None => Err(Error::InvalidClause(format!(
                "expected a JSON object, found {}",
                clause
            ))),
        }
    }

    /// Parse and attach a raw clause given as JSON text.
    pub fn with_raw_clause_str(self, clause: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(clause)?;
        self.with_raw_clause(value)
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Zero-based offset of the first record on the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.page_size.max(1))
    }
}

/// True when the set is non-empty and does not contain the "all" sentinel.
pub(crate) fn is_active_filter(values: &BTreeSet<String>) -> bool {
    !values.is_empty() && !values.contains(ALL_SENTINEL)
}
