//! Index field names the compiler depends on.
//!
//! The indexer owns the mapping; these names are the contract with it. Text
//! attributes are indexed three ways: analyzed (`artists`), case-folded
//! keyword (`artists.folded`) and untouched keyword (`artists.untouched`,
//! used for sorting).

pub const ARTISTS: &str = "artists";
pub const ARTISTS_FOLDED: &str = "artists.folded";
pub const NAME: &str = "name";
pub const NAME_FOLDED: &str = "name.folded";
pub const NAME_UNTOUCHED: &str = "name.untouched";
pub const LABEL: &str = "label";
pub const LABEL_FOLDED: &str = "label.folded";
pub const CATALOGUE_NUMBER: &str = "catalogue_number.folded";
pub const DESCRIPTION: &str = "description";
pub const TRACK_TITLES: &str = "track_titles";

pub const TAXON_IDS: &str = "taxon_ids";
pub const GENRE_IDS: &str = "genre_ids";
pub const PRICE: &str = "price";
pub const AVAILABLE_ON: &str = "available_on";
pub const DELETED_AT: &str = "deleted_at";
pub const PUBLISHED: &str = "published";
pub const LATEST_RELEASE_DATE: &str = "latest_release_date";
pub const DISCOUNT_RATE: &str = "discount_rate";
pub const POPULARITY_SCORE: &str = "popularity_score";

/// Nested collection of release formats (one element per sellable variant).
pub const RELEASE_FORMATS: &str = "release_formats";
pub const VARIANT_PUBLISHED: &str = "release_formats.published";
pub const VARIANT_FORMAT: &str = "release_formats.uber_format";
pub const VARIANT_IN_STOCK: &str = "release_formats.in_stock";
pub const VARIANT_ON_SALE: &str = "release_formats.on_sale";
pub const VARIANT_SALE_ENDS_AT: &str = "release_formats.sale_ends_at";
pub const VARIANT_PREORDERABLE: &str = "release_formats.preorderable";
pub const VARIANT_RELEASE_DATE: &str = "release_formats.release_date";

pub const SCORE: &str = "_score";
