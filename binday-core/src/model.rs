//! Domain data structures for lookup requests, bin colors, and collection schedules.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing the council a provider talks to.
pub struct CouncilMeta {
    /// Short identifier used in logs.
    pub id: String,
    /// Human-friendly council name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Postcode lookup submitted by a client.
pub struct LookupRequest {
    /// Postcode as typed by the user. It is passed to the council site verbatim.
    pub postcode: String,
    /// Optional house number used to pick one address out of several.
    #[serde(default, alias = "house_number")]
    pub house_number: Option<String>,
}

impl LookupRequest {
    /// Construct a new lookup request.
    #[must_use]
    pub fn new<P: Into<String>, H: Into<String>>(postcode: P, house_number: Option<H>) -> Self {
        Self {
            postcode: postcode.into(),
            house_number: house_number.map(Into::into),
        }
    }

    /// House number filter, ignoring an empty string.
    #[must_use]
    pub fn house_number(&self) -> Option<&str> {
        self.house_number
            .as_deref()
            .filter(|number| !number.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Bin colors known to the lookup. Derived from the bin label, never reported by the council.
pub enum BinColor {
    /// General waste.
    Black,
    /// Dry recycling.
    Blue,
    /// Garden waste and compost.
    Brown,
    /// Food waste.
    Green,
    /// Glass.
    Purple,
    /// Label did not match any known keyword.
    #[default]
    Unknown,
}

impl fmt::Display for BinColor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinColor::Black => "Black",
            BinColor::Blue => "Blue",
            BinColor::Brown => "Brown",
            BinColor::Green => "Green",
            BinColor::Purple => "Purple",
            BinColor::Unknown => "Unknown",
        };
        write!(formatter, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One row of a collection schedule.
pub struct CollectionEntry {
    /// Bin label as rendered by the source, e.g. "General Waste".
    pub bin_type: String,
    /// Color classified from the label.
    pub color: BinColor,
    /// Date text as rendered by the source. Not parsed.
    pub next_collection_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Schedule returned to the client.
///
/// `next_collection_color` always mirrors the color of the first entry, so the
/// fields are only reachable through the constructors and accessors.
pub struct LookupResponse {
    address: String,
    collections: Vec<CollectionEntry>,
    next_collection_color: BinColor,
    is_fallback: bool,
}

impl LookupResponse {
    /// Build a response from a live lookup.
    #[must_use]
    pub fn scraped<A: Into<String>>(address: A, collections: Vec<CollectionEntry>) -> Self {
        Self::build(address.into(), collections, false)
    }

    /// Build a response from synthetic data.
    #[must_use]
    pub fn fallback<A: Into<String>>(address: A, collections: Vec<CollectionEntry>) -> Self {
        Self::build(address.into(), collections, true)
    }

    fn build(address: String, collections: Vec<CollectionEntry>, is_fallback: bool) -> Self {
        let next_collection_color = collections
            .first()
            .map_or(BinColor::Unknown, |entry| entry.color);
        Self {
            address,
            collections,
            next_collection_color,
            is_fallback,
        }
    }

    /// Resolved address label.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Collections in source order.
    #[must_use]
    pub fn collections(&self) -> &[CollectionEntry] {
        &self.collections
    }

    /// Color of the first collection, or [`BinColor::Unknown`] when there are none.
    #[must_use]
    pub fn next_collection_color(&self) -> BinColor {
        self.next_collection_color
    }

    /// Whether the schedule came from the mock generator.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }
}
