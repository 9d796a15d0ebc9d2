//! Static datasets used across harnesses.

use trawl_core::{Catalog, DataItem, SelectionSet};

use super::builders::CatalogBuilder;

/// The three-item dataset used throughout the parser and ranker examples.
pub fn small_catalog() -> Catalog {
    CatalogBuilder::new()
        .flag("1", "Spain")
        .flag("2", "Indonesia")
        .rfmo("3", "IOTC")
        .build()
}

/// Flags and RFMOs with enough overlap to exercise ranking order.
pub fn flag_catalog() -> Catalog {
    CatalogBuilder::new()
        .flag("ESP", "Spain")
        .flag("IDN", "Indonesia")
        .flag("FRA", "France")
        .flag("PRT", "Portugal")
        .flag("PNG", "Papua New Guinea")
        .flag("SPM", "Saint Pierre and Miquelon")
        .rfmo("IOTC", "IOTC")
        .rfmo("ICCAT", "ICCAT")
        .rfmo("WCPFC", "WCPFC")
        .build()
}

/// Vessels served by the fake vessel API, as `(vesselId, name)`.
pub const VESSELS: &[(&str, &str)] = &[
    ("v-100", "Sea Breeze"),
    ("v-101", "Sea Dragon"),
    ("v-102", "Ocean Star"),
    ("v-103", "Samudra Jaya"),
    ("v-104", "Bintang Laut"),
];

pub fn spain() -> DataItem {
    DataItem::new("1", "Spain", "flag")
}

pub fn iotc() -> DataItem {
    DataItem::new("3", "IOTC", "rfmo")
}

pub fn sea_breeze() -> DataItem {
    DataItem::new("v-100", "Sea Breeze", "vessel")
}

pub fn selection_of(items: impl IntoIterator<Item = DataItem>) -> SelectionSet {
    items.into_iter().collect()
}
