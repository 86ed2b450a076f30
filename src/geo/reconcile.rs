use crate::dataset::District;
use crate::schema::{DistrictGeo, DISTRICT_GEO};

/// Color for border labels that match no known district
pub const DEFAULT_COLOR: &str = "#3b82f6";

/// Resolve a border label to the id of a district in `districts`
pub fn match_border(label: &str, districts: &[District]) -> Option<u32> {
    match_border_in(DISTRICT_GEO, label, districts)
}

/// Same as [`match_border`] against an explicit descriptor table.
///
/// Entries are tried in table order. An entry whose keyword occurs in the
/// label but whose district is absent from `districts` (or has no id yet)
/// does not stop the search.
pub fn match_border_in(table: &[DistrictGeo], label: &str, districts: &[District]) -> Option<u32> {
    let lower = label.to_lowercase();
    table
        .iter()
        .filter(|geo| lower.contains(geo.border_keyword))
        .find_map(|geo| {
            districts
                .iter()
                .filter(|d| d.name == geo.name)
                .find_map(|d| d.id)
        })
}

/// First descriptor whose keyword occurs in the label
pub fn find_geo_in<'a>(table: &'a [DistrictGeo], label: &str) -> Option<&'a DistrictGeo> {
    let lower = label.to_lowercase();
    table.iter().find(|geo| lower.contains(geo.border_keyword))
}

pub fn district_color(label: &str) -> &'static str {
    district_color_in(DISTRICT_GEO, label)
}

pub fn district_color_in<'a>(table: &'a [DistrictGeo], label: &str) -> &'a str {
    find_geo_in(table, label)
        .map(|geo| geo.color)
        .unwrap_or(DEFAULT_COLOR)
}
