//! Border matching and border polygons
//!
//! Labels in the border dataset are free text ("Веденский район",
//! "г. Грозный"), while districts carry the official names used in the
//! spreadsheets. [`match_border`] bridges the two via the keyword table in
//! [`crate::schema::districts`].

pub mod borders;
pub mod reconcile;

pub use borders::*;
pub use reconcile::*;
