//! Districts, schools and the dataset they form

use serde::{Deserialize, Serialize};

/// A `(latitude, longitude)` pair, serialized as `[lat, lon]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords(pub f64, pub f64);

impl Coords {
    /// Both parts must be finite and inside the valid ranges
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self(latitude, longitude))
    }

    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub id: Option<u32>,
    pub name: String,
    pub students: Option<u64>,
    pub teachers: Option<u64>,
    pub workers: Option<u64>,
}

impl District {
    pub fn new(id: Option<u32>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            students: None,
            teachers: None,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub name: String,
    pub shift: Option<u64>,
    pub capacity: Option<u64>,
    pub students: Option<u64>,
    pub workers: Option<u64>,
    pub teachers: Option<u64>,
    pub site: Option<String>,
    /// Canonical name of the owning district
    pub district: String,
    pub is_state: bool,
    pub address: Option<String>,
    pub coords: Option<Coords>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Sorted by id
    pub districts: Vec<District>,
    pub schools: Vec<School>,
}

impl Dataset {
    pub fn district(&self, id: u32) -> Option<&District> {
        self.districts.iter().find(|d| d.id == Some(id))
    }

    /// Schools of the district with the given id, `None` if there is no such district
    pub fn schools_in(&self, id: u32) -> Option<Vec<&School>> {
        let district = self.district(id)?;
        Some(
            self.schools
                .iter()
                .filter(|s| s.district == district.name)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }
}
