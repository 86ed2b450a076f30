//! District border polygons loaded from a GeoJSON feature collection

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use super::reconcile::{district_color, match_border};
use crate::dataset::District;

/// A closed ring of `[latitude, longitude]` points
pub type Ring = Vec<[f64; 2]>;

#[derive(Debug, Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Value,
}

/// A labelled border with its rings already flipped for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorderFeature {
    pub label: String,
    pub rings: Vec<Ring>,
}

/// A border joined with the district it belongs to in the current dataset
#[derive(Debug, Serialize)]
pub struct ResolvedBorder<'a> {
    pub label: &'a str,
    pub district_id: Option<u32>,
    pub color: &'static str,
    pub rings: &'a [Ring],
}

#[derive(Debug, Clone, Default)]
pub struct BorderCollection {
    features: Vec<BorderFeature>,
}

impl BorderCollection {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read border file: {:?}", path))?;
        Self::from_geojson(&text).with_context(|| format!("Invalid border file: {:?}", path))
    }

    /// Parse a FeatureCollection; features that are not polygons are ignored
    pub fn from_geojson(text: &str) -> Result<Self> {
        let raw: RawCollection = serde_json::from_str(text).context("Failed to parse GeoJSON")?;

        let mut features = Vec::with_capacity(raw.features.len());
        for (idx, feature) in raw.features.into_iter().enumerate() {
            let Some(geometry) = feature.geometry else {
                continue;
            };
            let label = feature
                .properties
                .as_ref()
                .and_then(|p| p.get("name"))
                .and_then(|n| n.as_str())
                .unwrap_or_default()
                .to_string();

            let rings = match geometry.kind.as_str() {
                "Polygon" => polygon_rings(&geometry.coordinates),
                "MultiPolygon" => multipolygon_rings(&geometry.coordinates),
                _ => continue,
            }
            .with_context(|| format!("Bad coordinates in feature #{} ({})", idx, label))?;

            features.push(BorderFeature { label, rings });
        }

        Ok(Self { features })
    }

    pub fn features(&self) -> &[BorderFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Attach district ids and colors against the given district list
    pub fn resolve<'a>(&'a self, districts: &[District]) -> Vec<ResolvedBorder<'a>> {
        self.features
            .iter()
            .map(|f| ResolvedBorder {
                label: &f.label,
                district_id: match_border(&f.label, districts),
                color: district_color(&f.label),
                rings: &f.rings,
            })
            .collect()
    }
}

fn multipolygon_rings(value: &Value) -> Result<Vec<Ring>> {
    let Some(polygons) = value.as_array() else {
        bail!("MultiPolygon coordinates must be an array");
    };
    let mut rings = Vec::new();
    for polygon in polygons {
        rings.extend(polygon_rings(polygon)?);
    }
    Ok(rings)
}

fn polygon_rings(value: &Value) -> Result<Vec<Ring>> {
    let Some(rings) = value.as_array() else {
        bail!("Polygon coordinates must be an array of rings");
    };
    rings.iter().map(flip_ring).collect()
}

/// GeoJSON positions are `[lon, lat, ...]`; the map widget wants `[lat, lon]`
fn flip_ring(value: &Value) -> Result<Ring> {
    let Some(points) = value.as_array() else {
        bail!("Ring must be an array of positions");
    };
    points
        .iter()
        .map(|p| {
            let lon = p.get(0).and_then(Value::as_f64);
            let lat = p.get(1).and_then(Value::as_f64);
            match (lat, lon) {
                (Some(lat), Some(lon)) => Ok([lat, lon]),
                _ => bail!("Position must hold two numbers: {}", p),
            }
        })
        .collect()
}
