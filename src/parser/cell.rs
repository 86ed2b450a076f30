use calamine::Data;

use crate::dataset::Coords;

/// Yes-tokens accepted for the state-run flag, compared lowercase
const AFFIRMATIVE: &[&str] = &["да", "yes", "true", "1"];

/// A spreadsheet cell reduced to the shapes the ingestor cares about
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

/// The cell holds something other than a non-negative whole number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotACount;

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::String(s) => Cell::Text(s.clone()),
            Data::DateTime(dt) => Cell::Float(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl Cell {
    /// Present and non-blank
    pub fn is_filled(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Float(f) => !f.is_nan(),
            Cell::Text(s) => !s.trim().is_empty(),
            Cell::Int(_) | Cell::Bool(_) => true,
        }
    }

    /// Trimmed text, `None` when blank
    pub fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) if f.is_nan() => None,
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
            Cell::Float(f) => Some(f.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
        }
    }

    /// Non-negative whole number; blank cells are `Ok(None)`
    pub fn count(&self) -> Result<Option<u64>, NotACount> {
        match self {
            Cell::Empty => Ok(None),
            Cell::Int(i) => u64::try_from(*i).map(Some).map_err(|_| NotACount),
            Cell::Float(f) if f.is_nan() => Ok(None),
            Cell::Float(f) => float_count(*f).map(Some),
            Cell::Bool(_) => Err(NotACount),
            Cell::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                if let Ok(n) = s.parse::<u64>() {
                    return Ok(Some(n));
                }
                s.parse::<f64>()
                    .map_err(|_| NotACount)
                    .and_then(float_count)
                    .map(Some)
            }
        }
    }

    /// Decimal number; a lone comma is read as the decimal separator
    pub fn decimal(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) if f.is_finite() => Some(*f),
            Cell::Text(s) => parse_decimal(s),
            _ => None,
        }
    }

    /// State-run flag: affirmative tokens are true, anything else false
    pub fn flag(&self) -> bool {
        match self {
            Cell::Bool(b) => *b,
            Cell::Int(i) => *i == 1,
            Cell::Float(f) => *f == 1.0,
            Cell::Text(s) => AFFIRMATIVE.contains(&s.trim().to_lowercase().as_str()),
            Cell::Empty => false,
        }
    }
}

fn float_count(f: f64) -> Result<u64, NotACount> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
        Ok(f as u64)
    } else {
        Err(NotACount)
    }
}

fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    let value = if s.contains(',') && !s.contains('.') && s.matches(',').count() == 1 {
        s.replace(',', ".").parse::<f64>().ok()?
    } else {
        s.parse::<f64>().ok()?
    };
    value.is_finite().then_some(value)
}

/// Combined coordinate cell: `"43.3175, 45.6940"` (`;` also separates)
pub fn parse_coords(cell: &Cell) -> Option<Coords> {
    let text = cell.text()?;
    let normalized = text.replace(';', ",");
    let parts: Vec<&str> = normalized.split(',').map(str::trim).collect();
    let [lat, lon] = parts.as_slice() else {
        return None;
    };
    let lat = lat.parse::<f64>().ok()?;
    let lon = lon.parse::<f64>().ok()?;
    Coords::new(lat, lon)
}
