use serde::{Deserialize, Serialize};

use super::cell::{parse_coords, Cell};
use crate::dataset::{Coords, District, School};
use crate::schema::known_district;

/// Spreadsheet columns, named for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Sequence,
    Name,
    Shift,
    Capacity,
    Students,
    Workers,
    Teachers,
    Site,
    Latitude,
    Longitude,
    Address,
    District,
    StateFlag,
    Coordinates,
}

/// Column order of the current (flat) layout
pub const CURRENT_COLUMNS: [Field; 13] = [
    Field::Sequence,
    Field::Name,
    Field::Shift,
    Field::Capacity,
    Field::Students,
    Field::Workers,
    Field::Teachers,
    Field::Site,
    Field::Latitude,
    Field::Longitude,
    Field::Address,
    Field::District,
    Field::StateFlag,
];

/// Column order of the legacy layout with interleaved district rows
pub const LEGACY_COLUMNS: [Field; 11] = [
    Field::Sequence,
    Field::Name,
    Field::Shift,
    Field::Capacity,
    Field::Students,
    Field::Workers,
    Field::Teachers,
    Field::Site,
    Field::StateFlag,
    Field::Address,
    Field::Coordinates,
];

/// Why a data row produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A required cell is blank
    MissingCell,
    /// A numeric cell holds something that is not a whole number
    InvalidNumber,
    /// District name is not one of the known districts
    UnknownDistrict,
    /// School row before any district row
    NoDistrictContext,
    /// "Всего" summary row
    TotalRow,
    /// Blank, heading or filler row
    EmptyRow,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SkipReason::MissingCell => "required cell is empty",
            SkipReason::InvalidNumber => "not a whole number",
            SkipReason::UnknownDistrict => "unknown district",
            SkipReason::NoDistrictContext => "school listed before any district",
            SkipReason::TotalRow => "total row",
            SkipReason::EmptyRow => "empty row",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skip {
    pub reason: SkipReason,
    pub field: Option<Field>,
}

impl Skip {
    fn row(reason: SkipReason) -> Self {
        Self { reason, field: None }
    }

    fn at(reason: SkipReason, field: Field) -> Self {
        Self {
            reason,
            field: Some(field),
        }
    }
}

/// Result of classifying one data row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    School(School),
    /// Legacy layout only: opens a new district context
    District(District),
    Skipped(Skip),
}

impl From<Skip> for RowOutcome {
    fn from(skip: Skip) -> Self {
        RowOutcome::Skipped(skip)
    }
}

fn cell(row: &[Cell], idx: usize) -> &Cell {
    const EMPTY: &Cell = &Cell::Empty;
    row.get(idx).unwrap_or(EMPTY)
}

fn count_at(row: &[Cell], idx: usize, field: Field) -> Result<Option<u64>, Skip> {
    cell(row, idx)
        .count()
        .map_err(|_| Skip::at(SkipReason::InvalidNumber, field))
}

/// Classify a row of the current layout.
///
/// All 13 cells must be filled. Coordinates that do not parse leave the school
/// without coordinates; every other malformed value skips the row.
pub fn parse_current_row(row: &[Cell]) -> RowOutcome {
    match current_school(row) {
        Ok(school) => RowOutcome::School(school),
        Err(skip) => skip.into(),
    }
}

fn current_school(row: &[Cell]) -> Result<School, Skip> {
    if let Some(idx) = (0..CURRENT_COLUMNS.len()).find(|&i| !cell(row, i).is_filled()) {
        return Err(Skip::at(SkipReason::MissingCell, CURRENT_COLUMNS[idx]));
    }

    let district_name = cell(row, 11).text().unwrap_or_default();
    let district = known_district(&district_name)
        .ok_or(Skip::at(SkipReason::UnknownDistrict, Field::District))?;

    let coords = match (cell(row, 8).decimal(), cell(row, 9).decimal()) {
        (Some(lat), Some(lon)) => Coords::new(lat, lon),
        _ => None,
    };

    Ok(School {
        name: cell(row, 1).text().unwrap_or_default(),
        shift: count_at(row, 2, Field::Shift)?,
        capacity: count_at(row, 3, Field::Capacity)?,
        students: count_at(row, 4, Field::Students)?,
        workers: count_at(row, 5, Field::Workers)?,
        teachers: count_at(row, 6, Field::Teachers)?,
        site: cell(row, 7).text(),
        district: district.name.to_string(),
        is_state: cell(row, 12).flag(),
        address: cell(row, 10).text(),
        coords,
    })
}

/// Classify a row of the legacy layout.
///
/// `context` is the district opened by the most recent district row. A district
/// row has no sequence number, no site and a known district name in the name
/// column; its own counts are kept only until schools provide real ones.
pub fn parse_legacy_row(row: &[Cell], context: Option<&str>) -> RowOutcome {
    match legacy_row(row, context) {
        Ok(outcome) => outcome,
        Err(skip) => skip.into(),
    }
}

fn legacy_row(row: &[Cell], context: Option<&str>) -> Result<RowOutcome, Skip> {
    let numbered = cell(row, 0).is_filled();
    let name = cell(row, 1).text().ok_or(Skip::row(SkipReason::EmptyRow))?;

    if name.to_lowercase() == "всего" {
        return Err(Skip::row(SkipReason::TotalRow));
    }

    if !numbered && !cell(row, 7).is_filled() {
        if let Some(known) = known_district(&name) {
            return Ok(RowOutcome::District(District {
                id: known.id,
                name: known.name.to_string(),
                students: cell(row, 4).count().ok().flatten(),
                workers: cell(row, 5).count().ok().flatten(),
                teachers: cell(row, 6).count().ok().flatten(),
            }));
        }
    }

    if !numbered && (2..=4).all(|i| !cell(row, i).is_filled()) {
        return Err(Skip::row(SkipReason::EmptyRow));
    }

    let district = context.ok_or(Skip::row(SkipReason::NoDistrictContext))?;

    Ok(RowOutcome::School(School {
        name,
        shift: count_at(row, 2, Field::Shift)?,
        capacity: count_at(row, 3, Field::Capacity)?,
        students: count_at(row, 4, Field::Students)?,
        workers: count_at(row, 5, Field::Workers)?,
        teachers: count_at(row, 6, Field::Teachers)?,
        site: cell(row, 7).text(),
        district: district.to_string(),
        is_state: cell(row, 8).flag(),
        address: cell(row, 9).text(),
        coords: parse_coords(cell(row, 10)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROZNY: &str = "Департамент образования Мэрии г.Грозного";

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells
            .iter()
            .map(|c| if c.is_empty() { Cell::Empty } else { Cell::from(*c) })
            .collect()
    }

    fn current_row() -> Vec<Cell> {
        row(&[
            "1", "Школа №1", "2", "800", "640", "40", "55", "school1.ru",
            "43.3175", "45.6940", "ул. Мира, 1", GROZNY, "Да",
        ])
    }

    #[test]
    fn test_current_row_accepted() {
        let RowOutcome::School(school) = parse_current_row(&current_row()) else {
            panic!("row should be accepted");
        };
        assert_eq!(school.name, "Школа №1");
        assert_eq!(school.shift, Some(2));
        assert_eq!(school.students, Some(640));
        assert_eq!(school.workers, Some(40));
        assert_eq!(school.teachers, Some(55));
        assert_eq!(school.district, GROZNY);
        assert!(school.is_state);
        assert_eq!(school.coords, Some(Coords(43.3175, 45.694)));
    }

    #[test]
    fn test_current_row_missing_any_cell() {
        for idx in 0..13 {
            let mut cells = current_row();
            cells[idx] = Cell::Empty;
            assert_eq!(
                parse_current_row(&cells),
                RowOutcome::Skipped(Skip::at(SkipReason::MissingCell, CURRENT_COLUMNS[idx])),
                "column {}",
                idx
            );
        }
    }

    #[test]
    fn test_current_row_short() {
        let cells = current_row()[..12].to_vec();
        assert!(matches!(parse_current_row(&cells), RowOutcome::Skipped(_)));
    }

    #[test]
    fn test_current_row_text_in_number() {
        let mut cells = current_row();
        cells[4] = Cell::from("много");
        assert_eq!(
            parse_current_row(&cells),
            RowOutcome::Skipped(Skip::at(SkipReason::InvalidNumber, Field::Students))
        );
    }

    #[test]
    fn test_current_row_unknown_district() {
        let mut cells = current_row();
        cells[11] = Cell::from("Новый район");
        assert_eq!(
            parse_current_row(&cells),
            RowOutcome::Skipped(Skip::at(SkipReason::UnknownDistrict, Field::District))
        );
    }

    #[test]
    fn test_current_row_bad_coords_kept() {
        let mut cells = current_row();
        cells[9] = Cell::from("east");
        let RowOutcome::School(school) = parse_current_row(&cells) else {
            panic!("row should be accepted");
        };
        assert_eq!(school.coords, None);
    }

    #[test]
    fn test_legacy_district_row() {
        let cells = row(&["", GROZNY, "", "", "1000", "50", "70", "", "", "", ""]);
        let RowOutcome::District(district) = parse_legacy_row(&cells, None) else {
            panic!("expected district row");
        };
        assert_eq!(district.id, Some(1));
        assert_eq!(district.students, Some(1000));
        assert_eq!(district.workers, Some(50));
        assert_eq!(district.teachers, Some(70));
    }

    #[test]
    fn test_legacy_school_row() {
        let cells = row(&[
            "3", "Гимназия №5", "1", "500", "450", "30", "41", "gym5.ru", "Нет", "пр. Кадырова, 2",
            "43.3175, 45.6940",
        ]);
        let RowOutcome::School(school) = parse_legacy_row(&cells, Some(GROZNY)) else {
            panic!("expected school row");
        };
        assert_eq!(school.district, GROZNY);
        assert!(!school.is_state);
        assert_eq!(school.address.as_deref(), Some("пр. Кадырова, 2"));
        assert_eq!(school.coords.map(|c| c.latitude()), Some(43.3175));
        assert_eq!(school.coords.map(|c| c.longitude()), Some(45.694));
    }

    #[test]
    fn test_legacy_skips() {
        let total = row(&["", "Всего", "", "", "9000", "", "", "", "", "", ""]);
        assert_eq!(
            parse_legacy_row(&total, Some(GROZNY)),
            RowOutcome::Skipped(Skip::row(SkipReason::TotalRow))
        );

        let heading = row(&["", "Общеобразовательные школы", "", "", "", "", "", "", "", "", ""]);
        assert_eq!(
            parse_legacy_row(&heading, Some(GROZNY)),
            RowOutcome::Skipped(Skip::row(SkipReason::EmptyRow))
        );

        let orphan = row(&["1", "Школа", "1", "100", "90", "", "", "", "", "", ""]);
        assert_eq!(
            parse_legacy_row(&orphan, None),
            RowOutcome::Skipped(Skip::row(SkipReason::NoDistrictContext))
        );

        let bad = row(&["1", "Школа", "one", "100", "90", "", "", "", "", "", ""]);
        assert_eq!(
            parse_legacy_row(&bad, Some(GROZNY)),
            RowOutcome::Skipped(Skip::at(SkipReason::InvalidNumber, Field::Shift))
        );
    }
}
