use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, Row};
use std::fs;
use std::path::Path;

use super::data_dir::{staging_path, DataDir};
use super::schema_gen::{generate_create_table, generate_indexes, generate_insert};
use crate::dataset::{Coords, Dataset, District, School};
use crate::schema::{TableSchema, ALL_TABLES, DISTRICTS, SCHOOLS};
use crate::ui::Ui;

const BATCH_SIZE: u64 = 500;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

impl From<Option<u64>> for SqlValue {
    fn from(value: Option<u64>) -> Self {
        value
            .and_then(|v| i64::try_from(v).ok())
            .map(SqlValue::Integer)
            .unwrap_or(SqlValue::Null)
    }
}

impl From<Option<f64>> for SqlValue {
    fn from(value: Option<f64>) -> Self {
        value.map(SqlValue::Real).unwrap_or(SqlValue::Null)
    }
}

impl From<Option<&str>> for SqlValue {
    fn from(value: Option<&str>) -> Self {
        value
            .map(|s| SqlValue::Text(s.to_string()))
            .unwrap_or(SqlValue::Null)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Integer(value as i64)
    }
}

pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    /// Start a fresh database at `db_path`, replacing any file already there
    pub fn new(db_path: &Path) -> Result<Self> {
        if db_path.exists() {
            fs::remove_file(db_path).context("Failed to remove existing database")?;
        }

        let conn = Connection::open(db_path).context("Failed to create database")?;

        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = DELETE;
             PRAGMA synchronous = FULL;",
        )?;

        Ok(Self { conn })
    }

    /// Create all tables for the given schemas
    pub fn create_tables(&self, schemas: &[&TableSchema]) -> Result<()> {
        for schema in schemas {
            let sql = generate_create_table(schema);
            self.conn
                .execute(&sql, [])
                .with_context(|| format!("Failed to create table: {}", schema.name))?;

            for index_sql in generate_indexes(schema) {
                self.conn
                    .execute(&index_sql, [])
                    .with_context(|| format!("Failed to create index for: {}", schema.name))?;
            }
        }

        Ok(())
    }

    /// Insert rows (values in schema column order) in one transaction
    pub fn insert_rows(
        &mut self,
        schema: &TableSchema,
        rows: &[Vec<SqlValue>],
        ui: &mut impl Ui,
    ) -> Result<u64> {
        let sql = generate_insert(schema);
        let total = rows.len() as u64;
        let tx = self.conn.transaction()?;
        let mut count: u64 = 0;

        {
            let mut stmt = tx.prepare_cached(&sql)?;
            for values in rows {
                for (idx, value) in values.iter().enumerate() {
                    value.bind_to(idx + 1, &mut stmt)?;
                }
                stmt.raw_execute()
                    .with_context(|| format!("Failed to insert into {}", schema.name))?;

                count += 1;
                if count % BATCH_SIZE == 0 {
                    ui.set_progress(count, total, schema.name);
                }
            }
        }

        tx.commit()?;
        ui.set_progress(count, total, schema.name);

        Ok(count)
    }

    pub fn finalize(self) -> Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close database")?;
        Ok(())
    }
}

fn district_values(district: &District) -> Result<Vec<SqlValue>> {
    let id = district
        .id
        .with_context(|| format!("District without id: {}", district.name))?;
    Ok(vec![
        SqlValue::Integer(id as i64),
        district.name.as_str().into(),
        district.students.into(),
        district.teachers.into(),
        district.workers.into(),
    ])
}

fn school_values(id: usize, school: &School, district_id: u32) -> Vec<SqlValue> {
    vec![
        SqlValue::Integer(id as i64),
        school.name.as_str().into(),
        school.shift.into(),
        school.capacity.into(),
        school.students.into(),
        school.workers.into(),
        school.teachers.into(),
        school.site.as_deref().into(),
        SqlValue::Integer(district_id as i64),
        school.district.as_str().into(),
        school.is_state.into(),
        school.address.as_deref().into(),
        school.coords.map(|c| c.latitude()).into(),
        school.coords.map(|c| c.longitude()).into(),
    ]
}

/// Write a complete dataset into a new database file, returns rows written
pub fn write_dataset(db_path: &Path, dataset: &Dataset, ui: &mut impl Ui) -> Result<u64> {
    let mut writer = SqliteWriter::new(db_path)?;
    writer.create_tables(ALL_TABLES)?;

    let districts = dataset
        .districts
        .iter()
        .map(district_values)
        .collect::<Result<Vec<_>>>()?;

    let schools = dataset
        .schools
        .iter()
        .enumerate()
        .map(|(idx, school)| -> Result<Vec<SqlValue>> {
            let district_id = dataset
                .districts
                .iter()
                .find(|d| d.name == school.district)
                .and_then(|d| d.id)
                .with_context(|| {
                    format!("School '{}' has unknown district '{}'", school.name, school.district)
                })?;
            Ok(school_values(idx + 1, school, district_id))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut total = writer.insert_rows(&DISTRICTS, &districts, ui)?;
    total += writer.insert_rows(&SCHOOLS, &schools, ui)?;
    writer.finalize()?;

    Ok(total)
}

/// Replace the live database (and workbook, when given) with new contents.
///
/// Everything is written to staging files first and renamed over the live
/// files only once complete, so a failed commit leaves the old data in place.
/// The database is renamed last: it is what a restart serves.
pub fn commit(
    data_dir: &DataDir,
    dataset: &Dataset,
    workbook: Option<&[u8]>,
    ui: &mut impl Ui,
) -> Result<u64> {
    data_dir.clean_staging()?;

    let live_db = data_dir.database_path();
    let staged_db = staging_path(&live_db);
    let count = write_dataset(&staged_db, dataset, ui)?;

    let live_workbook = data_dir.workbook_path();
    let staged_workbook = staging_path(&live_workbook);
    if let Some(bytes) = workbook {
        fs::write(&staged_workbook, bytes).context("Failed to stage workbook")?;
    }

    if workbook.is_some() {
        fs::rename(&staged_workbook, &live_workbook).context("Failed to replace workbook")?;
    }
    fs::rename(&staged_db, &live_db).context("Failed to replace database")?;

    Ok(count)
}

fn count_at(row: &Row, idx: usize) -> rusqlite::Result<Option<u64>> {
    Ok(row
        .get::<_, Option<i64>>(idx)?
        .and_then(|v| u64::try_from(v).ok()))
}

fn read_district(row: &Row) -> rusqlite::Result<District> {
    Ok(District {
        id: u32::try_from(row.get::<_, i64>(0)?).ok(),
        name: row.get(1)?,
        students: count_at(row, 2)?,
        teachers: count_at(row, 3)?,
        workers: count_at(row, 4)?,
    })
}

fn read_school(row: &Row) -> rusqlite::Result<School> {
    let latitude: Option<f64> = row.get(10)?;
    let longitude: Option<f64> = row.get(11)?;
    Ok(School {
        name: row.get(0)?,
        shift: count_at(row, 1)?,
        capacity: count_at(row, 2)?,
        students: count_at(row, 3)?,
        workers: count_at(row, 4)?,
        teachers: count_at(row, 5)?,
        site: row.get(6)?,
        district: row.get(7)?,
        is_state: row.get::<_, i64>(8)? != 0,
        address: row.get(9)?,
        coords: latitude.zip(longitude).and_then(|(lat, lon)| Coords::new(lat, lon)),
    })
}

/// Read a database written by [`write_dataset`]
pub fn load_dataset(db_path: &Path) -> Result<Dataset> {
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open database: {:?}", db_path))?;

    let mut stmt = conn.prepare(
        "SELECT id, name, students, teachers, workers FROM districts ORDER BY id",
    )?;
    let districts = stmt
        .query_map([], read_district)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read districts")?;

    let mut stmt = conn.prepare(
        "SELECT name, shift, capacity, students, workers, teachers, site, district,
                is_state, address, latitude, longitude
         FROM schools ORDER BY id",
    )?;
    let schools = stmt
        .query_map([], read_school)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read schools")?;

    Ok(Dataset { districts, schools })
}
