//! SQLite table schemas for the persisted dataset

use super::types::*;

pub static DISTRICTS: TableSchema = TableSchema {
    name: "districts",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::new("students", ColumnType::Integer),
        Column::new("teachers", ColumnType::Integer),
        Column::new("workers", ColumnType::Integer),
    ],
    foreign_keys: &[],
};

pub static SCHOOLS: TableSchema = TableSchema {
    name: "schools",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::new("shift", ColumnType::Integer),
        Column::new("capacity", ColumnType::Integer),
        Column::new("students", ColumnType::Integer),
        Column::new("workers", ColumnType::Integer),
        Column::new("teachers", ColumnType::Integer),
        Column::new("site", ColumnType::Text),
        Column::required("district_id", ColumnType::Integer),
        Column::required("district", ColumnType::Text),
        Column::required("is_state", ColumnType::Boolean),
        Column::new("address", ColumnType::Text),
        Column::new("latitude", ColumnType::Real),
        Column::new("longitude", ColumnType::Real),
    ],
    foreign_keys: &[ForeignKey::new("district_id", "districts")],
};

/// All table schemas in dependency order
pub static ALL_TABLES: &[&TableSchema] = &[&DISTRICTS, &SCHOOLS];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parents_precede_children() {
        for (pos, table) in ALL_TABLES.iter().enumerate() {
            for fk in table.foreign_keys {
                let parent = ALL_TABLES
                    .iter()
                    .position(|t| t.name == fk.references_table)
                    .expect("foreign key references a known table");
                assert!(parent < pos, "{} must come after {}", table.name, fk.references_table);
            }
        }
    }

    #[test]
    fn test_table_order() {
        let names: Vec<&str> = ALL_TABLES.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["districts", "schools"]);
    }
}
