//! Shared fixtures: real `.xlsx` packages assembled with the `zip` crate.
#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const GROZNY: &str = "Департамент образования Мэрии г.Грозного";
pub const ARGUN: &str = "Департамент образования г. Аргун";
pub const VEDENO: &str = "МУ 'Веденский РОО'";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Школы" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

fn column_name(mut idx: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn sheet_xml(rows: &[Vec<&str>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let reference = format!("{}{}", column_name(c), r + 1);
            if value.parse::<f64>().is_ok() {
                xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value));
            } else {
                xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    reference,
                    escape(value)
                ));
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Single-sheet workbook; numeric-looking values become number cells, empty strings are left out
pub fn xlsx(rows: &[Vec<&str>]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let sheet = sheet_xml(rows);

    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/worksheets/sheet1.xml", sheet.as_str()),
    ] {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

pub fn current_header() -> Vec<&'static str> {
    vec![
        "№", "Наименование", "Смена", "Мощность", "Ученики", "Работники", "Учителя", "Сайт",
        "Широта", "Долгота", "Адрес", "Район", "Государственная",
    ]
}

pub fn current_rows() -> Vec<Vec<&'static str>> {
    vec![
        current_header(),
        vec!["1", "Школа №1", "2", "800", "640", "40", "55", "school1.ru", "43.3175", "45.694", "ул. Мира, 1", GROZNY, "Да"],
        vec!["2", "Школа №2", "1", "600", "360", "30", "25", "school2.ru", "43.31", "45.70", "ул. Ленина, 5", GROZNY, "Нет"],
        vec!["3", "Гимназия №1", "1", "500", "410", "20", "35", "gym1.ru", "43.29", "45.87", "ул. Шоссейная, 2", ARGUN, "Да"],
        vec!["4", "Школа без района", "1", "300", "100", "10", "10", "x.ru", "43.0", "45.0", "с. Нигде", "Неизвестный РОО", "Да"],
        vec!["5", "Школа без смены", "", "300", "100", "10", "10", "y.ru", "43.0", "45.0", "с. Где-то", ARGUN, "Да"],
        vec![],
        vec!["6", "Школа с адресом", "1", "400", "ок. 300", "10", "10", "z.ru", "43.0", "45.0", "с. Тут", VEDENO, "Да"],
    ]
}

pub fn legacy_rows() -> Vec<Vec<&'static str>> {
    vec![
        vec!["№", "Наименование", "Смена", "Мощность", "Ученики", "Работники", "Учителя", "Сайт", "Гос", "Адрес", "Координаты"],
        vec!["", VEDENO, "", "", "900", "80", "70"],
        vec!["1", "Веденская СОШ №1", "1", "500", "420", "30", "40", "ved1.ru", "да", "с. Ведено", "42.97, 46.10"],
        vec!["2", "Веденская СОШ №2", "2", "400", "", "", "", "ved2.ru", "нет", "с. Ведено", "42.96; 46.11"],
        vec!["", ARGUN, "", "", "1000", "90", "75"],
        vec!["3", "Аргунская СОШ №1", "1", "700", "650", "45", "50", "arg1.ru", "Да", "г. Аргун", "нет данных"],
        vec!["", "Всего", "", "", "2000", "170", "145"],
    ]
}

pub static CURRENT_WORKBOOK: Lazy<Vec<u8>> = Lazy::new(|| xlsx(&current_rows()));

pub static LEGACY_WORKBOOK: Lazy<Vec<u8>> = Lazy::new(|| xlsx(&legacy_rows()));

/// A workbook whose only data row is skipped
pub static EMPTY_WORKBOOK: Lazy<Vec<u8>> = Lazy::new(|| {
    let mut rows = vec![current_header()];
    rows.push(vec!["1", "Школа", "1", "1", "1", "1", "1", "s.ru", "43", "45", "адрес", "Нет такого", "Да"]);
    xlsx(&rows)
});

pub const BORDERS_GEOJSON: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"name": "г. Грозный"},
         "geometry": {"type": "Polygon", "coordinates": [[[45.6, 43.3], [45.7, 43.3], [45.7, 43.4], [45.6, 43.3]]]}},
        {"type": "Feature", "properties": {"name": "Урус-Мартановский район"},
         "geometry": {"type": "Polygon", "coordinates": [[[45.5, 43.1], [45.6, 43.1], [45.5, 43.2], [45.5, 43.1]]]}},
        {"type": "Feature", "properties": {"name": "Somewhere else"},
         "geometry": {"type": "Polygon", "coordinates": [[[40.0, 40.0], [40.1, 40.0], [40.0, 40.1], [40.0, 40.0]]]}}
    ]
}"#;
