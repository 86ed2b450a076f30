//! Known districts and their map descriptors
//!
//! The table is ordered: border matching walks it front to back and the first
//! keyword found in a label wins, so a keyword must never appear after a more
//! general keyword that is its own substring.

use serde::Serialize;

/// Default map view covering the whole republic
pub const REGION_CENTER: [f64; 2] = [43.2, 45.7];
pub const REGION_ZOOM: u8 = 8;

/// A district descriptor: canonical name, id and how it is drawn on the map.
///
/// Entries without an id only colour border labels; no spreadsheet district
/// carries their name, so matching falls through to the next entry.
#[derive(Debug, Clone, Serialize)]
pub struct DistrictGeo {
    pub id: Option<u32>,
    /// Canonical name exactly as it appears in uploaded spreadsheets
    pub name: &'static str,
    pub short_name: &'static str,
    /// `[latitude, longitude]`
    pub center: [f64; 2],
    pub zoom: u8,
    /// Lowercase substring searched for in border labels
    pub border_keyword: &'static str,
    pub color: &'static str,
}

const fn geo(
    id: u32,
    name: &'static str,
    short_name: &'static str,
    center: [f64; 2],
    border_keyword: &'static str,
    color: &'static str,
) -> DistrictGeo {
    DistrictGeo {
        id: Some(id),
        name,
        short_name,
        center,
        zoom: 9,
        border_keyword,
        color,
    }
}

const fn unlisted(
    name: &'static str,
    short_name: &'static str,
    center: [f64; 2],
    border_keyword: &'static str,
    color: &'static str,
) -> DistrictGeo {
    DistrictGeo {
        id: None,
        name,
        short_name,
        center,
        zoom: 9,
        border_keyword,
        color,
    }
}

pub static DISTRICT_GEO: &[DistrictGeo] = &[
    geo(1, "Департамент образования Мэрии г.Грозного", "г. Грозный", [43.3169, 45.6981], "грозный", "#e74c3c"),
    geo(2, "Департамент образования г. Аргун", "г. Аргун", [43.2965, 45.8727], "аргун", "#3498db"),
    geo(3, "МУ 'Итум-Калинский РОО'", "Итум-Калинский район", [42.73, 45.57], "итум", "#2ecc71"),
    geo(4, "МУ 'Веденский РОО'", "Веденский район", [42.97, 46.1], "веден", "#9b59b6"),
    geo(5, "МУ 'Надтеречное РУО'", "Надтеречный район", [43.65, 45.32], "надтеречн", "#f39c12"),
    geo(6, "МУ 'Отдел образования Серноводского муниципального района'", "Сунженский район", [43.32, 45.38], "серновод", "#1abc9c"),
    // "шалинский" contains "шалинск"
    unlisted("Шалинский", "Шалинский р-н", [43.15, 45.9], "шалинский", "#55efc4"),
    geo(7, "МУ 'Отдел образования Шалинского муниципального района'", "Шалинский район", [43.15, 45.88], "шалинск", "#e67e22"),
    geo(8, "МУ 'Отдел образования Шатойского муниципального района'", "Шатойский район", [42.87, 45.68], "шатойск", "#2980b9"),
    geo(9, "МУ 'Шаройский районный отдел образования'", "Шаройский район", [42.68, 45.98], "шаройск", "#8e44ad"),
    geo(10, "МУ «Грозненское РУО»", "Грозненский район", [43.4, 45.55], "грозненск", "#27ae60"),
    // "урус-мартановск" contains "урус"
    geo(20, "Урус-Мартановский", "Урус-Мартановский р-н", [43.13, 45.54], "урус-мартановск", "#fab1a0"),
    geo(11, "МУ «Урус-Мартановское РУО»", "Урус-Мартановский район", [43.13, 45.53], "урус", "#d35400"),
    // "гудермесский" contains "гудерм"
    geo(18, "Гудермесский", "Гудермесский р-н", [43.35, 46.1], "гудермесский", "#a29bfe"),
    geo(12, "МУ»Управление образования Гудермесского муниципального района»", "Гудермесский район", [43.35, 46.1], "гудерм", "#c0392b"),
    geo(13, "Наурское РУО", "Наурский район", [43.65, 45.83], "наурск", "#16a085"),
    geo(14, "Ахматовский", "Ахматовский р-н", [43.318, 45.692], "ахматовск", "#e17055"),
    unlisted("Курчалоевский", "Курчалоевский р-н", [43.2, 46.09], "курчалоевск", "#6c5ce7"),
    geo(15, "Управление образования Курчалоевского муниципального района", "Курчалоевский район", [43.2, 46.08], "курчал", "#74b9ff"),
    geo(16, "Висаитовский", "Висаитовский р-н", [43.33, 45.64], "висаитовск", "#00cec9"),
    geo(17, "Шейх-Мансуровский", "Шейх-Мансуровский р-н", [43.31, 45.72], "мансуровск", "#fd79a8"),
    unlisted("Ачхой-Мартановский", "Ачхой-Мартановский р-н", [43.19, 45.28], "ачхой-мартановск", "#e84393"),
    geo(19, "Отдел образования Ачхой-Мартановского муниципального района", "Ачхой-Мартановский район", [43.19, 45.28], "ачхой", "#ff7675"),
    geo(24, "Управление образования Ножай-Юртовского муниципального района Чеченской Республики", "Ножай-Юртовский район", [43.08, 46.38], "ножай", "#00b894"),
    geo(25, "Управление образования Шелковского муниципального района", "Шелковской район", [43.51, 46.35], "шелковск", "#fdcb6e"),
];

/// Look up a known district by its canonical name (surrounding whitespace ignored)
pub fn known_district(name: &str) -> Option<&'static DistrictGeo> {
    let name = name.trim();
    DISTRICT_GEO
        .iter()
        .find(|d| d.id.is_some() && d.name == name)
}

pub fn known_district_by_id(id: u32) -> Option<&'static DistrictGeo> {
    DISTRICT_GEO.iter().find(|d| d.id == Some(id))
}

/// Known districts with their ids, sorted by id
pub fn known_districts_by_id() -> Vec<(u32, &'static DistrictGeo)> {
    let mut all: Vec<_> = DISTRICT_GEO
        .iter()
        .filter_map(|d| d.id.map(|id| (id, d)))
        .collect();
    all.sort_by_key(|(id, _)| *id);
    all
}
