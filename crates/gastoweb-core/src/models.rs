//! Core data models for the expense book

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transport mode. The set is closed; the serialized form is the label shown
/// in the UI so stored lists stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Medio {
    Colectivo,
    Taxi,
    Remis,
    #[serde(rename = "App (Uber/Cabify)")]
    App,
    Subte,
    Tren,
    #[serde(rename = "Bici Publica")]
    BiciPublica,
    #[serde(rename = "Monopatín")]
    Monopatin,
    Caminando,
}

impl Medio {
    /// Every mode, in the order the selector lists them
    pub const ALL: [Medio; 9] = [
        Medio::Colectivo,
        Medio::Taxi,
        Medio::Remis,
        Medio::App,
        Medio::Subte,
        Medio::Tren,
        Medio::BiciPublica,
        Medio::Monopatin,
        Medio::Caminando,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Medio::Colectivo => "Colectivo",
            Medio::Taxi => "Taxi",
            Medio::Remis => "Remis",
            Medio::App => "App (Uber/Cabify)",
            Medio::Subte => "Subte",
            Medio::Tren => "Tren",
            Medio::BiciPublica => "Bici Publica",
            Medio::Monopatin => "Monopatín",
            Medio::Caminando => "Caminando",
        }
    }
}

impl Default for Medio {
    fn default() -> Self {
        Medio::Colectivo
    }
}

impl std::str::FromStr for Medio {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Medio::ALL
            .iter()
            .find(|m| m.label().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Invalid transport mode: {}", s))
    }
}

impl std::fmt::Display for Medio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One logged trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    /// Unique within the list; assigned as max id + 1
    pub id: u64,
    pub medio: Medio,
    /// Free-text notes
    #[serde(default)]
    pub anotaciones: String,
    /// Neighbourhood or area
    #[serde(default)]
    pub zona: String,
    /// Trip duration in minutes
    #[serde(default)]
    pub tiempo_demora: u32,
    /// Amount spent, always > 0 once stored
    #[serde(with = "rust_decimal::serde::float")]
    pub gasto: Decimal,
    /// Rating, 1 to 5
    pub calificacion: u8,
    /// Creation time. Never changes after the record is created.
    #[serde(default = "Utc::now")]
    pub creado_el: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Searchable text fields, in match order
    pub fn search_fields(&self) -> [&str; 3] {
        [self.medio.label(), &self.anotaciones, &self.zona]
    }
}

fn seed_time(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Records used when nothing usable is persisted yet
pub fn seed_records() -> Vec<ExpenseRecord> {
    vec![
        ExpenseRecord {
            id: 1,
            medio: Medio::Colectivo,
            anotaciones: "Línea 60 – boleto común".to_string(),
            zona: "Centro".to_string(),
            tiempo_demora: 25,
            gasto: Decimal::new(150, 0),
            calificacion: 3,
            creado_el: seed_time(2024, 3, 2, 10, 15),
        },
        ExpenseRecord {
            id: 2,
            medio: Medio::App,
            anotaciones: "Tarifa dinámica baja".to_string(),
            zona: "Cerro".to_string(),
            tiempo_demora: 18,
            gasto: Decimal::new(22005, 1),
            calificacion: 5,
            creado_el: seed_time(2024, 4, 21, 8, 0),
        },
        ExpenseRecord {
            id: 3,
            medio: Medio::Taxi,
            anotaciones: "Tramo corto".to_string(),
            zona: "Nueva Córdoba".to_string(),
            tiempo_demora: 10,
            gasto: Decimal::new(1100, 0),
            calificacion: 4,
            creado_el: seed_time(2024, 5, 11, 19, 30),
        },
    ]
}
