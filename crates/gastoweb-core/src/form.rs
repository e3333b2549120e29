//! Draft record shared by the create and edit forms

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::CoreError;
use crate::models::{ExpenseRecord, Medio};

pub const MSG_MEDIO: &str = "Elegí un medio de transporte.";
pub const MSG_GASTO: &str = "El gasto debe ser mayor a 0.";
pub const MSG_CALIFICACION: &str = "Debe estar entre 1 y 5.";
pub const MSG_DEMORA: &str = "La demora no puede ser negativa.";

/// In-progress form state. Numeric fields are wide enough to hold what the
/// user typed, out-of-range values included, so they can be reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub medio: Option<Medio>,
    pub anotaciones: String,
    pub zona: String,
    pub tiempo_demora: i64,
    pub gasto: Decimal,
    pub calificacion: i64,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            medio: Some(Medio::default()),
            anotaciones: String::new(),
            zona: String::new(),
            tiempo_demora: 0,
            gasto: Decimal::ZERO,
            calificacion: 3,
        }
    }
}

/// Inline messages shown under each field
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors {
    pub gasto: Option<&'static str>,
    pub calificacion: Option<&'static str>,
    pub tiempo_demora: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.gasto.is_none() && self.calificacion.is_none() && self.tiempo_demora.is_none()
    }
}

/// Draft fields that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub medio: Medio,
    pub anotaciones: String,
    pub zona: String,
    pub tiempo_demora: u32,
    pub gasto: Decimal,
    pub calificacion: u8,
}

impl ValidDraft {
    /// Overwrite everything except id and creation time
    pub fn apply_to(&self, record: &mut ExpenseRecord) {
        record.medio = self.medio;
        record.anotaciones = self.anotaciones.clone();
        record.zona = self.zona.clone();
        record.tiempo_demora = self.tiempo_demora;
        record.gasto = self.gasto;
        record.calificacion = self.calificacion;
    }
}

impl Draft {
    /// Load an existing record for editing
    pub fn from_record(record: &ExpenseRecord) -> Self {
        Self {
            medio: Some(record.medio),
            anotaciones: record.anotaciones.clone(),
            zona: record.zona.clone(),
            tiempo_demora: record.tiempo_demora as i64,
            gasto: record.gasto,
            calificacion: record.calificacion as i64,
        }
    }

    /// Build a draft from form-encoded fields. Unparsable numbers become 0
    /// and an unknown medio becomes `None`; validation reports both.
    pub fn from_form(params: &HashMap<String, String>) -> Self {
        let text = |name: &str| params.get(name).map(|s| s.trim().to_string()).unwrap_or_default();
        let int = |name: &str| params.get(name).and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(0);

        Self {
            medio: params.get("medio").and_then(|s| s.parse().ok()),
            anotaciones: text("anotaciones"),
            zona: text("zona"),
            tiempo_demora: int("tiempoDemora"),
            gasto: params.get("gasto").map(|s| parse_amount(s)).unwrap_or(Decimal::ZERO),
            calificacion: int("calificacion"),
        }
    }

    pub fn field_errors(&self) -> FieldErrors {
        FieldErrors {
            gasto: (self.gasto <= Decimal::ZERO).then_some(MSG_GASTO),
            calificacion: (!(1..=5).contains(&self.calificacion)).then_some(MSG_CALIFICACION),
            tiempo_demora: (self.tiempo_demora < 0).then_some(MSG_DEMORA),
        }
    }

    /// Check the draft, stopping at the first problem
    pub fn validate(&self) -> Result<ValidDraft, CoreError> {
        let medio = self.medio.ok_or_else(|| CoreError::validation("medio", MSG_MEDIO))?;
        let errors = self.field_errors();
        if let Some(message) = errors.gasto {
            return Err(CoreError::validation("gasto", message));
        }
        if let Some(message) = errors.calificacion {
            return Err(CoreError::validation("calificacion", message));
        }
        if let Some(message) = errors.tiempo_demora {
            return Err(CoreError::validation("tiempoDemora", message));
        }

        Ok(ValidDraft {
            medio,
            anotaciones: self.anotaciones.clone(),
            zona: self.zona.clone(),
            tiempo_demora: u32::try_from(self.tiempo_demora).unwrap_or(u32::MAX),
            gasto: self.gasto,
            calificacion: self.calificacion as u8,
        })
    }
}

/// Accepts `2200.5` as well as the local `2200,5`
fn parse_amount(raw: &str) -> Decimal {
    let cleaned = raw.trim().replace(',', ".");
    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_records;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn valid() -> Draft {
        Draft {
            gasto: Decimal::new(500, 0),
            ..Draft::default()
        }
    }

    #[test]
    fn test_default_draft() {
        let draft = Draft::default();
        assert_eq!(draft.medio, Some(Medio::Colectivo));
        assert_eq!(draft.calificacion, 3);
        // default gasto is 0, so a fresh draft is not yet savable
        assert_eq!(draft.field_errors().gasto, Some(MSG_GASTO));
    }

    #[test]
    fn test_valid_draft_passes() {
        let checked = valid().validate().unwrap();
        assert_eq!(checked.medio, Medio::Colectivo);
        assert_eq!(checked.calificacion, 3);
        assert!(valid().field_errors().is_empty());
    }

    #[test]
    fn test_missing_medio_reported_first() {
        let draft = Draft { medio: None, gasto: Decimal::ZERO, ..Draft::default() };
        match draft.validate() {
            Err(CoreError::Validation { field, message }) => {
                assert_eq!(field, "medio");
                assert_eq!(message, MSG_MEDIO);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_gasto_must_be_positive() {
        for gasto in [Decimal::ZERO, Decimal::new(-1, 0)] {
            let draft = Draft { gasto, ..valid() };
            assert!(matches!(draft.validate(), Err(CoreError::Validation { ref field, .. }) if field == "gasto"));
        }
    }

    #[test]
    fn test_calificacion_range() {
        for calificacion in [0, 6, -3] {
            let draft = Draft { calificacion, ..valid() };
            assert!(matches!(draft.validate(), Err(CoreError::Validation { ref field, .. }) if field == "calificacion"));
        }
        for calificacion in 1..=5 {
            let draft = Draft { calificacion, ..valid() };
            assert!(draft.validate().is_ok());
        }
    }

    #[test]
    fn test_negative_demora() {
        let draft = Draft { tiempo_demora: -5, ..valid() };
        assert_eq!(draft.field_errors().tiempo_demora, Some(MSG_DEMORA));
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_from_form() {
        let draft = Draft::from_form(&form(&[
            ("medio", "Taxi"),
            ("anotaciones", " Aeropuerto "),
            ("zona", "Norte"),
            ("tiempoDemora", "35"),
            ("gasto", "4500,75"),
            ("calificacion", "4"),
        ]));

        assert_eq!(draft.medio, Some(Medio::Taxi));
        assert_eq!(draft.anotaciones, "Aeropuerto");
        assert_eq!(draft.tiempo_demora, 35);
        assert_eq!(draft.gasto, Decimal::new(450075, 2));
        assert_eq!(draft.calificacion, 4);
    }

    #[test]
    fn test_from_form_is_lenient() {
        let draft = Draft::from_form(&form(&[("medio", "Avión"), ("gasto", "abc"), ("calificacion", "")]));

        assert_eq!(draft.medio, None);
        assert_eq!(draft.gasto, Decimal::ZERO);
        assert_eq!(draft.calificacion, 0);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut record = seed_records().remove(0);
        let created = record.creado_el;
        let draft = Draft { medio: Some(Medio::Tren), gasto: Decimal::new(99, 0), ..Draft::from_record(&record) };

        draft.validate().unwrap().apply_to(&mut record);

        assert_eq!(record.id, 1);
        assert_eq!(record.creado_el, created);
        assert_eq!(record.medio, Medio::Tren);
        assert_eq!(record.gasto, Decimal::new(99, 0));
        assert_eq!(record.zona, "Centro");
    }
}
