//! Filter, sort and paginate pipeline over the in-memory list

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;

use crate::models::ExpenseRecord;

/// Lowercase, decompose and strip combining accents (U+0300..U+036F)
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Field the list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    CreadoEl,
    Gasto,
    TiempoDemora,
    Calificacion,
    Medio,
    Zona,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::CreadoEl,
        SortKey::Gasto,
        SortKey::TiempoDemora,
        SortKey::Calificacion,
        SortKey::Medio,
        SortKey::Zona,
    ];

    /// Selector label
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::CreadoEl => "Fecha",
            SortKey::Gasto => "Gasto",
            SortKey::TiempoDemora => "Demora",
            SortKey::Calificacion => "Calificación",
            SortKey::Medio => "Medio",
            SortKey::Zona => "Zona",
        }
    }

    fn compare(&self, a: &ExpenseRecord, b: &ExpenseRecord) -> Ordering {
        match self {
            SortKey::CreadoEl => a.creado_el.cmp(&b.creado_el),
            SortKey::Gasto => a.gasto.cmp(&b.gasto),
            SortKey::TiempoDemora => a.tiempo_demora.cmp(&b.tiempo_demora),
            SortKey::Calificacion => a.calificacion.cmp(&b.calificacion),
            SortKey::Medio => a.medio.label().cmp(b.medio.label()),
            SortKey::Zona => a.zona.cmp(&b.zona),
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::CreadoEl
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creadoEl" => Ok(SortKey::CreadoEl),
            "gasto" => Ok(SortKey::Gasto),
            "tiempoDemora" => Ok(SortKey::TiempoDemora),
            "calificacion" => Ok(SortKey::Calificacion),
            "medio" => Ok(SortKey::Medio),
            "zona" => Ok(SortKey::Zona),
            _ => Err(format!("Invalid sort key: {}", s)),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::CreadoEl => write!(f, "creadoEl"),
            SortKey::Gasto => write!(f, "gasto"),
            SortKey::TiempoDemora => write!(f, "tiempoDemora"),
            SortKey::Calificacion => write!(f, "calificacion"),
            SortKey::Medio => write!(f, "medio"),
            SortKey::Zona => write!(f, "zona"),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

impl Default for SortDir {
    fn default() -> Self {
        SortDir::Desc
    }
}

impl std::str::FromStr for SortDir {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

impl std::fmt::Display for SortDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDir::Asc => write!(f, "asc"),
            SortDir::Desc => write!(f, "desc"),
        }
    }
}

/// Search text, ordering and pagination cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    pub text: String,
    pub sort_key: SortKey,
    pub sort_dir: SortDir,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            text: String::new(),
            sort_key: SortKey::default(),
            sort_dir: SortDir::default(),
            page: 1,
            page_size: 5,
        }
    }
}

impl QueryState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }
}

/// One page of the filtered, sorted list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
    pub items: Vec<ExpenseRecord>,
    /// Effective page after clamping
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Matches before pagination
    pub total_count: usize,
    /// 1-based position of the first item shown, 0 when empty
    pub start_index: usize,
    /// 1-based position of the last item shown, 0 when empty
    pub end_index: usize,
}

/// Records whose medio, notes or zone contain the normalized query
pub fn filter<'a>(records: &'a [ExpenseRecord], text: &str) -> Vec<&'a ExpenseRecord> {
    let needle = normalize(text.trim());
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| r.search_fields().iter().any(|f| normalize(f).contains(&needle)))
        .collect()
}

/// Stable sort; direction flips the comparison so ties keep their order
pub fn sort(records: &mut [&ExpenseRecord], key: SortKey, dir: SortDir) {
    records.sort_by(|a, b| {
        let ord = key.compare(a, b);
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
}

/// Number of pages for `len` items, never less than one
pub fn total_pages(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    ((len + page_size - 1) / page_size).max(1)
}

/// Slice out `page` (clamped into range) of `items`
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> (Vec<T>, usize, usize) {
    let page_size = page_size.max(1);
    let pages = total_pages(items.len(), page_size);
    let page = page.clamp(1, pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    let slice = if start < end { items[start..end].to_vec() } else { Vec::new() };
    (slice, page, pages)
}

/// Run filter, sort and paginate for `query`
pub fn run(records: &[ExpenseRecord], query: &QueryState) -> PageView {
    let mut matched = filter(records, &query.text);
    sort(&mut matched, query.sort_key, query.sort_dir);

    let page_size = query.page_size.max(1);
    let (items, page, pages) = paginate(&matched, query.page, page_size);
    let total_count = matched.len();
    let (start_index, end_index) = if items.is_empty() {
        (0, 0)
    } else {
        let start = (page - 1) * page_size + 1;
        (start, start + items.len() - 1)
    };

    PageView {
        items: items.into_iter().cloned().collect(),
        page,
        page_size,
        total_pages: pages,
        total_count,
        start_index,
        end_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{seed_records, Medio};
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn record(id: u64, medio: Medio, zona: &str, gasto: Decimal, calificacion: u8) -> ExpenseRecord {
        ExpenseRecord {
            id,
            medio,
            anotaciones: format!("nota {}", id),
            zona: zona.to_string(),
            tiempo_demora: 10,
            gasto,
            calificacion,
            creado_el: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(id as i64),
        }
    }

    fn ids(records: &[ExpenseRecord]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Nueva Córdoba"), "nueva cordoba");
        assert_eq!(normalize("MONOPATÍN"), "monopatin");
        assert_eq!(normalize("Línea 60 – boleto"), "linea 60 – boleto");
        assert_eq!(normalize("ñandú"), "nandu");
    }

    #[test]
    fn test_filter_is_case_and_accent_insensitive() {
        let seed = seed_records();

        let hits: Vec<u64> = filter(&seed, "cordoba").iter().map(|r| r.id).collect();
        assert_eq!(hits, vec![3]);

        let hits: Vec<u64> = filter(&seed, "UBER").iter().map(|r| r.id).collect();
        assert_eq!(hits, vec![2]);

        let hits: Vec<u64> = filter(&seed, "  LINEA ").iter().map(|r| r.id).collect();
        assert_eq!(hits, vec![1]);
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let seed = seed_records();
        assert_eq!(filter(&seed, "").len(), 3);
        assert_eq!(filter(&seed, "   ").len(), 3);
    }

    #[test]
    fn test_every_hit_contains_query() {
        let seed = seed_records();
        for q in ["c", "ta", "centro", "dinámica", "o"] {
            let needle = normalize(q);
            for hit in filter(&seed, q) {
                assert!(hit.search_fields().iter().any(|f| normalize(f).contains(&needle)));
            }
        }
    }

    #[test]
    fn test_sort_by_gasto_both_directions() {
        let a = record(1, Medio::Colectivo, "Centro", Decimal::new(150, 0), 3);
        let b = record(2, Medio::App, "Cerro", Decimal::new(22005, 1), 5);
        let records = vec![a, b];

        let mut query = QueryState { sort_key: SortKey::Gasto, sort_dir: SortDir::Asc, ..QueryState::default() };
        assert_eq!(ids(&run(&records, &query).items), vec![1, 2]);

        query.sort_dir = SortDir::Desc;
        assert_eq!(ids(&run(&records, &query).items), vec![2, 1]);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let records = vec![
            record(1, Medio::Taxi, "A", Decimal::new(5, 0), 4),
            record(2, Medio::Taxi, "B", Decimal::new(5, 0), 2),
            record(3, Medio::Taxi, "C", Decimal::new(5, 0), 4),
            record(4, Medio::Taxi, "D", Decimal::new(5, 0), 2),
        ];

        let mut query = QueryState {
            sort_key: SortKey::Calificacion,
            sort_dir: SortDir::Asc,
            page_size: 10,
            ..QueryState::default()
        };
        assert_eq!(ids(&run(&records, &query).items), vec![2, 4, 1, 3]);

        query.sort_dir = SortDir::Desc;
        assert_eq!(ids(&run(&records, &query).items), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_sort_by_medio_uses_label() {
        let records = vec![
            record(1, Medio::Tren, "", Decimal::ONE, 1),
            record(2, Medio::App, "", Decimal::ONE, 1),
            record(3, Medio::Colectivo, "", Decimal::ONE, 1),
        ];
        let query = QueryState { sort_key: SortKey::Medio, sort_dir: SortDir::Asc, ..QueryState::default() };
        assert_eq!(ids(&run(&records, &query).items), vec![2, 3, 1]);
    }

    #[test]
    fn test_default_order_is_newest_first() {
        let seed = seed_records();
        assert_eq!(ids(&run(&seed, &QueryState::default()).items), vec![3, 2, 1]);
    }

    #[test]
    fn test_pages_concatenate_to_full_list() {
        let records: Vec<ExpenseRecord> = (1..=12)
            .map(|i| record(i, Medio::Subte, "Centro", Decimal::new(i as i64 * 10, 0), (i % 5 + 1) as u8))
            .collect();

        for page_size in [1, 3, 5, 7, 12, 20] {
            let mut query = QueryState { sort_key: SortKey::Gasto, page_size, ..QueryState::default() };
            let first = run(&records, &query);
            let mut all = Vec::new();
            for page in 1..=first.total_pages {
                query.page = page;
                all.extend(run(&records, &query).items);
            }
            query.page = 1;
            query.page_size = records.len();
            assert_eq!(ids(&all), ids(&run(&records, &query).items));
        }
    }

    #[test]
    fn test_page_past_end_is_clamped() {
        let seed = seed_records();
        let query = QueryState { page: 9, page_size: 2, ..QueryState::default() };
        let view = run(&seed, &query);

        assert_eq!(view.page, 2);
        assert_eq!(view.total_pages, 2);
        assert_eq!(ids(&view.items), vec![1]);
        assert_eq!((view.start_index, view.end_index), (3, 3));
    }

    #[test]
    fn test_empty_result_view() {
        let seed = seed_records();
        let query = QueryState { text: "avión".to_string(), page: 3, ..QueryState::default() };
        let view = run(&seed, &query);

        assert!(view.items.is_empty());
        assert_eq!(view.page, 1);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.total_count, 0);
        assert_eq!((view.start_index, view.end_index), (0, 0));
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let seed = seed_records();
        let query = QueryState { page_size: 0, ..QueryState::default() };
        let view = run(&seed, &query);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total_pages, 3);
    }

    #[test]
    fn test_sort_key_round_trip_names() {
        for key in SortKey::ALL {
            assert_eq!(key.to_string().parse::<SortKey>().unwrap(), key);
        }
        assert!("anotaciones".parse::<SortKey>().is_err());
        assert_eq!("ASC".parse::<SortDir>().unwrap(), SortDir::Asc);
    }
}
