//! Filtering, sorting and autocomplete over an in-memory record slice.
//!
//! Both entry points are pure: they borrow the collection, never mutate it,
//! and return references in a deterministic order.

use std::cmp::Reverse;

use crate::{FilterState, Record, SortOption};

/// Return the records matching `state`, ordered by `state.sort`.
///
/// All filter clauses are AND-combined. Selected types are conjunctive: a
/// record must carry every selected type. Ties in the chosen ordering fall
/// back to ascending id.
///
/// # Examples
///
/// ```
/// use pokedex_core::{FilterState, Record, filter_and_sort};
///
/// let records = vec![
///     Record { id: 4, name: "charmander".to_owned(), ..Record::default() },
///     Record { id: 7, name: "squirtle".to_owned(), ..Record::default() },
/// ];
/// let state = FilterState::default().with_search("char");
/// let found: Vec<u32> = filter_and_sort(&records, &state).iter().map(|r| r.id).collect();
/// assert_eq!(found, [4]);
/// ```
pub fn filter_and_sort<'a>(records: &'a [Record], state: &FilterState) -> Vec<&'a Record> {
    let term = normalise_query(&state.search);
    let mut selected: Vec<&Record> = records
        .iter()
        .filter(|record| matches_state(record, state, &term))
        .collect();
    sort_records(&mut selected, state.sort);
    selected
}

/// Suggest up to `max` records whose name contains `query`.
///
/// Only names are searched. Collection order is preserved, so a dataset
/// loaded in id order yields suggestions in id order. A blank query yields
/// nothing rather than the whole collection.
///
/// # Examples
///
/// ```
/// use pokedex_core::{Record, autocomplete_suggestions};
///
/// let records = vec![
///     Record { id: 16, name: "pidgey".to_owned(), ..Record::default() },
///     Record { id: 25, name: "pikachu".to_owned(), ..Record::default() },
/// ];
/// assert_eq!(autocomplete_suggestions(&records, "PI", 1).len(), 1);
/// assert!(autocomplete_suggestions(&records, "   ", 5).is_empty());
/// ```
pub fn autocomplete_suggestions<'a>(
    records: &'a [Record],
    query: &str,
    max: usize,
) -> Vec<&'a Record> {
    let term = normalise_query(query);
    if term.is_empty() || max == 0 {
        return Vec::new();
    }
    records
        .iter()
        .filter(|record| name_contains(record, &term))
        .take(max)
        .collect()
}

/// Trim and lowercase a raw query string.
pub fn normalise_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn matches_state(record: &Record, state: &FilterState, term: &str) -> bool {
    matches_search(record, term)
        && state.types.iter().all(|wanted| record.has_type(wanted))
        && state.generation.matches(record.generation.as_deref())
        && state
            .legendary
            .matches(record.is_legendary, record.is_mythical)
}

fn matches_search(record: &Record, term: &str) -> bool {
    term.is_empty()
        || name_contains(record, term)
        || record
            .types
            .iter()
            .any(|type_name| type_name.to_lowercase().contains(term))
        || record
            .abilities
            .iter()
            .any(|ability| ability.name.to_lowercase().contains(term))
}

fn name_contains(record: &Record, term: &str) -> bool {
    record.name.to_lowercase().contains(term)
        || record.display_name().to_lowercase().contains(term)
}

fn sort_records(records: &mut [&Record], option: SortOption) {
    match option {
        SortOption::IdAsc => records.sort_by_key(|record| record.id),
        SortOption::IdDesc => records.sort_by_key(|record| Reverse(record.id)),
        SortOption::NameAsc => {
            records.sort_by_cached_key(|record| (record.display_name().to_lowercase(), record.id));
        }
        SortOption::TotalStatsDesc => {
            records.sort_by_cached_key(|record| (Reverse(record.total_stats()), record.id));
        }
    }
}
