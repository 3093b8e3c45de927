//! Domain Services
//!
//! Pure grouping, counting and ordering over rows already fetched from the
//! hosted database. Given the same input every function returns the same
//! output, so responses built on them are stable across repeated calls.

use crate::domain::entities::{
    AreaCount, AreaSubcategoryRow, ProviderArea, ProviderSummary, TaxonomyCount,
};
use crate::domain::value_objects::{AreaFilter, ProviderQuery, ProviderSort};
use chrono::{DateTime, FixedOffset};
use kernel::text::{loosely_matches, normalize_key};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Orders display labels by their normalized key, then by the label itself.
fn by_key(a: &str, b: &str) -> Ordering {
    normalize_key(a)
        .cmp(&normalize_key(b))
        .then_with(|| a.cmp(b))
}

/// Groups `(label, count)` pairs under `normalize_key(label)`.
///
/// The first label seen for a key becomes the display name and counts are
/// summed. Blank labels are skipped.
pub fn group_counts<'a, I>(items: I) -> Vec<AreaCount>
where
    I: IntoIterator<Item = (&'a str, i64)>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<AreaCount> = Vec::new();

    for (label, count) in items {
        let key = normalize_key(label);
        if key.is_empty() {
            continue;
        }
        match index.get(&key) {
            Some(&i) => groups[i].count += count,
            None => {
                index.insert(key, groups.len());
                groups.push(AreaCount {
                    name: label.trim().to_string(),
                    count,
                });
            }
        }
    }

    groups.sort_by(|a, b| by_key(&a.name, &b.name));
    groups
}

/// Rows of the area view matching `area`.
pub fn filter_area<'a>(
    rows: &'a [AreaSubcategoryRow],
    area: &'a AreaFilter,
) -> impl Iterator<Item = &'a AreaSubcategoryRow> + 'a {
    rows.iter()
        .filter(move |row| area.matches(row.judet.as_deref(), row.oras.as_deref()))
}

/// Sums `providers_count` per subcategory id, sorted by name.
pub fn aggregate_by_id<'a, I>(rows: I) -> Vec<TaxonomyCount>
where
    I: IntoIterator<Item = &'a AreaSubcategoryRow>,
{
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut out: Vec<TaxonomyCount> = Vec::new();

    for row in rows {
        let count = row.providers_count.unwrap_or(0);
        match index.get(&row.subcategory_id) {
            Some(&i) => out[i].count += count,
            None => {
                index.insert(row.subcategory_id, out.len());
                out.push(TaxonomyCount {
                    id: row.subcategory_id,
                    name: row.subcategory_name.clone(),
                    count,
                });
            }
        }
    }

    out.sort_by(|a, b| by_key(&a.name, &b.name).then(a.id.cmp(&b.id)));
    out
}

/// De-duplicates diacritic-insensitively, keeping the first spelling, sorted.
pub fn distinct_sorted<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out: Vec<String> = labels
        .into_iter()
        .filter_map(|label| {
            let label = label.as_ref().trim();
            let key = normalize_key(label);
            (!key.is_empty() && seen.insert(key)).then(|| label.to_string())
        })
        .collect();
    out.sort_by(|a, b| by_key(a, b));
    out
}

/// Exact de-duplication preserving first-seen order.
pub fn distinct_in_order<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .filter_map(|label| {
            let label = label.as_ref();
            (!label.is_empty() && seen.insert(label.to_string())).then(|| label.to_string())
        })
        .collect()
}

/// Names of the services offered by active providers inside `area`.
pub fn service_names_in_area(providers: &[ProviderArea], area: &AreaFilter) -> Vec<String> {
    distinct_sorted(
        providers
            .iter()
            .filter(|p| area.matches(p.judet.as_deref(), p.oras.as_deref()))
            .filter_map(|p| p.service_name.as_deref()),
    )
}

/// Provider counts per county, or per city of the county when one is set.
pub fn area_counts(providers: &[ProviderArea], area: &AreaFilter) -> Vec<AreaCount> {
    let by_city = area.has_judet();
    group_counts(
        providers
            .iter()
            .filter(|p| area.matches(p.judet.as_deref(), p.oras.as_deref()))
            .filter_map(|p| {
                let label = if by_city { &p.oras } else { &p.judet };
                label.as_deref().map(|l| (l, 1))
            }),
    )
}

/// One page of provider search results.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderMatches {
    pub items: Vec<ProviderSummary>,
    /// Matches before paging
    pub total: usize,
}

/// Filters, orders and pages provider rows.
///
/// Area is compared by normalized equality, service by loose match and the
/// subcategory must appear in `subcat_ids`.
pub fn search_providers(rows: Vec<ProviderSummary>, query: &ProviderQuery) -> ProviderMatches {
    let mut matches: Vec<ProviderSummary> = rows
        .into_iter()
        .filter(|row| query.area.matches(row.judet.as_deref(), row.oras.as_deref()))
        .filter(|row| {
            query.service.is_empty()
                || row
                    .service_name
                    .as_deref()
                    .is_some_and(|name| loosely_matches(name, &query.service))
        })
        .filter(|row| match query.subcategory {
            Some(id) => row.subcat_ids.as_ref().is_some_and(|ids| ids.contains(&id)),
            None => true,
        })
        .collect();

    sort_providers(&mut matches, query.sort);

    let total = matches.len();
    let from = (query.page - 1).saturating_mul(query.per_page).min(total);
    let to = from.saturating_add(query.per_page).min(total);
    let items = matches.drain(from..to).collect();

    ProviderMatches { items, total }
}

fn created_at(row: &ProviderSummary) -> Option<DateTime<FixedOffset>> {
    row.created_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
}

/// Stable sort. Rows without a parsable `created_at` go last for `Newest`
/// and first for `Oldest`.
pub fn sort_providers(rows: &mut [ProviderSummary], sort: ProviderSort) {
    match sort {
        ProviderSort::Newest => rows.sort_by_key(|row| std::cmp::Reverse(created_at(row))),
        ProviderSort::Oldest => rows.sort_by_key(created_at),
        ProviderSort::Name => rows.sort_by(|a, b| by_key(&a.company_name, &b.company_name)),
    }
}
