use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::{
    destination::{Destination, DestinationId},
    facets::AvailableFacets,
    filter::{FilterSpec, SortDirection, SortField, SortOrder},
};

pub const DEFAULT_POPULAR_LIMIT: usize = 8;

/// Apply every active predicate of `spec` to `catalog` and return the
/// survivors as a new vector.
///
/// Predicates are AND-ed: text search, region, category, activity, price
/// range, rating floor. Inactive predicates (absent, empty, zero) are skipped.
/// Catalog order is kept unless `spec.sort` asks for something else, in which
/// case the sort is stable.
pub fn filter_destinations(catalog: &[Destination], spec: &FilterSpec) -> Vec<Destination> {
    let needle = spec.search_needle();
    let rating_floor = spec.rating_floor();

    let mut results: Vec<Destination> = catalog
        .iter()
        .filter(|d| needle.as_deref().map_or(true, |q| matches_search(d, q)))
        .filter(|d| spec.regions.is_empty() || matches_region(d, &spec.regions))
        .filter(|d| spec.categories.is_empty() || intersects(&d.categories, &spec.categories))
        .filter(|d| spec.activities.is_empty() || intersects(&d.activities, &spec.activities))
        .filter(|d| spec.price_range.map_or(true, |range| range.contains(d.price)))
        .filter(|d| rating_floor.map_or(true, |floor| d.rating >= floor))
        .cloned()
        .collect();

    if let Some(order) = spec.sort {
        sort_destinations(&mut results, order);
    }

    debug!(
        "Filtered {} destinations down to {} ({} active filters)",
        catalog.len(),
        results.len(),
        spec.active_filter_count()
    );

    results
}

/// Distinct regions, categories and activities across the whole catalog.
/// Always computed from the unfiltered catalog so a selected facet never
/// hides its siblings.
pub fn derive_available_facets(catalog: &[Destination]) -> AvailableFacets {
    let mut facets = AvailableFacets::default();

    for destination in catalog {
        if let Some(region) = &destination.region {
            facets.regions.insert(region.clone());
        }
        facets
            .categories
            .extend(destination.categories.iter().cloned());
        facets
            .activities
            .extend(destination.activities.iter().cloned());
    }

    facets
}

/// Destinations flagged popular, best rated first, at most `limit` of them.
pub fn popular_destinations(catalog: &[Destination], limit: usize) -> Vec<Destination> {
    let mut popular: Vec<Destination> = catalog.iter().filter(|d| d.is_popular).cloned().collect();
    sort_destinations(
        &mut popular,
        SortOrder::new(SortField::Rating, SortDirection::Desc),
    );
    popular.truncate(limit);
    popular
}

pub fn find_destination<'a>(
    catalog: &'a [Destination],
    id: &DestinationId,
) -> Option<&'a Destination> {
    catalog.iter().find(|d| &d.id == id)
}

/// Stable in-place sort. Unpriced destinations always go last.
pub fn sort_destinations(destinations: &mut [Destination], order: SortOrder) {
    destinations.sort_by(|a, b| {
        let ordering = match order.field {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Rating => a.rating.total_cmp(&b.rating),
            SortField::Price => match (a.price, b.price) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        match order.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn matches_search(destination: &Destination, needle: &str) -> bool {
    destination.name.to_lowercase().contains(needle)
        || contains_folded(destination.location.as_deref(), needle)
        || contains_folded(destination.country.as_deref(), needle)
        || destination.description.to_lowercase().contains(needle)
}

fn contains_folded(field: Option<&str>, needle: &str) -> bool {
    field.map_or(false, |value| value.to_lowercase().contains(needle))
}

fn matches_region(destination: &Destination, regions: &BTreeSet<String>) -> bool {
    destination
        .region
        .as_ref()
        .map_or(false, |region| regions.contains(region))
}

fn intersects(tags: &[String], wanted: &BTreeSet<String>) -> bool {
    tags.iter().any(|tag| wanted.contains(tag))
}
