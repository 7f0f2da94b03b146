use bson::{doc, Document};
use std::collections::BTreeSet;

use crate::models::{
    catalog_record::PriceBasis,
    filter::{FilterSpec, SortDirection, SortField},
};

/// Build the record-store filter for `spec`.
///
/// Predicates match `filter_destinations` over every row shape the adapter
/// accepts. Regions and tags are compared after trimming, so they go down as
/// anchored regexes rather than `$in`; a regex on an array field tests each
/// element, which covers tag arrays and comma-joined tag strings alike. The
/// result may still hold rows the adapter would reshape out of range, so
/// callers re-filter locally.
pub fn build_destination_filter(spec: &FilterSpec, basis: PriceBasis) -> Document {
    let mut filter = Document::new();
    let mut clauses: Vec<Document> = Vec::new();

    if let Some(needle) = spec.search_needle() {
        let pattern = regex::escape(&needle);
        let text_fields = ["name", "Name", "location", "country", "description"];
        clauses.push(doc! {
            "$or": text_fields
                .iter()
                .map(|field| doc! { *field: { "$regex": pattern.as_str(), "$options": "i" } })
                .collect::<Vec<Document>>()
        });
    }

    if !spec.regions.is_empty() {
        filter.insert("region", doc! { "$regex": whole_value_pattern(&spec.regions) });
    }

    if !spec.categories.is_empty() {
        let pattern = joined_tag_pattern(&spec.categories);
        clauses.push(doc! {
            "$or": [
                { "category": { "$regex": pattern.as_str() } },
                { "type": { "$regex": pattern.as_str() } },
            ]
        });
    }

    if !spec.activities.is_empty() {
        let pattern = whole_value_pattern(&spec.activities);
        clauses.push(doc! {
            "$or": [
                { "activities": { "$regex": pattern.as_str() } },
                { "activities.name": { "$regex": pattern.as_str() } },
            ]
        });
    }

    if let Some(range) = spec.price_range {
        let (lo, hi) = range.normalized();
        let mut bounds = doc! { "$gte": lo };
        if hi.is_finite() {
            bounds.insert("$lte", hi);
        }
        filter.insert(price_column(basis), bounds);
    }

    if let Some(floor) = spec.rating_floor() {
        filter.insert("rating", doc! { "$gte": floor });
    }

    match clauses.len() {
        0 => {}
        1 => {
            for (key, value) in clauses.remove(0) {
                filter.insert(key, value);
            }
        }
        _ => {
            filter.insert("$and", clauses);
        }
    }

    filter
}

/// Store-side ordering for `spec.sort`, or `None` to keep natural order.
pub fn build_destination_sort(spec: &FilterSpec, basis: PriceBasis) -> Option<Document> {
    let order = spec.sort?;
    let field = match order.field {
        SortField::Name => "name",
        SortField::Price => price_column(basis),
        SortField::Rating => "rating",
    };
    let direction = match order.direction {
        SortDirection::Asc => 1,
        SortDirection::Desc => -1,
    };
    Some(doc! { field: direction })
}

fn price_column(basis: PriceBasis) -> &'static str {
    match basis {
        PriceBasis::Price => "price",
        PriceBasis::Budget => "budget",
    }
}

/// Case-sensitive match of one whole (trimmed) value against any of `wanted`.
fn whole_value_pattern(wanted: &BTreeSet<String>) -> String {
    format!(r"^\s*({})\s*$", alternation(wanted))
}

/// Like [`whole_value_pattern`], but also finds the value as one item of a
/// comma-joined list.
fn joined_tag_pattern(wanted: &BTreeSet<String>) -> String {
    format!(r"(^|,)\s*({})\s*(,|$)", alternation(wanted))
}

fn alternation(wanted: &BTreeSet<String>) -> String {
    wanted
        .iter()
        .map(|value| regex::escape(value))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_spec_builds_empty_filter() {
        assert!(build_destination_filter(&FilterSpec::default(), PriceBasis::Price).is_empty());
        assert!(build_destination_sort(&FilterSpec::default(), PriceBasis::Price).is_none());
    }

    #[test]
    fn test_search_is_escaped_and_case_insensitive() {
        let spec = FilterSpec::new().with_search("St. Lucia (West)");
        let filter = build_destination_filter(&spec, PriceBasis::Price);

        let branches = filter.get_array("$or").unwrap();
        assert_eq!(branches.len(), 5);
        let first = branches[0].as_document().unwrap();
        let name = first.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), r"st\. lucia \(west\)");
        assert_eq!(name.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_crossed_range_uses_price_column() {
        let spec = FilterSpec::new().with_price_range(500.0, 100.0);

        let filter = build_destination_filter(&spec, PriceBasis::Budget);
        let budget = filter.get_document("budget").unwrap();
        assert_eq!(budget.get_f64("$gte").unwrap(), 100.0);
        assert_eq!(budget.get_f64("$lte").unwrap(), 500.0);
        assert!(!filter.contains_key("price"));
    }

    #[test]
    fn test_open_ended_range_has_no_upper_bound() {
        let mut spec = FilterSpec::new();
        spec.price_range = Some(crate::models::filter::PriceRange::at_least(200.0));
        let filter = build_destination_filter(&spec, PriceBasis::Price);
        let price = filter.get_document("price").unwrap();
        assert!(!price.contains_key("$lte"));
    }

    #[test]
    fn test_zero_rating_is_not_pushed_down() {
        let spec = FilterSpec::new().with_min_rating(0.0);
        assert!(build_destination_filter(&spec, PriceBasis::Price).is_empty());

        let spec = FilterSpec::new().with_min_rating(4.5);
        let filter = build_destination_filter(&spec, PriceBasis::Price);
        assert_eq!(filter.get_document("rating").unwrap().get_f64("$gte").unwrap(), 4.5);
    }

    #[test]
    fn test_multiple_or_groups_are_anded() {
        let spec = FilterSpec::new()
            .with_search("bay")
            .with_categories(["beach"])
            .with_activities(["surfing"])
            .with_regions(["Asia"]);
        let filter = build_destination_filter(&spec, PriceBasis::Price);

        assert!(!filter.contains_key("$or"));
        assert_eq!(filter.get_array("$and").unwrap().len(), 3);
        assert!(filter.contains_key("region"));
    }

    fn pushed_pattern(filter: &Document, branch: usize, field: &str) -> regex::Regex {
        let clause = filter.get_array("$or").unwrap()[branch].as_document().unwrap();
        let pattern = clause.get_document(field).unwrap().get_str("$regex").unwrap();
        regex::Regex::new(pattern).unwrap()
    }

    #[test]
    fn test_category_pattern_matches_stored_shapes() {
        let spec = FilterSpec::new().with_categories(["Wellness", "Hot Springs (Onsen)"]);
        let filter = build_destination_filter(&spec, PriceBasis::Budget);

        let category = pushed_pattern(&filter, 0, "category");
        let kind = pushed_pattern(&filter, 1, "type");
        for pattern in [&category, &kind] {
            assert!(pattern.is_match("Wellness"));
            assert!(pattern.is_match(" Wellness "));
            assert!(pattern.is_match("Beach, Wellness"));
            assert!(pattern.is_match("Wellness,Beach"));
            assert!(pattern.is_match("Beach , Hot Springs (Onsen) ,Spa"));
            assert!(!pattern.is_match("Wellness Retreat"));
            assert!(!pattern.is_match("wellness"));
            assert!(!pattern.is_match("Beach, Spa"));
        }
    }

    #[test]
    fn test_region_and_activity_match_trimmed_whole_values() {
        let spec = FilterSpec::new().with_regions(["Asia"]);
        let filter = build_destination_filter(&spec, PriceBasis::Budget);
        let pattern = regex::Regex::new(
            filter.get_document("region").unwrap().get_str("$regex").unwrap(),
        )
        .unwrap();
        assert!(pattern.is_match("Asia"));
        assert!(pattern.is_match("  Asia "));
        assert!(!pattern.is_match("Southeast Asia"));
        assert!(!pattern.is_match("Asia, Europe"));

        let spec = FilterSpec::new().with_activities(["Surfing"]);
        let filter = build_destination_filter(&spec, PriceBasis::Budget);
        for branch in [(0, "activities"), (1, "activities.name")] {
            let pattern = pushed_pattern(&filter, branch.0, branch.1);
            assert!(pattern.is_match(" Surfing"));
            assert!(!pattern.is_match("Surfing lessons"));
        }
    }

    #[test]
    fn test_sort_document() {
        let spec = FilterSpec::new().sorted_by(SortField::Price, SortDirection::Desc);
        assert_eq!(
            build_destination_sort(&spec, PriceBasis::Budget),
            Some(doc! { "budget": -1 })
        );
    }
}
