// Integration tests for dense catalog assignment and reload

use proptest::prelude::*;
use snaptab_core::ids::IdentifierAssigner;
use snaptab_core::logging_facility::init_test_capture;
use snaptab_core::{Normalizer, PENDING_ID};
use snaptab_core_types::schema::{EVENT_END, EVENT_START};
use snaptab_store::{EnumerationConfig, IdCatalog, NamespaceConfig};
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

fn country() -> EnumerationConfig {
    EnumerationConfig::new("country", "country_id", "country")
        .with_normalizer(Normalizer::lowercase())
}

fn scopus() -> NamespaceConfig {
    NamespaceConfig::new(
        "scopus_author",
        "scopus_author.tsv",
        "scopus_author_id",
        "scopus_author",
    )
}

fn new_catalog() -> IdCatalog {
    IdCatalog::new([country()], [scopus()])
}

fn mapping(catalog: &IdCatalog, name: &str) -> BTreeMap<String, u64> {
    catalog
        .assignments()
        .get(name)
        .map(|a| a.iter().map(|(id, v)| (v.to_string(), id)).collect())
        .unwrap_or_default()
}

#[test]
fn test_country_example_orders_by_canonical_key() {
    let dir = TempDir::new().unwrap();
    let mut catalog = new_catalog();
    for value in ["US", "us", "FR"] {
        catalog.record_enum("country", value).unwrap();
    }

    catalog.finalize(dir.path()).unwrap();

    let expected: BTreeMap<String, u64> =
        [("fr".to_string(), 1), ("us".to_string(), 2)].into_iter().collect();
    assert_eq!(mapping(&catalog, "country"), expected);

    let content = fs::read_to_string(dir.path().join("country.tsv")).unwrap();
    assert_eq!(content, "country_id\tcountry\n1\tfr\n2\tus\n");
}

#[test]
fn test_case_variants_in_raw_namespace_sort_together() {
    let dir = TempDir::new().unwrap();
    let mut catalog = new_catalog();
    for value in ["b", "B", "a"] {
        catalog.record_namespace("scopus_author", value).unwrap();
    }
    catalog.finalize(dir.path()).unwrap();

    let assignment = catalog.namespace_assignments("scopus_author").unwrap();
    assert_eq!(assignment.get("a"), Some(1));
    assert_eq!(assignment.get("B"), Some(2));
    assert_eq!(assignment.get("b"), Some(3));
}

#[test]
fn test_finalize_then_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut first = new_catalog();
    for value in ["de", "JP", "br"] {
        first.record_enum("country", value).unwrap();
    }
    for value in ["7004", "1001", "55"] {
        first.record_namespace("scopus_author", value).unwrap();
    }
    first.finalize(dir.path()).unwrap();

    let mut second = new_catalog();
    assert!(second.load_existing(dir.path()).unwrap());

    assert_eq!(mapping(&first, "country"), mapping(&second, "country"));
    assert_eq!(
        mapping(&first, "scopus_author"),
        mapping(&second, "scopus_author")
    );
    assert_eq!(second.lookup("scopus_author", "55"), first.lookup("scopus_author", "55"));
}

#[test]
fn test_load_missing_file_returns_false_and_keeps_state() {
    let dir = TempDir::new().unwrap();
    let mut catalog = new_catalog();
    catalog.record_enum("country", "fr").unwrap();
    catalog.finalize(dir.path()).unwrap();

    fs::remove_file(dir.path().join("scopus_author.tsv")).unwrap();

    let mut fresh = new_catalog();
    assert!(!fresh.load_existing(dir.path()).unwrap());
    assert!(fresh.assignments().is_empty());

    assert!(!catalog.load_existing(&dir.path().join("absent")).unwrap());
    assert_eq!(catalog.enum_assignments("country").unwrap().get("fr"), Some(1));
}

#[test]
fn test_load_skips_malformed_rows_and_reads_comma_with_bom() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("country.tsv"),
        "\u{feff}country_id,country\n1,fr\nx,de\n0,it\n3,\n2,us\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("scopus_author.tsv"),
        "scopus_author_id\tscopus_author\n",
    )
    .unwrap();

    let mut catalog = new_catalog();
    assert!(catalog.load_existing(dir.path()).unwrap());

    let expected: BTreeMap<String, u64> =
        [("fr".to_string(), 1), ("us".to_string(), 2)].into_iter().collect();
    assert_eq!(mapping(&catalog, "country"), expected);
}

#[test]
fn test_collecting_mode_records_and_returns_pending() {
    let dir = TempDir::new().unwrap();
    let mut catalog = new_catalog();

    let assigner: &mut dyn IdentifierAssigner = &mut catalog;
    assert_eq!(assigner.assign("scopus_author", "900", 63).unwrap(), PENDING_ID);
    assert!(assigner.assign("orcid", "0000", 63).is_err());

    catalog.finalize(dir.path()).unwrap();
    assert_eq!(catalog.lookup("scopus_author", "900"), Some(1));
}

proptest! {
    #[test]
    fn prop_assignment_independent_of_record_order(
        values in prop::collection::vec("[a-zA-Z]{1,6}", 1..40),
        seed in any::<u64>(),
    ) {
        let mut shuffled = values.clone();
        // deterministic rotation + reversal stands in for a shuffle
        let len = shuffled.len();
        shuffled.rotate_left((seed as usize) % len);
        if seed % 2 == 0 {
            shuffled.reverse();
        }

        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();
        let mut a = new_catalog();
        let mut b = new_catalog();
        for v in &values {
            a.record_namespace("scopus_author", v).unwrap();
        }
        for v in &shuffled {
            b.record_namespace("scopus_author", v).unwrap();
        }
        a.finalize(dir_a.path()).unwrap();
        b.finalize(dir_b.path()).unwrap();

        prop_assert_eq!(mapping(&a, "scopus_author"), mapping(&b, "scopus_author"));

        let mut reloaded = new_catalog();
        prop_assert!(reloaded.load_existing(dir_b.path()).unwrap());
        prop_assert_eq!(mapping(&a, "scopus_author"), mapping(&reloaded, "scopus_author"));
    }
}

#[test]
fn test_finalize_and_load_log_boundaries() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let mut catalog = new_catalog();
    catalog.record_enum("country", "se").unwrap();

    catalog.finalize(dir.path()).unwrap();
    assert!(catalog.load_existing(dir.path()).unwrap());

    capture.assert_event_exists("catalog_finalize", EVENT_START);
    capture.assert_event_exists("catalog_finalize", EVENT_END);
    assert!(capture
        .events_for_op("catalog_load")
        .iter()
        .any(|e| e.event() == Some(EVENT_END) && e.field("available") == Some("true")));
}
