// Integration tests for pipeline configuration loading

use snaptab_core::ExErrorKind;
use snaptab_store::pipeline::{extract_values, parse_pipeline_file, parse_pipeline_str};
use snaptab_store::IdStrategy;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const FULL: &str = r#"
reference_dir: reference
progress_interval: 500
enumerations:
  - table: country
    id_column: country_id
    value_column: country_code
    normalize: uppercase
    sources:
      - entity: institutions
        pointer: /country_code
      - entity: works
        pointer: /authorships/*/countries
  - table: work_type
    id_column: work_type_id
    value_column: work_type
    bits: 16
    strategy: catalog
    reference_filename: types.csv
namespaces:
  - namespace: scopus_author
    id_column: scopus_author_id
    value_column: scopus_author
    sources:
      - entity: authors
        pointer: /ids/scopus
tables:
  - name: work
    columns: [work_id, title]
    dedup_key: [work_id]
"#;

#[test]
fn test_full_config_converts() {
    let config = parse_pipeline_str(FULL).unwrap();

    assert_eq!(config.reference_dir, Some(PathBuf::from("reference")));
    assert_eq!(config.progress_interval, Some(500));

    let enums = config.enumeration_configs();
    assert_eq!(enums.len(), 2);
    assert_eq!(enums[0].normalize(" us "), "US");
    assert_eq!(enums[0].reference_filename(), "country.tsv");
    assert_eq!(enums[1].bits, 16);
    assert_eq!(enums[1].strategy, IdStrategy::Catalog);
    assert_eq!(enums[1].reference_filename(), "types.csv");

    let namespaces = config.namespace_configs();
    assert_eq!(namespaces[0].filename, "scopus_author.tsv");

    let specs = config.table_specs();
    let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["work", "country", "work_type"]);
    assert_eq!(specs[1].dedup_key, vec!["country_id"]);

    assert_eq!(
        config.source_entities(),
        vec!["authors", "institutions", "works"]
    );
}

#[test]
fn test_validation_failures() {
    let cases = [
        (
            "duplicate table",
            r#"
enumerations:
  - {table: t, id_column: i, value_column: v}
tables:
  - {name: t}
"#,
        ),
        (
            "bits out of range",
            r#"
enumerations:
  - {table: t, id_column: i, value_column: v, bits: 64}
"#,
        ),
        (
            "pointer without slash",
            r#"
namespaces:
  - namespace: n
    id_column: i
    value_column: v
    sources: [{entity: works, pointer: ids.scopus}]
"#,
        ),
        (
            "dedup key outside columns",
            r#"
tables:
  - {name: t, columns: [a], dedup_key: [b]}
"#,
        ),
        (
            "shared reference file",
            r#"
enumerations:
  - {table: t, id_column: i, value_column: v}
namespaces:
  - {namespace: n, filename: t.tsv, id_column: i, value_column: v}
"#,
        ),
        ("bad strategy", "enumerations: [{table: t, id_column: i, value_column: v, strategy: random}]"),
    ];

    for (label, yaml) in cases {
        let err = parse_pipeline_str(yaml).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidConfig, "{}", label);
    }
}

#[test]
fn test_file_errors_carry_path() {
    let dir = TempDir::new().unwrap();

    let err = parse_pipeline_file(&dir.path().join("absent.yaml")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Io);

    let path = dir.path().join("bad.yaml");
    fs::write(&path, "enumerations: [{table: t}]\n").unwrap();
    let err = parse_pipeline_file(&path).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
    assert!(err.path().unwrap().ends_with("bad.yaml"));
}

#[test]
fn test_sources_resolve_against_documents() {
    let config = parse_pipeline_str(FULL).unwrap();
    let doc = serde_json::json!({
        "authorships": [{"countries": ["US"]}, {"countries": ["FR", "US"]}]
    });
    let source = &config.enumerations[0].sources[1];
    assert_eq!(extract_values(&doc, &source.pointer), vec!["US", "FR", "US"]);
}
