// Integration tests for the TSV table sink behind the emitter

use snaptab_core::{Row, TableEmitter, TableSpec};
use snaptab_store::TsvTableSink;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_emitter_dedup_reaches_disk_once() {
    let dir = TempDir::new().unwrap();
    let specs = vec![
        TableSpec::new("source")
            .with_columns(["source_id", "display_name"])
            .with_dedup_key(["source_id"]),
        TableSpec::new("work_source").with_columns(["work_id", "source_id"]),
    ];
    let sink = TsvTableSink::create(dir.path().join("out"), &specs).unwrap();
    let mut emitter = TableEmitter::new(sink, specs).unwrap();

    let source = Row::new()
        .with("source_id", 10u64)
        .with("display_name", "Nature");
    for work_id in [1u64, 2] {
        emitter.emit("source", &source).unwrap();
        emitter
            .emit(
                "work_source",
                &Row::new().with("work_id", work_id).with("source_id", 10u64),
            )
            .unwrap();
    }

    let mut sink = emitter.into_sink();
    sink.flush().unwrap();
    assert_eq!(sink.row_counts().get("source"), Some(&1));

    let source_tsv = fs::read_to_string(dir.path().join("out/source.tsv")).unwrap();
    assert_eq!(source_tsv, "source_id\tdisplay_name\n10\tNature\n");

    let link_tsv = fs::read_to_string(dir.path().join("out/work_source.tsv")).unwrap();
    assert_eq!(link_tsv, "work_id\tsource_id\n1\t10\n2\t10\n");
}

#[test]
fn test_columns_follow_declared_order_not_row_order() {
    let dir = TempDir::new().unwrap();
    let spec = TableSpec::new("author").with_columns(["author_id", "name", "orcid"]);
    let mut sink = TsvTableSink::create(dir.path(), &[spec.clone()]).unwrap();

    {
        let mut emitter = TableEmitter::new(&mut sink, [spec]).unwrap();
        emitter
            .emit(
                "author",
                &Row::new().with("name", "Ada").with("author_id", 5u64),
            )
            .unwrap();
    }
    sink.flush().unwrap();

    let content = fs::read_to_string(dir.path().join("author.tsv")).unwrap();
    assert_eq!(content, "author_id\tname\torcid\n5\tAda\t\n");
}

#[test]
fn test_declared_table_without_rows_keeps_its_header() {
    let dir = TempDir::new().unwrap();
    let specs = [
        TableSpec::new("work_country").with_columns(["work_id", "country_id"]),
        TableSpec::new("scratch"),
    ];
    let mut sink = TsvTableSink::create(dir.path(), &specs).unwrap();
    sink.flush().unwrap();

    let content = fs::read_to_string(dir.path().join("work_country.tsv")).unwrap();
    assert_eq!(content, "work_id\tcountry_id\n");
    assert_eq!(sink.row_counts().get("work_country"), Some(&0));
    assert!(!dir.path().join("scratch.tsv").exists());
}
