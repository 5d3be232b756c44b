use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Write raw lines into `<root>/<entity>/updated_date=<date>/<file>`
#[allow(dead_code)]
pub fn write_lines(root: &Path, entity: &str, date: &str, file: &str, lines: &[&str]) {
    let dir = root.join(entity).join(format!("updated_date={}", date));
    fs::create_dir_all(&dir).unwrap();
    let mut encoder = GzEncoder::new(File::create(dir.join(file)).unwrap(), Compression::default());
    for line in lines {
        writeln!(encoder, "{}", line).unwrap();
    }
    encoder.finish().unwrap();
}

/// Write one JSON document per line
#[allow(dead_code)]
pub fn write_docs(root: &Path, entity: &str, date: &str, file: &str, docs: &[Value]) {
    let lines: Vec<String> = docs.iter().map(Value::to_string).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    write_lines(root, entity, date, file, &refs);
}
