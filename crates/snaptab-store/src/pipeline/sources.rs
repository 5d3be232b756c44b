//! Source value extraction
//!
//! Resolves an RFC 6901 pointer against a document. Two extensions: a `*`
//! segment visits every element of an array, and an array found at the end
//! of the pointer contributes each of its scalar elements.

use serde_json::Value;

/// Collect the scalar values `pointer` selects in `doc`
///
/// Strings are returned as-is and numbers and booleans in their JSON
/// rendering. Nulls, objects, and missing paths contribute nothing.
pub fn extract_values(doc: &Value, pointer: &str) -> Vec<String> {
    let mut out = Vec::new();
    let segments: Vec<String> = match pointer.strip_prefix('/') {
        Some(rest) => rest.split('/').map(unescape).collect(),
        None if pointer.is_empty() => Vec::new(),
        None => return out,
    };
    walk(doc, &segments, &mut out);
    out
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

fn walk(value: &Value, segments: &[String], out: &mut Vec<String>) {
    let Some((head, rest)) = segments.split_first() else {
        collect_leaf(value, out);
        return;
    };

    match value {
        Value::Array(items) if head == "*" => {
            for item in items {
                walk(item, rest, out);
            }
        }
        Value::Array(items) => {
            if let Some(item) = head.parse::<usize>().ok().and_then(|i| items.get(i)) {
                walk(item, rest, out);
            }
        }
        Value::Object(map) => {
            if let Some(child) = map.get(head.as_str()) {
                walk(child, rest, out);
            }
        }
        _ => {}
    }
}

fn collect_leaf(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Number(n) => out.push(n.to_string()),
        Value::Bool(b) => out.push(b.to_string()),
        Value::Array(items) => {
            for item in items {
                if !item.is_array() {
                    collect_leaf(item, out);
                }
            }
        }
        Value::Null | Value::Object(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_pointer() {
        let doc = json!({"ids": {"scopus": "12345"}});
        assert_eq!(extract_values(&doc, "/ids/scopus"), vec!["12345"]);
    }

    #[test]
    fn test_wildcard_fan_out() {
        let doc = json!({
            "authorships": [
                {"countries": ["US", "FR"]},
                {"countries": []},
                {"countries": ["us"]}
            ]
        });
        assert_eq!(
            extract_values(&doc, "/authorships/*/countries"),
            vec!["US", "FR", "us"]
        );
    }

    #[test]
    fn test_missing_and_null_yield_nothing() {
        let doc = json!({"country_code": null});
        assert!(extract_values(&doc, "/country_code").is_empty());
        assert!(extract_values(&doc, "/nope/deeper").is_empty());
        assert!(extract_values(&doc, "no-leading-slash").is_empty());
    }

    #[test]
    fn test_escaped_segments() {
        let doc = json!({"a/b": {"m~n": 3}});
        assert_eq!(extract_values(&doc, "/a~1b/m~0n"), vec!["3"]);
    }
}
