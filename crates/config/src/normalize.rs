//! Source normalization: any [`Source`] to an ordered list of name/value
//! pairs.
//!
//! Lists flatten in order and duplicates are kept, so a later pair for the
//! same name overrides an earlier one once applied. Keys written in symbol
//! form (`:name`) are reported as `name`.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};
use crate::format::parse_document;
use crate::loader::LoadOptions;
use crate::source::{ConfigFormat, Source};

/// One name/value pair from a source.
pub type Pair = (String, Value);

/// Flatten `source` into pairs, reading and parsing as needed.
pub fn normalize(source: Source, options: &LoadOptions) -> ConfigResult<Vec<Pair>> {
    let mut pairs = Vec::new();
    collect(source, options, &mut pairs)?;
    Ok(pairs)
}

fn collect(source: Source, options: &LoadOptions, out: &mut Vec<Pair>) -> ConfigResult<()> {
    match source {
        Source::Map(map) => {
            extend_from_map(map, out);
            Ok(())
        }
        Source::Value(value) => collect_value(value, options, out),
        Source::Str(s) => collect_path(Path::new(&s), options, out),
        Source::Path(path) => collect_path(&path, options, out),
        Source::File(mut file) => {
            let content = read_all(&mut file, "file handle")?;
            collect_document(&content, options.stream_format(), "file handle", out)
        }
        Source::Reader { mut reader, format } => {
            let content = read_all(&mut reader, "reader")?;
            let format = format.unwrap_or(options.stream_format());
            collect_document(&content, format, "reader", out)
        }
        Source::List(items) => {
            for item in items {
                collect(item, options, out)?;
            }
            Ok(())
        }
    }
}

fn collect_value(value: Value, options: &LoadOptions, out: &mut Vec<Pair>) -> ConfigResult<()> {
    match value {
        Value::Object(map) => {
            extend_from_map(map, out);
            Ok(())
        }
        Value::String(s) => collect_path(Path::new(&s), options, out),
        Value::Array(items) => {
            for item in items {
                collect_value(item, options, out)?;
            }
            Ok(())
        }
        Value::Null => Err(ConfigError::unsupported_source("null", "null is not a source")),
        Value::Bool(_) => Err(ConfigError::unsupported_source(
            "boolean",
            "expected a map, a file path or a list",
        )),
        Value::Number(n) => Err(ConfigError::unsupported_source(
            format!("number {n}"),
            "expected a map, a file path or a list",
        )),
    }
}

fn collect_path(path: &Path, options: &LoadOptions, out: &mut Vec<Pair>) -> ConfigResult<()> {
    let resolved = options.resolve(path);
    let origin = resolved.display().to_string();
    if !resolved.is_file() {
        return Err(ConfigError::unsupported_source(
            origin,
            "not an existing file",
        ));
    }
    let content = fs::read_to_string(&resolved)
        .map_err(|e| ConfigError::read_error(origin.as_str(), e.to_string()))?;
    tracing::debug!(path = %origin, "loading parameters from file");
    collect_document(&content, ConfigFormat::from_path(&resolved), &origin, out)
}

fn collect_document(
    content: &str,
    format: ConfigFormat,
    origin: &str,
    out: &mut Vec<Pair>,
) -> ConfigResult<()> {
    match parse_document(content, format, origin)? {
        Value::Object(map) => {
            extend_from_map(map, out);
            Ok(())
        }
        other => Err(ConfigError::unsupported_source(
            origin,
            format!("document is not a map (found {})", kind_of(&other)),
        )),
    }
}

fn read_all(reader: &mut dyn Read, origin: &str) -> ConfigResult<String> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| ConfigError::read_error(origin, e.to_string()))?;
    Ok(content)
}

fn extend_from_map(map: Map<String, Value>, out: &mut Vec<Pair>) {
    out.extend(map.into_iter().map(|(key, value)| (normalize_key(&key), value)));
}

/// `:name` and `name` address the same parameter.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.strip_prefix(':').unwrap_or(key).to_owned()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Cursor;

    fn pairs(source: Source) -> Vec<Pair> {
        normalize(source, &LoadOptions::default()).unwrap()
    }

    #[test]
    fn map_keeps_order_and_strips_symbol_prefix() {
        let got = pairs(Source::from(json!({"b": 1, ":a": 2})));
        assert_eq!(got, vec![("b".into(), json!(1)), ("a".into(), json!(2))]);
    }

    #[test]
    fn list_concatenates_and_keeps_duplicates() {
        let got = pairs(Source::from(json!([{"a": 1, "b": 1}, {"a": 2}])));
        assert_eq!(
            got,
            vec![
                ("a".into(), json!(1)),
                ("b".into(), json!(1)),
                ("a".into(), json!(2)),
            ]
        );
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn reader_defaults_to_yaml() {
        let got = pairs(Source::reader(Cursor::new("test1: 1\n:test2: x\n")));
        assert_eq!(got, vec![("test1".into(), json!(1)), ("test2".into(), json!("x"))]);
    }

    #[test]
    fn reader_with_explicit_format() {
        let got = pairs(Source::reader_with_format(
            Cursor::new(r#"{"k": [1, 2]}"#),
            ConfigFormat::Json,
        ));
        assert_eq!(got, vec![("k".into(), json!([1, 2]))]);
    }

    #[test]
    fn non_map_document_is_unsupported() {
        let err = normalize(
            Source::reader_with_format(Cursor::new("[1, 2]"), ConfigFormat::Json),
            &LoadOptions::default(),
        )
        .unwrap_err();
        assert!(err.is_unsupported_source());
    }

    #[test]
    fn scalars_and_missing_paths_are_unsupported() {
        for source in [
            Source::from(json!(42)),
            Source::from(Value::Null),
            Source::from(json!(true)),
            Source::from("definitely/not/here.yml"),
            Source::from(json!("definitely/not/here.yml")),
            Source::from(std::path::PathBuf::from("definitely/not/here.yml")),
        ] {
            let kind = source.kind();
            let err = normalize(source, &LoadOptions::default()).unwrap_err();
            assert!(err.is_unsupported_source(), "{kind}: {err}");
        }
    }

    #[test]
    fn inline_document_string_is_not_parsed() {
        let err = normalize(Source::from("test1: 1"), &LoadOptions::default()).unwrap_err();
        assert!(err.is_unsupported_source());
    }

    #[test]
    fn symbol_keys() {
        assert_eq!(normalize_key(":name"), "name");
        assert_eq!(normalize_key("name"), "name");
        assert_eq!(normalize_key("::x"), ":x");
    }
}
