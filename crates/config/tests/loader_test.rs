use std::fs::{self, File};
use std::io::Cursor;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tempfile::TempDir;
use tunable_config::prelude::*;
use tunable_parameter::prelude::*;

fn declared() -> Parameters {
    let class = ParameterClass::new();
    class
        .param("test1", ParameterOptions::new())
        .unwrap()
        .param("test2", ParameterOptions::new())
        .unwrap()
        .param("test3", ParameterOptions::new().with_default("three"))
        .unwrap();
    class.instantiate()
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Source kinds
// ---------------------------------------------------------------------------

#[test]
fn in_memory_map() {
    let mut map = serde_json::Map::new();
    map.insert("test1".into(), json!(1));
    map.insert(":test2".into(), json!("two"));

    let mut params = declared();
    params.apply_source(map).unwrap();

    assert_eq!(params.get("test1").unwrap(), json!(1));
    assert_eq!(params.get("test2").unwrap(), json!("two"));
    assert_eq!(params.get("test3").unwrap(), json!("three"));
}

#[test]
fn yaml_file_by_path_string() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "opts.yml", "test1: 1\n:test2: two\n");

    let mut params = declared();
    params.apply_source(path.display().to_string()).unwrap();

    assert_eq!(params.get("test1").unwrap(), json!(1));
    assert_eq!(params.get("test2").unwrap(), json!("two"));
}

#[test]
fn json_and_toml_files_by_extension() {
    let dir = TempDir::new().unwrap();
    let json_path = write(&dir, "opts.json", r#"{"test1": [1, 2]}"#);
    let toml_path = write(&dir, "opts.toml", "test2 = { nested = true }\n");

    let mut params = declared();
    params.apply_source(json_path).unwrap();
    params.apply_source(toml_path).unwrap();

    assert_eq!(params.get("test1").unwrap(), json!([1, 2]));
    assert_eq!(params.get("test2").unwrap(), json!({"nested": true}));
}

#[test]
fn open_file_handle_defaults_to_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "handle.txt", "test1: from handle\n");

    let mut params = declared();
    params.apply_source(File::open(path).unwrap()).unwrap();

    assert_eq!(params.get("test1").unwrap(), json!("from handle"));
}

#[test]
fn stream_source() {
    let mut params = declared();
    params
        .apply_source(Source::reader(Cursor::new("test1: 10\ntest2: [a, b]\n")))
        .unwrap();

    assert_eq!(params.get("test1").unwrap(), json!(10));
    assert_eq!(params.get("test2").unwrap(), json!(["a", "b"]));
}

#[test]
fn relative_path_against_base_dir() {
    let dir = TempDir::new().unwrap();
    write(&dir, "rel.yaml", "test1: relative\n");

    let mut params = declared();
    params
        .apply_source_with("rel.yaml", &LoadOptions::new().with_base_dir(dir.path()))
        .unwrap();

    assert_eq!(params.get("test1").unwrap(), json!("relative"));
}

#[test]
fn stream_format_override() {
    let mut params = declared();
    params
        .apply_source_with(
            Source::reader(Cursor::new("test1 = 5\n")),
            &LoadOptions::new().with_stream_format(ConfigFormat::Toml),
        )
        .unwrap();

    assert_eq!(params.get("test1").unwrap(), json!(5));
}

// ---------------------------------------------------------------------------
// Precedence
// ---------------------------------------------------------------------------

#[test]
fn sequential_sources_are_cumulative() {
    let mut params = declared();
    params
        .apply_source(json!({"test1": 1, "test2": 2}))
        .unwrap()
        .apply_source(json!({"test2": 20}))
        .unwrap();

    assert_eq!(params.get("test1").unwrap(), json!(1));
    assert_eq!(params.get("test2").unwrap(), json!(20));
}

#[test]
fn list_source_later_entries_win() {
    let dir = TempDir::new().unwrap();
    let first = write(&dir, "first.yml", "test1: 1\ntest2: 2\n");

    let mut params = declared();
    params
        .apply_source(vec![
            Source::from(first),
            Source::reader(Cursor::new("test2: 22\n")),
            Source::from(json!({"test3": 33})),
        ])
        .unwrap();

    assert_eq!(
        Value::Object(params.values()),
        json!({"test1": 1, "test2": 22, "test3": 33})
    );
}

#[test]
fn undeclared_names_are_ignored() {
    let mut params = declared();
    params.apply_source(json!({"other": 1, "test1": 2})).unwrap();

    assert_eq!(params.get("test1").unwrap(), json!(2));
    assert!(params.get("other").is_err());
}

#[test]
fn options_source_setter_alias() {
    let mut params = declared();
    params.set_options_source(json!({"test1": "alias"})).unwrap();
    assert_eq!(params.get("test1").unwrap(), json!("alias"));
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[rstest]
#[case::number(json!(42))]
#[case::null(Value::Null)]
#[case::missing_path(json!("no/such/file.yml"))]
fn unsupported_sources(#[case] source: Value) {
    let mut params = declared();
    let err = params.apply_source(source).unwrap_err();
    assert!(err.is_unsupported_source(), "{err}");
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.json", "{ not json");

    let mut params = declared();
    let err = params.apply_source(path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn rejected_list_leaves_earlier_values() {
    let class = ParameterClass::new();
    class
        .param("count", ParameterOptions::new().min(10))
        .unwrap()
        .param("name", ParameterOptions::new())
        .unwrap();
    let mut params = class.instantiate();
    params.apply_source(json!({"count": 11, "name": "kept"})).unwrap();

    let err = params
        .apply_source(json!([{"name": "replaced"}, {"count": 9}]))
        .unwrap_err();

    assert!(matches!(
        err.parameter_error(),
        Some(ParameterError::OutOfRange { key, .. }) if key == "count"
    ));
    assert_eq!(params.get("count").unwrap(), json!(11));
    assert_eq!(params.get("name").unwrap(), json!("kept"));
}

#[test]
fn locked_parameter_fails_the_load() {
    let mut params = Parameters::new();
    params
        .param("frozen", ParameterOptions::new().lockable())
        .unwrap();
    params.lock();

    let err = params.apply_source(json!({"frozen": 1})).unwrap_err();
    assert_eq!(err.code(), "PARAM_LOCKED");
}

// ---------------------------------------------------------------------------
// Configure entry point
// ---------------------------------------------------------------------------

#[test]
fn configure_without_arguments_returns_self() {
    let mut params = declared();
    let same = params.configure(None).unwrap();
    assert_eq!(same.get("test3").unwrap(), json!("three"));
}

#[test]
fn configure_with_source_then_block() {
    let mut params = declared();
    params
        .configure_with(Some(json!({"test1": 1, "test2": 2}).into()), |p| {
            p.set("test2", "from block")?;
            Ok(())
        })
        .unwrap();

    assert_eq!(params.get("test1").unwrap(), json!(1));
    assert_eq!(params.get("test2").unwrap(), json!("from block"));
}

#[test]
fn configure_block_errors_propagate() {
    let mut params = declared();
    let err = params
        .configure_with(None, |p| {
            p.set("missing", 1)?;
            Ok(())
        })
        .unwrap_err();
    assert_eq!(err.code(), "PARAM_NOT_FOUND");
}

#[test]
fn host_struct_is_configurable() {
    struct Worker {
        params: Parameters,
    }

    impl Configurable for Worker {
        fn parameters(&self) -> &Parameters {
            &self.params
        }

        fn parameters_mut(&mut self) -> &mut Parameters {
            &mut self.params
        }
    }

    let class = ParameterClass::new();
    class
        .param(
            "threads",
            ParameterOptions::new()
                .with_default(1)
                .coerce(CoercionKind::Integer),
        )
        .unwrap();

    let mut worker = Worker {
        params: class.instantiate(),
    };
    worker
        .configure(Some(json!({"threads": "8"}).into()))
        .unwrap();

    assert_eq!(worker.parameters().get_as::<u32>("threads").unwrap(), 8);
}
