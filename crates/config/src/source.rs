//! Configuration source definitions

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::{Map, Value};

/// Anything parameters can be loaded from.
///
/// A bare string is only ever a path; serialized text has to arrive through
/// a reader or an open file.
pub enum Source {
    /// In-memory key/value pairs
    Map(Map<String, Value>),
    /// A JSON value, dispatched by shape: map, path string or list
    Value(Value),
    /// A bare string naming an existing file
    Str(String),
    /// A filesystem path
    Path(PathBuf),
    /// An open file handle
    File(File),
    /// A stream of serialized text
    Reader {
        /// The stream
        reader: Box<dyn Read>,
        /// Format of the text; the loader default when `None`
        format: Option<ConfigFormat>,
    },
    /// Sources applied in order
    List(Vec<Source>),
}

impl Source {
    /// Wrap a stream.
    pub fn reader(reader: impl Read + 'static) -> Self {
        Self::Reader {
            reader: Box::new(reader),
            format: None,
        }
    }

    /// Wrap a stream of known format.
    pub fn reader_with_format(reader: impl Read + 'static, format: ConfigFormat) -> Self {
        Self::Reader {
            reader: Box::new(reader),
            format: Some(format),
        }
    }

    /// Short description for logs and errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Map(_) => "map",
            Self::Value(_) => "value",
            Self::Str(_) => "string",
            Self::Path(_) => "path",
            Self::File(_) => "file",
            Self::Reader { .. } => "reader",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::File(file) => f.debug_tuple("File").field(file).finish(),
            Self::Reader { format, .. } => f
                .debug_struct("Reader")
                .field("format", format)
                .finish_non_exhaustive(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

impl From<Map<String, Value>> for Source {
    fn from(map: Map<String, Value>) -> Self {
        Self::Map(map)
    }
}

impl From<Value> for Source {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<File> for Source {
    fn from(file: File) -> Self {
        Self::File(file)
    }
}

impl From<Vec<Source>> for Source {
    fn from(items: Vec<Source>) -> Self {
        Self::List(items)
    }
}

/// Structured-text format of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    /// JSON format
    Json,
    /// YAML format; also reads JSON
    #[default]
    Yaml,
    /// TOML format
    Toml,
}

impl ConfigFormat {
    /// Canonical file extension.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yml",
            Self::Toml => "toml",
        }
    }

    /// Detect format from a file extension. Anything unrecognized is YAML.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "toml" => Self::Toml,
            _ => Self::Yaml,
        }
    }

    /// Detect format from a file path.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(Self::Yaml, Self::from_extension)
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Yaml => write!(f, "YAML"),
            Self::Toml => write!(f, "TOML"),
        }
    }
}

impl FromStr for ConfigFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            other => Err(format!("unknown format `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("settings.json", ConfigFormat::Json)]
    #[case("settings.JSON", ConfigFormat::Json)]
    #[case("settings.toml", ConfigFormat::Toml)]
    #[case("settings.yaml", ConfigFormat::Yaml)]
    #[case("settings.yml", ConfigFormat::Yaml)]
    #[case("settings.conf", ConfigFormat::Yaml)]
    #[case("settings", ConfigFormat::Yaml)]
    fn format_from_path(#[case] path: &str, #[case] expected: ConfigFormat) {
        assert_eq!(ConfigFormat::from_path(Path::new(path)), expected);
    }

    #[test]
    fn format_from_str() {
        assert_eq!("YAML".parse::<ConfigFormat>(), Ok(ConfigFormat::Yaml));
        assert_eq!("yml".parse::<ConfigFormat>(), Ok(ConfigFormat::Yaml));
        assert!("ini".parse::<ConfigFormat>().is_err());
    }

    #[test]
    fn conversions_pick_variant() {
        assert_eq!(Source::from("a.yml").kind(), "string");
        assert_eq!(Source::from(PathBuf::from("a.yml")).kind(), "path");
        assert_eq!(Source::from(json!({"a": 1})).kind(), "value");
        assert_eq!(Source::from(Map::new()).kind(), "map");
        assert_eq!(Source::from(vec![Source::from(Map::new())]).kind(), "list");
        assert_eq!(Source::reader(std::io::empty()).kind(), "reader");
    }

    #[test]
    fn reader_debug_hides_stream() {
        let source = Source::reader_with_format(std::io::empty(), ConfigFormat::Json);
        assert_eq!(format!("{source:?}"), "Reader { format: Some(Json), .. }");
    }
}
