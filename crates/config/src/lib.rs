//! Loading tunable parameters from maps, documents, files and lists of them.
//!
//! ```
//! use serde_json::json;
//! use tunable_config::prelude::*;
//! use tunable_parameter::prelude::*;
//!
//! let mut params = Parameters::new();
//! params.param("workers", ParameterOptions::new().with_default(1).min(1)).unwrap();
//!
//! params.apply_source(json!({":workers": 4, "unknown": true})).unwrap();
//! assert_eq!(params.get("workers").unwrap(), json!(4));
//! ```

pub mod error;
pub mod format;
pub mod loader;
pub mod normalize;
pub mod source;

pub use error::{ConfigError, ConfigResult};
pub use format::parse_document;
pub use loader::{Configure, LoadOptions, OPTIONS_SOURCE, apply_source};
pub use normalize::{Pair, normalize, normalize_key};
pub use source::{ConfigFormat, Source};

pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult};
    pub use crate::loader::{Configure, LoadOptions};
    pub use crate::source::{ConfigFormat, Source};
}
