//! Applying sources to configurable objects.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tunable_parameter::{Configurable, Parameters};

use crate::error::{ConfigError, ConfigResult};
use crate::normalize::{Pair, normalize};
use crate::source::{ConfigFormat, Source};

/// Name that, when not a declared parameter, is loaded as a nested source.
pub const OPTIONS_SOURCE: &str = "options_source";

const MAX_NESTING: usize = 16;

/// Loader settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    base_dir: Option<PathBuf>,
    stream_format: ConfigFormat,
}

impl LoadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `dir` instead of the working directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Format assumed for readers and file handles with no explicit format.
    pub fn with_stream_format(mut self, format: ConfigFormat) -> Self {
        self.stream_format = format;
        self
    }

    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    #[must_use]
    pub fn stream_format(&self) -> ConfigFormat {
        self.stream_format
    }

    pub(crate) fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Load `source` into `target` and return how many writes were applied.
///
/// Pairs for undeclared names are skipped. The call is all-or-nothing: if
/// any write fails, every value written during the call is rolled back
/// before the error is returned.
pub fn apply_source<C>(target: &mut C, source: Source, options: &LoadOptions) -> ConfigResult<usize>
where
    C: Configurable + ?Sized,
{
    let kind = source.kind();
    let pairs = normalize(source, options)?;
    let params = target.parameters_mut();
    let snapshot = params.snapshot();

    match apply_pairs(params, pairs, options, 0) {
        Ok(applied) => {
            tracing::debug!(source = kind, applied, "source applied");
            Ok(applied)
        }
        Err(e) => {
            tracing::warn!(source = kind, error = %e, "source rejected, restoring previous values");
            params.restore(snapshot);
            Err(e)
        }
    }
}

fn apply_pairs(
    params: &mut Parameters,
    pairs: Vec<Pair>,
    options: &LoadOptions,
    depth: usize,
) -> ConfigResult<usize> {
    let mut applied = 0;
    for (name, value) in pairs {
        if params.is_declared(&name) {
            params.set(&name, value)?;
            applied += 1;
        } else if name == OPTIONS_SOURCE {
            applied += apply_nested(params, value, options, depth)?;
        } else {
            tracing::debug!(parameter = %name, "ignoring undeclared name");
        }
    }
    Ok(applied)
}

fn apply_nested(
    params: &mut Parameters,
    value: Value,
    options: &LoadOptions,
    depth: usize,
) -> ConfigResult<usize> {
    if depth >= MAX_NESTING {
        return Err(ConfigError::unsupported_source(
            OPTIONS_SOURCE,
            format!("nested more than {MAX_NESTING} levels deep"),
        ));
    }
    let pairs = normalize(Source::Value(value), options)?;
    apply_pairs(params, pairs, options, depth + 1)
}

/// Loading and configure entry points for every [`Configurable`].
pub trait Configure: Configurable {
    /// Load `source`; see [`apply_source`].
    fn apply_source(&mut self, source: impl Into<Source>) -> ConfigResult<&mut Self> {
        self.apply_source_with(source, &LoadOptions::default())
    }

    fn apply_source_with(
        &mut self,
        source: impl Into<Source>,
        options: &LoadOptions,
    ) -> ConfigResult<&mut Self> {
        apply_source(self, source.into(), options)?;
        Ok(self)
    }

    /// Setter-style alias for [`Configure::apply_source`].
    fn set_options_source(&mut self, source: impl Into<Source>) -> ConfigResult<()> {
        self.apply_source(source).map(|_| ())
    }

    /// Load `source` if given; returns `self` for chaining.
    fn configure(&mut self, source: Option<Source>) -> ConfigResult<&mut Self> {
        if let Some(source) = source {
            self.apply_source(source)?;
        }
        Ok(self)
    }

    /// Load `source` if given, then hand `self` to `block`.
    fn configure_with<F>(&mut self, source: Option<Source>, block: F) -> ConfigResult<&mut Self>
    where
        F: FnOnce(&mut Self) -> ConfigResult<()>,
    {
        self.configure(source)?;
        block(self)?;
        Ok(self)
    }
}

impl<T: Configurable + ?Sized> Configure for T {}
