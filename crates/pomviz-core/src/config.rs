//! Run configuration: an optional JSON/TOML config file merged with
//! command-line overrides, validated before any manifest is fetched.

use std::path::{Path, PathBuf};

use pomviz_util::errors::PomvizError;
use serde::{Deserialize, Serialize};

use crate::coordinate::PackageCoordinate;

/// Traversal depth used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Concurrent manifest fetches per traversal level.
pub const DEFAULT_JOBS: usize = 8;

/// Image format passed to the renderer as `-T<format>`.
pub const DEFAULT_FORMAT: &str = "png";

/// Raw configuration as read from a config file or the command line.
///
/// Every field is optional here; [`GraphConfig::validate_resolve`] and
/// [`GraphConfig::validate_render`] decide what is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default, alias = "repository")]
    pub repository_url: Option<String>,

    #[serde(default, alias = "package")]
    pub package_name: Option<String>,

    #[serde(default, deserialize_with = "depth_value::deserialize")]
    pub max_depth: Option<usize>,

    #[serde(default, alias = "output")]
    pub output_file_path: Option<PathBuf>,

    #[serde(default, alias = "graphviz")]
    pub graphviz_program_path: Option<PathBuf>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub jobs: Option<usize>,
}

/// Validated settings needed to build the dependency graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveSettings {
    pub repository: String,
    pub root: PackageCoordinate,
    pub max_depth: usize,
    pub jobs: usize,
}

/// Validated settings needed to write and render the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub resolve: ResolveSettings,
    pub output: PathBuf,
    pub graphviz: PathBuf,
    pub format: String,
}

impl RenderSettings {
    /// `<output>.dot`
    pub fn dot_path(&self) -> PathBuf {
        with_suffix(&self.output, "dot")
    }

    /// `<output>.<format>`
    pub fn image_path(&self) -> PathBuf {
        with_suffix(&self.output, &self.format)
    }
}

impl GraphConfig {
    /// Load a config file. `.json` files are parsed as JSON, anything else as TOML.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PomvizError::Config {
            message: format!("Failed to read config file {}: {e}", path.display()),
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        tracing::debug!(
            "loading {} config from {}",
            if is_json { "JSON" } else { "TOML" },
            path.display()
        );
        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse_toml(&content)
        }
    }

    pub fn parse_json(content: &str) -> miette::Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            PomvizError::Config {
                message: format!("Failed to parse JSON config: {e}"),
            }
            .into()
        })
    }

    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            PomvizError::Config {
                message: format!("Failed to parse TOML config: {e}"),
            }
            .into()
        })
    }

    /// Overlay `overrides` on top of `self`: every value set in `overrides` wins.
    pub fn merge(self, overrides: GraphConfig) -> GraphConfig {
        GraphConfig {
            repository_url: overrides.repository_url.or(self.repository_url),
            package_name: overrides.package_name.or(self.package_name),
            max_depth: overrides.max_depth.or(self.max_depth),
            output_file_path: overrides.output_file_path.or(self.output_file_path),
            graphviz_program_path: overrides.graphviz_program_path.or(self.graphviz_program_path),
            format: overrides.format.or(self.format),
            jobs: overrides.jobs.or(self.jobs),
        }
    }

    /// Check the settings needed to fetch and traverse manifests.
    pub fn validate_resolve(&self) -> miette::Result<ResolveSettings> {
        let repository = required(self.repository_url.as_deref(), "repository_url")?;
        let package = required(self.package_name.as_deref(), "package_name")?;
        let root = PackageCoordinate::parse(package).ok_or_else(|| PomvizError::Config {
            message: format!(
                "Invalid package name '{package}': expected 'groupId:artifactId:version'"
            ),
        })?;
        let jobs = self.jobs.unwrap_or(DEFAULT_JOBS);
        if jobs == 0 {
            return Err(PomvizError::Config {
                message: "jobs must be at least 1".to_string(),
            }
            .into());
        }
        Ok(ResolveSettings {
            repository: repository.trim_end_matches('/').to_string(),
            root,
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            jobs,
        })
    }

    /// Check everything [`validate_resolve`](Self::validate_resolve) does, plus
    /// the output path and rendering tool.
    ///
    /// A renderer given as a path must exist; a bare program name is looked up
    /// on `PATH` when it runs.
    pub fn validate_render(&self, require_renderer: bool) -> miette::Result<RenderSettings> {
        let resolve = self.validate_resolve()?;
        let output = self
            .output_file_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| missing("output_file_path"))?;
        let graphviz = match &self.graphviz_program_path {
            Some(p) if !p.as_os_str().is_empty() => p.clone(),
            _ if require_renderer => return Err(missing("graphviz_program_path").into()),
            _ => PathBuf::from("dot"),
        };
        if require_renderer && graphviz.components().count() > 1 && !graphviz.is_file() {
            return Err(PomvizError::Config {
                message: format!("Graphviz program not found at {}", graphviz.display()),
            }
            .into());
        }
        let format = self
            .format
            .clone()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string());
        Ok(RenderSettings {
            resolve,
            output,
            graphviz,
            format,
        })
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, PomvizError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(name))
}

fn missing(name: &str) -> PomvizError {
    PomvizError::Config {
        message: format!("Missing required parameter '{name}'"),
    }
}

/// Append `.suffix` to the full path, keeping any dots already in the file name.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".");
    s.push(suffix);
    PathBuf::from(s)
}

/// `max_depth` may be written as a number or as a numeric string.
mod depth_value {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(usize),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Number(n)) => Ok(Some(n)),
            Some(Raw::Text(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid max_depth '{s}'"))),
        }
    }
}
