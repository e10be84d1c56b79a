//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["outlog.toml", ".outlog.toml"];
const ENV_PREFIX: &str = "OUTLOG_";

/// Kind of configuration source, in increasing priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSourceKind {
    Default,
    Global,
    Project,
    Explicit,
    Environment,
}

impl ConfigSourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ConfigSourceKind::Default => "Default",
            ConfigSourceKind::Global => "Global",
            ConfigSourceKind::Project => "Project",
            ConfigSourceKind::Explicit => "Explicit",
            ConfigSourceKind::Environment => "Env",
        }
    }
}

/// One configuration source and whether it contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub location: String,
    pub found: bool,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `OUTLOG_<SECTION>__<KEY>`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./outlog.toml` or `./.outlog.toml`
    /// 4. Global: `~/.config/outlog/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(Box::new(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))));
        }
        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path,
            ENV_PREFIX,
        )
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Build the merged figment from explicit locations.
    pub fn figment(
        global: Option<&Path>,
        project: Option<&Path>,
        explicit: Option<&Path>,
        env_prefix: &str,
    ) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project, explicit].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment.merge(Env::prefixed(env_prefix).split("__"))
    }

    /// Get the global config file path (`<config_dir>/outlog/config.toml`)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("outlog").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    pub fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// List the config sources in priority order (highest first).
    pub fn config_sources(explicit: Option<&Path>) -> Vec<ConfigSource> {
        let mut sources = Vec::new();

        let env_found =
            std::env::vars_os().any(|(k, _)| k.to_string_lossy().starts_with(ENV_PREFIX));
        sources.push(ConfigSource {
            kind: ConfigSourceKind::Environment,
            location: format!("{}<SECTION>__<KEY>", ENV_PREFIX),
            found: env_found,
        });

        if let Some(path) = explicit {
            sources.push(ConfigSource {
                kind: ConfigSourceKind::Explicit,
                location: path.display().to_string(),
                found: path.exists(),
            });
        }

        sources.push(match Self::project_config_path() {
            Some(path) => ConfigSource {
                kind: ConfigSourceKind::Project,
                location: path.display().to_string(),
                found: true,
            },
            None => ConfigSource {
                kind: ConfigSourceKind::Project,
                location: "./outlog.toml or ./.outlog.toml".to_string(),
                found: false,
            },
        });

        if let Some(path) = Self::global_config_path() {
            sources.push(ConfigSource {
                kind: ConfigSourceKind::Global,
                location: path.display().to_string(),
                found: path.exists(),
            });
        }

        sources.push(ConfigSource {
            kind: ConfigSourceKind::Default,
            location: "built-in defaults".to_string(),
            found: true,
        });

        sources
    }
}
