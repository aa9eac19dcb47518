//! Named analysis profiles for the command line.
//!
//! Profiles live in `~/.callqa/{app_name}/config.yaml` as kubectl-style
//! contexts: each context carries a full [`PipelineConfig`] and an optional
//! lexicon file, and one of them may be marked current.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use callqa_features::{Lexicon, PipelineConfig};
use serde::{Deserialize, Serialize};

use crate::request::{load_request, RequestError};

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".callqa";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Profile store for one application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Application name (not serialized).
    #[serde(skip)]
    pub app_name: String,

    /// Name of the currently active context.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_context: String,

    /// Contexts by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub contexts: BTreeMap<String, Context>,

    #[serde(skip)]
    config_path: PathBuf,
}

/// One named analysis profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Pipeline thresholds; omitted keys take their defaults.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// YAML or JSON lexicon replacing the built-in word lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexicon_file: Option<PathBuf>,
}

impl Context {
    /// Loads the profile's lexicon, or the built-in one when none is set.
    ///
    /// Relative paths are resolved against `base`, normally the directory of
    /// the config file.
    pub fn lexicon(&self, base: Option<&Path>) -> Result<Lexicon, RequestError> {
        match &self.lexicon_file {
            Some(path) if path.is_relative() => match base {
                Some(dir) => load_request(dir.join(path)),
                None => load_request(path),
            },
            Some(path) => load_request(path),
            None => Ok(Lexicon::default()),
        }
    }
}

impl Config {
    /// Gets the default config directory.
    pub fn default_config_dir(app_name: &str) -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR).join(app_name))
    }

    /// Gets the default config file path.
    pub fn default_config_path(app_name: &str) -> Option<PathBuf> {
        Self::default_config_dir(app_name).map(|dir| dir.join(DEFAULT_CONFIG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn dir(&self) -> Option<&Path> {
        self.config_path.parent()
    }

    /// Writes the configuration back to its file.
    pub fn save(&self) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Adds or replaces a context and saves.
    pub fn add_context(&mut self, name: &str, mut ctx: Context) -> anyhow::Result<()> {
        ctx.name = name.to_string();
        self.contexts.insert(name.to_string(), ctx);
        self.save()
    }

    /// Deletes a context and saves, clearing the current context if needed.
    pub fn delete_context(&mut self, name: &str) -> anyhow::Result<()> {
        if self.contexts.remove(name).is_none() {
            anyhow::bail!("context '{}' not found", name);
        }
        if self.current_context == name {
            self.current_context.clear();
        }
        self.save()
    }

    /// Marks a context as current and saves.
    pub fn use_context(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.contexts.contains_key(name) {
            anyhow::bail!("context '{}' not found", name);
        }
        self.current_context = name.to_string();
        self.save()
    }

    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    pub fn get_current_context(&self) -> Option<&Context> {
        if self.current_context.is_empty() {
            return None;
        }
        self.contexts.get(&self.current_context)
    }

    /// Resolves the context by name, or the current context if no name is
    /// given.
    pub fn resolve_context(&self, name: Option<&str>) -> Option<&Context> {
        match name {
            Some(n) if !n.is_empty() => self.get_context(n),
            _ => self.get_current_context(),
        }
    }

    /// Lists context names in sorted order.
    pub fn list_contexts(&self) -> Vec<&str> {
        self.contexts.keys().map(|s| s.as_str()).collect()
    }
}

/// Loads the configuration for `app_name`, creating an empty file on first
/// use.
pub fn load_config(app_name: &str, custom_path: Option<&str>) -> anyhow::Result<Config> {
    let config_path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => Config::default_config_path(app_name)
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path"))?,
    };

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut cfg = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        }
    } else {
        let cfg = Config::default();
        std::fs::write(&config_path, serde_yaml::to_string(&cfg)?)?;
        cfg
    };

    cfg.app_name = app_name.to_string();
    cfg.config_path = config_path;
    Ok(cfg)
}
