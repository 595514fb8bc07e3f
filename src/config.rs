//! Generation configuration.
//!
//! Values come from, lowest to highest precedence: built-in defaults, an
//! optional `blueprint.yaml`, `BLUEPRINT_*` environment variables and finally
//! the draft's own `config:` section.

use crate::error::{BlueprintError, Result};
use crate::parser::TokenMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration threaded through lexing and generation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Root application namespace
    pub namespace: String,
    /// Namespace for models, relative to `namespace` (empty for none)
    pub models_namespace: String,
    /// Namespace for controllers, relative to `namespace`
    pub controllers_namespace: String,
    /// Directory holding the application classes
    pub app_path: String,
    /// Emit `constrained()` foreign keys in migrations
    pub use_constraints: bool,
    pub on_delete: String,
    pub on_update: String,
    /// Use `$guarded = []` instead of listing `$fillable`
    pub use_guarded: bool,
    /// Generate fake data for nullable columns in factories
    pub fake_nullables: bool,
    /// Use singular resource names for routes
    pub singular_routes: bool,
    /// Reference controllers by fully qualified class name in routes
    pub generate_fqcn_route: bool,
    /// Where the build ledger is persisted
    pub ledger_path: String,
    /// Directory searched for published stub overrides
    pub stubs_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: "App".to_string(),
            models_namespace: "Models".to_string(),
            controllers_namespace: "Http\\Controllers".to_string(),
            app_path: "app".to_string(),
            use_constraints: false,
            on_delete: "cascade".to_string(),
            on_update: "cascade".to_string(),
            use_guarded: false,
            fake_nullables: true,
            singular_routes: false,
            generate_fqcn_route: false,
            ledger_path: ".blueprint".to_string(),
            stubs_path: "stubs".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, falling back to defaults for missing keys
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| BlueprintError::io(path, e))?;

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&contents)
            .map_err(|e| BlueprintError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load `path` when it exists, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `BLUEPRINT_<FIELD>` environment variables on top of this config
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(std::env::vars())
    }

    /// Apply `BLUEPRINT_<FIELD>` pairs from any source on top of this config
    pub fn with_vars<I>(self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut overlay = serde_yaml::Mapping::new();
        for (key, value) in vars {
            if let Some(field) = key.strip_prefix("BLUEPRINT_") {
                let parsed = serde_yaml::from_str::<serde_yaml::Value>(&value)
                    .unwrap_or(serde_yaml::Value::String(value));
                overlay.insert(
                    serde_yaml::Value::String(field.to_lowercase()),
                    parsed,
                );
            }
        }
        self.merge_mapping(overlay)
    }

    /// Merge a draft `config:` section into this config.
    ///
    /// Unknown keys are ignored; known keys with the wrong type are rejected.
    pub fn merge_overlay(self, overlay: &TokenMap) -> Result<Self> {
        if overlay.is_empty() {
            return Ok(self);
        }
        let value = serde_yaml::to_value(overlay)
            .map_err(|e| BlueprintError::Config(e.to_string()))?;
        match value {
            serde_yaml::Value::Mapping(mapping) => self.merge_mapping(mapping),
            _ => Ok(self),
        }
    }

    fn merge_mapping(self, overlay: serde_yaml::Mapping) -> Result<Self> {
        if overlay.is_empty() {
            return Ok(self);
        }
        let mut base = match serde_yaml::to_value(&self)
            .map_err(|e| BlueprintError::Config(e.to_string()))?
        {
            serde_yaml::Value::Mapping(mapping) => mapping,
            _ => return Ok(self),
        };

        for (key, value) in overlay {
            if base.contains_key(&key) {
                let value = coerce_like(base.get(&key), value);
                base.insert(key, value);
            }
        }

        serde_yaml::from_value(serde_yaml::Value::Mapping(base))
            .map_err(|e| BlueprintError::Config(e.to_string()))
    }

    /// Fully qualified namespace for models: `App\Models`
    pub fn models_namespace(&self) -> String {
        join_namespace(&self.namespace, &self.models_namespace)
    }

    /// Fully qualified namespace for controllers: `App\Http\Controllers`
    pub fn controllers_namespace(&self) -> String {
        join_namespace(&self.namespace, &self.controllers_namespace)
    }
}

fn join_namespace(root: &str, child: &str) -> String {
    if child.is_empty() {
        root.to_string()
    } else {
        format!("{}\\{}", root, child)
    }
}

/// Draft scalars arrive as text; turn `"true"` into a bool when the field is a bool
fn coerce_like(existing: Option<&serde_yaml::Value>, value: serde_yaml::Value) -> serde_yaml::Value {
    match (existing, &value) {
        (Some(serde_yaml::Value::Bool(_)), serde_yaml::Value::String(s)) => {
            match s.to_lowercase().as_str() {
                "true" | "1" | "yes" => serde_yaml::Value::Bool(true),
                "false" | "0" | "no" => serde_yaml::Value::Bool(false),
                _ => value,
            }
        }
        (Some(serde_yaml::Value::String(_)), serde_yaml::Value::Bool(b)) => {
            serde_yaml::Value::String(b.to_string())
        }
        (Some(serde_yaml::Value::String(_)), serde_yaml::Value::Number(n)) => {
            serde_yaml::Value::String(n.to_string())
        }
        _ => value,
    }
}
