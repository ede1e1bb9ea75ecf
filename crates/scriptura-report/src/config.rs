//! Report configuration (config.yaml).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::placeholders::Placeholders;
use crate::theme::{ThemeConfig, ThemeRole};

/// Default config file name inside a report directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Default glob used to discover section files.
pub const DEFAULT_SECTION_GLOB: &str = "*.html";

/// Default local stylesheet directory.
pub const DEFAULT_THEME_DIR: &str = "style";

/// Loaded report configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportConfig {
    /// Report title
    pub title: String,

    /// Subtitle shown on the cover
    pub subtitle: String,

    /// Author / "prepared by" line
    pub prepared: String,

    /// Small label above the title
    pub kicker: String,

    /// Free-form date string
    pub date: String,

    /// Explicit ordered section paths, relative to the config directory
    pub sections: Option<Vec<String>>,

    /// Glob used when sections are discovered
    pub section_glob: Option<String>,

    /// Per-role stylesheet overrides
    pub theme: Option<ThemeConfig>,

    /// Base URL for all theme stylesheets
    pub theme_base_url: Option<String>,

    /// Local stylesheet directory
    pub theme_local_dir: Option<String>,

    /// Extra `[KEY]` placeholder values
    pub placeholders: BTreeMap<String, String>,
}

/// On-disk shape. Accepts both the flat layout and the `meta:` block layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    #[serde(deserialize_with = "scalar_string")]
    title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    subtitle: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    prepared: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    author: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    kicker: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    date: Option<String>,
    sections: Option<Vec<String>>,
    section_glob: Option<String>,
    theme: Option<ThemeConfig>,
    theme_base_url: Option<String>,
    theme_local_dir: Option<String>,
    placeholders: BTreeMap<String, serde_yaml::Value>,
    meta: Option<MetaBlock>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MetaBlock {
    #[serde(deserialize_with = "scalar_string")]
    title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    subtitle: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    author: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    prepared: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    kicker: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    date: Option<String>,
}

/// Errors that can occur when loading a config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },
}

impl ReportConfig {
    /// Resolve a `--config` argument: a directory means `<dir>/config.yaml`.
    pub fn resolve_path(path: &Path) -> PathBuf {
        if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        }
    }

    /// Load a config file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = Self::from_yaml_str(&content).map_err(|message| ConfigError::ParseError {
            path: path.display().to_string(),
            message,
        })?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Parse config from YAML text. An empty document yields defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self, String> {
        let value: serde_yaml::Value = serde_yaml::from_str(source).map_err(|e| e.to_string())?;
        if value.is_null() {
            return Ok(Self::default());
        }

        let raw: RawConfig = serde_yaml::from_value(value).map_err(|e| e.to_string())?;
        Ok(raw.into())
    }

    /// Directory that section, wrapper and asset paths are relative to.
    pub fn base_dir(config_path: &Path) -> PathBuf {
        match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Glob used for section discovery.
    pub fn section_glob(&self) -> &str {
        self.section_glob
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .unwrap_or(DEFAULT_SECTION_GLOB)
    }

    /// Explicitly declared sections, if the list is present and non-empty.
    pub fn declared_sections(&self) -> Option<&[String]> {
        self.sections.as_deref().filter(|s| !s.is_empty())
    }

    /// Local stylesheet directory name.
    pub fn local_theme_dir(&self) -> &str {
        self.theme_local_dir
            .as_deref()
            .map(|d| d.trim_end_matches('/'))
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_THEME_DIR)
    }

    /// Placeholder table for `[KEY]` substitution.
    pub fn placeholders(&self) -> Placeholders {
        let mut table = Placeholders::new();
        table.insert("TITLE", &self.title);
        table.insert("SUBTITLE", &self.subtitle);
        table.insert("PREPARED", &self.prepared);
        table.insert("AUTHOR", &self.prepared);
        table.insert("KICKER", &self.kicker);
        table.insert("DATE", &self.date);
        for (key, value) in &self.placeholders {
            table.insert(key, value);
        }
        table
    }

    /// Override for `role` that points outside the local theme directory:
    /// an explicit `theme.<role>` entry, else `theme_base_url`.
    pub fn external_theme_override(&self, role: ThemeRole) -> Option<String> {
        if let Some(explicit) = self.theme.as_ref().and_then(|t| t.get(role)) {
            return Some(explicit.to_string());
        }
        self.theme_base_url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .map(|u| format!("{}/{}", u, role.file_name()))
    }

    /// Resolve the stylesheet override for every role that has one.
    ///
    /// Precedence: explicit `theme.<role>`, then `theme_base_url`, then a
    /// non-default `theme_local_dir`.
    pub fn theme_overrides(&self) -> Vec<(ThemeRole, String)> {
        let local_dir = Some(self.local_theme_dir()).filter(|d| *d != DEFAULT_THEME_DIR);

        ThemeRole::ALL
            .iter()
            .filter_map(|role| {
                let href = self
                    .external_theme_override(*role)
                    .or_else(|| local_dir.map(|d| format!("{}/{}", d, role.file_name())))?;
                Some((*role, href))
            })
            .collect()
    }
}

impl From<RawConfig> for ReportConfig {
    fn from(raw: RawConfig) -> Self {
        let meta = raw.meta.unwrap_or_default();

        let pick = |top: Option<String>, fallback: Option<String>| {
            top.filter(|s| !s.is_empty())
                .or(fallback)
                .unwrap_or_default()
        };

        let prepared_top = raw.prepared.filter(|s| !s.is_empty()).or(raw.author);
        let prepared_meta = meta.prepared.filter(|s| !s.is_empty()).or(meta.author);

        let placeholders = raw
            .placeholders
            .into_iter()
            .map(|(key, value)| (key, yaml_scalar_to_string(&value)))
            .collect();

        Self {
            title: pick(raw.title, meta.title),
            subtitle: pick(raw.subtitle, meta.subtitle),
            prepared: pick(prepared_top, prepared_meta),
            kicker: pick(raw.kicker, meta.kicker),
            date: pick(raw.date, meta.date),
            sections: raw.sections,
            section_glob: raw.section_glob,
            theme: raw.theme,
            theme_base_url: raw.theme_base_url,
            theme_local_dir: raw.theme_local_dir,
            placeholders,
        }
    }
}

/// Accept any YAML scalar (`title: 2025`) for a text field.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| yaml_scalar_to_string(&v)))
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn parses_flat_layout() {
        let config = ReportConfig::from_yaml_str(
            r#"
title: Quarterly Report
subtitle: Q3
prepared: "Ops Team"
kicker: Internal
sections:
  - sections/01-intro.html
theme:
  general: https://cdn.example.com/general.css
  last: https://cdn.example.com/last-page.css
"#,
        )
        .unwrap();

        assert_eq!(config.title, "Quarterly Report");
        assert_eq!(config.prepared, "Ops Team");
        assert_eq!(
            config.declared_sections(),
            Some(&["sections/01-intro.html".to_string()][..])
        );
        let theme = config.theme.unwrap();
        assert_eq!(
            theme.get(ThemeRole::LastPage),
            Some("https://cdn.example.com/last-page.css")
        );
    }

    #[test]
    fn numeric_text_fields_are_read_as_strings() {
        let config = ReportConfig::from_yaml_str(
            "title: 2025\ndate: 2025\nmeta:\n  subtitle: 3.5\n  kicker: true\n",
        )
        .unwrap();

        assert_eq!(config.title, "2025");
        assert_eq!(config.date, "2025");
        assert_eq!(config.subtitle, "3.5");
        assert_eq!(config.kicker, "true");
    }

    #[test]
    fn parses_meta_layout() {
        let config = ReportConfig::from_yaml_str(
            r#"
meta:
  title: New Report
  author: Jane
  date: "2025-08-18"
section_glob: "*.htm"
theme_local_dir: theme
placeholders:
  COMPANY: Acme Inc
  YEAR: 2025
"#,
        )
        .unwrap();

        assert_eq!(config.title, "New Report");
        assert_eq!(config.prepared, "Jane");
        assert_eq!(config.date, "2025-08-18");
        assert_eq!(config.section_glob(), "*.htm");
        assert_eq!(config.local_theme_dir(), "theme");
        assert_eq!(config.placeholders["YEAR"], "2025");
    }

    #[test]
    fn top_level_keys_win_over_meta() {
        let config =
            ReportConfig::from_yaml_str("title: Top\nmeta:\n  title: Nested\n  subtitle: Sub\n")
                .unwrap();

        assert_eq!(config.title, "Top");
        assert_eq!(config.subtitle, "Sub");
    }

    #[test]
    fn author_is_alias_for_prepared() {
        let config = ReportConfig::from_yaml_str("author: Someone\n").unwrap();
        assert_eq!(config.prepared, "Someone");
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = ReportConfig::from_yaml_str("# only comments\n").unwrap();

        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.section_glob(), DEFAULT_SECTION_GLOB);
        assert!(config.declared_sections().is_none());
    }

    #[test]
    fn empty_sections_list_means_discover() {
        let config = ReportConfig::from_yaml_str("sections: []\n").unwrap();
        assert!(config.declared_sections().is_none());
    }

    #[test]
    fn rejects_malformed_yaml() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "title: [unclosed\n").unwrap();

        let result = ReportConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn missing_file_is_an_error_unless_defaulted() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");

        assert!(matches!(
            ReportConfig::load(&path),
            Err(ConfigError::NotFound(_))
        ));
        assert_eq!(
            ReportConfig::load_or_default(&path).unwrap(),
            ReportConfig::default()
        );
    }

    #[test]
    fn resolves_directory_to_config_file() {
        let temp = tempdir().unwrap();

        let resolved = ReportConfig::resolve_path(temp.path());

        assert_eq!(resolved, temp.path().join(CONFIG_FILE));
        assert_eq!(ReportConfig::base_dir(&resolved), temp.path());
        assert_eq!(
            ReportConfig::base_dir(Path::new("config.yaml")),
            PathBuf::from(".")
        );
    }

    #[test]
    fn theme_override_precedence() {
        let config = ReportConfig::from_yaml_str(
            r#"
theme_base_url: https://cdn.example.com/theme/
theme:
  cover: ./custom/cover.css
"#,
        )
        .unwrap();

        let overrides = config.theme_overrides();

        assert_eq!(overrides.len(), 5);
        assert!(overrides.contains(&(ThemeRole::Cover, "./custom/cover.css".to_string())));
        assert!(overrides.contains(&(
            ThemeRole::General,
            "https://cdn.example.com/theme/general.css".to_string()
        )));
    }

    #[test]
    fn default_theme_dir_has_no_overrides() {
        let config = ReportConfig::from_yaml_str("theme_local_dir: style\n").unwrap();
        assert!(config.theme_overrides().is_empty());

        let config = ReportConfig::from_yaml_str("theme_local_dir: theme\n").unwrap();
        assert!(config
            .theme_overrides()
            .contains(&(ThemeRole::Footer, "theme/footer.css".to_string())));
    }

    #[test]
    fn placeholder_table_includes_builtins_and_custom() {
        let config =
            ReportConfig::from_yaml_str("title: T\nprepared: P\nplaceholders:\n  COMPANY: Acme\n")
                .unwrap();

        let table = config.placeholders();

        assert_eq!(table.get("TITLE"), Some("T"));
        assert_eq!(table.get("AUTHOR"), Some("P"));
        assert_eq!(table.get("COMPANY"), Some("Acme"));
        assert_eq!(table.get("SUBTITLE"), Some(""));
    }
}
