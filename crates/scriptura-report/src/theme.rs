//! Theme stylesheet roles and overrides.

use serde::Deserialize;

/// The fixed set of stylesheets a report wrapper links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeRole {
    General,
    Numbering,
    Footer,
    Cover,
    LastPage,
}

impl ThemeRole {
    /// All roles, in link order.
    pub const ALL: [ThemeRole; 5] = [
        ThemeRole::General,
        ThemeRole::Numbering,
        ThemeRole::Footer,
        ThemeRole::Cover,
        ThemeRole::LastPage,
    ];

    /// Stylesheet file name for this role.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::General => "general.css",
            Self::Numbering => "numbering.css",
            Self::Footer => "footer.css",
            Self::Cover => "cover.css",
            Self::LastPage => "last-page.css",
        }
    }

    /// The `href` a wrapper uses for the local copy, e.g. `style/cover.css`.
    pub fn local_href(&self) -> String {
        format!("{}/{}", crate::config::DEFAULT_THEME_DIR, self.file_name())
    }
}

/// Per-role overrides from the `theme:` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub general: Option<String>,
    pub numbering: Option<String>,
    pub footer: Option<String>,
    pub cover: Option<String>,
    pub last: Option<String>,
    #[serde(rename = "last-page")]
    pub last_page: Option<String>,
}

impl ThemeConfig {
    /// Override for a role. Empty strings count as unset.
    pub fn get(&self, role: ThemeRole) -> Option<&str> {
        let value = match role {
            ThemeRole::General => self.general.as_deref(),
            ThemeRole::Numbering => self.numbering.as_deref(),
            ThemeRole::Footer => self.footer.as_deref(),
            ThemeRole::Cover => self.cover.as_deref(),
            ThemeRole::LastPage => self
                .last
                .as_deref()
                .filter(|s| !s.is_empty())
                .or(self.last_page.as_deref()),
        };
        value.filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_hrefs_point_into_style_dir() {
        let hrefs: Vec<String> = ThemeRole::ALL.iter().map(|r| r.local_href()).collect();

        assert_eq!(
            hrefs,
            vec![
                "style/general.css",
                "style/numbering.css",
                "style/footer.css",
                "style/cover.css",
                "style/last-page.css",
            ]
        );
    }

    #[test]
    fn last_page_accepts_both_keys() {
        let theme = ThemeConfig {
            last_page: Some("a.css".to_string()),
            ..Default::default()
        };
        assert_eq!(theme.get(ThemeRole::LastPage), Some("a.css"));

        let theme = ThemeConfig {
            last: Some("b.css".to_string()),
            last_page: Some("a.css".to_string()),
            ..Default::default()
        };
        assert_eq!(theme.get(ThemeRole::LastPage), Some("b.css"));
    }

    #[test]
    fn empty_override_is_unset() {
        let theme = ThemeConfig {
            general: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(theme.get(ThemeRole::General), None);
    }
}
