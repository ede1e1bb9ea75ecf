//! Assembly of the wrapper template and section fragments into one document.

use serde::Serialize;

use scriptura_report::{ReportConfig, ThemeRole};

/// Marker the section content is inserted in front of.
pub const END_MARKER: &str = r#"<section id="end""#;

/// Snapshot exposed to client-side scripts as `window.__CONFIG__`.
#[derive(Debug, Serialize)]
struct BootConfig<'a> {
    title: &'a str,
    subtitle: &'a str,
    prepared: &'a str,
    kicker: &'a str,
    date: &'a str,
    /// Always empty: sections are inlined, which turns off the client loader.
    sections: [&'a str; 0],
}

/// Assemble a complete report document.
///
/// `sections` are already read (and placeholder-substituted) fragments, in
/// report order. Insertion points are located on the wrapper before any
/// placeholder is substituted, so metadata values cannot move them.
pub fn assemble(wrapper: &str, config: &ReportConfig, sections: &[String]) -> String {
    let overrides = config.theme_overrides();
    let wrapper = if overrides.is_empty() {
        wrapper.to_string()
    } else {
        override_theme_links(wrapper, &overrides)
    };

    let mut inserts = Vec::with_capacity(2);
    match wrapper.find("</head>") {
        Some(pos) => inserts.push((pos, boot_script(config))),
        None => tracing::debug!("Wrapper has no </head>, skipping config snapshot"),
    }
    inserts.push((
        section_insertion_point(&wrapper),
        format!("{}\n", sections.join("\n")),
    ));
    inserts.sort_by_key(|(pos, _)| *pos);

    let placeholders = config.placeholders();
    let mut out = String::with_capacity(wrapper.len());
    let mut last = 0;
    for (pos, insert) in inserts {
        out.push_str(&placeholders.apply(&wrapper[last..pos]));
        out.push_str(&insert);
        last = pos;
    }
    out.push_str(&placeholders.apply(&wrapper[last..]));
    out
}

/// Insert `<script>window.__CONFIG__ = ...</script>` before the first `</head>`.
pub fn inject_boot_config(html: &str, config: &ReportConfig) -> String {
    let Some(pos) = html.find("</head>") else {
        tracing::debug!("Wrapper has no </head>, skipping config snapshot");
        return html.to_string();
    };

    let script = boot_script(config);
    let mut out = String::with_capacity(html.len() + script.len());
    out.push_str(&html[..pos]);
    out.push_str(&script);
    out.push_str(&html[pos..]);
    out
}

fn boot_script(config: &ReportConfig) -> String {
    let boot = BootConfig {
        title: &config.title,
        subtitle: &config.subtitle,
        prepared: &config.prepared,
        kicker: &config.kicker,
        date: &config.date,
        sections: [],
    };
    // Serializing plain strings cannot fail.
    let json = serde_json::to_string_pretty(&boot)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");

    format!("<script>\nwindow.__CONFIG__ = {};\n</script>\n", json)
}

/// Rewrite the known local stylesheet references to their overrides.
///
/// Only `href="style/<role file>"` (either quote style) is touched.
pub fn override_theme_links(html: &str, overrides: &[(ThemeRole, String)]) -> String {
    let mut html = html.to_string();
    for (role, target) in overrides {
        let local = role.local_href();
        for quote in ['"', '\''] {
            let from = format!("href={quote}{local}{quote}");
            let to = format!("href={quote}{target}{quote}");
            html = html.replace(&from, &to);
        }
    }
    html
}

/// Insert `content` once, before the end marker, else before `</body>`,
/// else at the end.
pub fn insert_sections(html: &str, content: &str) -> String {
    let pos = section_insertion_point(html);

    let mut out = String::with_capacity(html.len() + content.len() + 1);
    out.push_str(&html[..pos]);
    out.push_str(content);
    out.push('\n');
    out.push_str(&html[pos..]);
    out
}

fn section_insertion_point(html: &str) -> usize {
    html.find(END_MARKER)
        .or_else(|| html.rfind("</body>"))
        .unwrap_or(html.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WRAPPER: &str = r#"<html><head><title>[TITLE]</title>
<link rel="stylesheet" href="style/general.css" />
<link rel="stylesheet" href="style/numbering.css" />
<link rel="stylesheet" href="style/footer.css" />
<link rel="stylesheet" href="style/cover.css" />
<link rel="stylesheet" href="style/last-page.css" />
<link rel="stylesheet" href="style/extra.css" />
<link rel="icon" href="favicon.ico" />
</head><body>
<section class="cover"><h1>[TITLE]</h1><p>[SUBTITLE]</p></section>
<section id="end"><h1>Thanks</h1></section>
</body></html>"#;

    fn config() -> ReportConfig {
        ReportConfig {
            title: "Annual".to_string(),
            subtitle: "2025".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn inserts_sections_once_before_end_marker_in_order() {
        let sections = vec![
            "<section>ONE</section>".to_string(),
            "<section>TWO</section>".to_string(),
        ];

        let html = assemble(WRAPPER, &config(), &sections);

        assert_eq!(html.matches("ONE").count(), 1);
        assert_eq!(html.matches("TWO").count(), 1);
        let one = html.find("ONE").unwrap();
        let two = html.find("TWO").unwrap();
        let end = html.find(END_MARKER).unwrap();
        assert!(one < two && two < end);
        assert!(html[two..end].starts_with("TWO</section>\n"));
    }

    #[test]
    fn falls_back_to_body_close() {
        let html = insert_sections("<body><p>x</p></body>", "<section>S</section>");
        assert_eq!(html, "<body><p>x</p><section>S</section>\n</body>");
    }

    #[test]
    fn appends_when_no_marker_or_body() {
        let html = insert_sections("<p>x</p>", "S");
        assert_eq!(html, "<p>x</p>S\n");
    }

    #[test]
    fn substitutes_placeholders() {
        let html = assemble(WRAPPER, &config(), &[]);

        assert!(html.contains("<title>Annual</title>"));
        assert!(html.contains("<p>2025</p>"));
        assert!(!html.contains("[TITLE]"));
    }

    #[test]
    fn injects_boot_config_before_head_close() {
        let html = inject_boot_config("<head></head><body></body>", &config());

        let script = html.find("window.__CONFIG__").unwrap();
        assert!(script < html.find("</head>").unwrap());
        assert!(html.contains(r#""title": "Annual""#));
        assert!(html.contains(r#""sections": []"#));
    }

    #[test]
    fn boot_config_escapes_script_close() {
        let config = ReportConfig {
            title: "</script><b>".to_string(),
            ..Default::default()
        };

        let html = inject_boot_config("<head></head>", &config);

        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains(r#"<\/script><b>"#));
    }

    #[test]
    fn markup_in_metadata_does_not_move_insertion_points() {
        let config = ReportConfig {
            title: "A </head> and <section id=\"end\"> title".to_string(),
            ..Default::default()
        };
        let sections = vec!["<section>BODY</section>".to_string()];

        let html = assemble(WRAPPER, &config, &sections);

        let title_close = html.find("</title>").unwrap();
        let script = html.find("window.__CONFIG__").unwrap();
        assert!(script > title_close);
        let body = html.find("BODY").unwrap();
        let end = html.find(r#"<section id="end"><h1>Thanks"#).unwrap();
        assert!(body > html.find("<section class=\"cover\">").unwrap());
        assert!(body < end);
    }

    #[test]
    fn wrapper_without_head_is_left_alone() {
        assert_eq!(inject_boot_config("<body></body>", &config()), "<body></body>");
    }

    #[test]
    fn theme_override_touches_only_known_links() {
        let config = ReportConfig::from_yaml_str(
            "theme_base_url: https://cdn.example.com/theme\n",
        )
        .unwrap();

        let html = assemble(WRAPPER, &config, &[]);

        for role in ThemeRole::ALL {
            assert!(html.contains(&format!(
                "href=\"https://cdn.example.com/theme/{}\"",
                role.file_name()
            )));
            assert!(!html.contains(&format!("href=\"{}\"", role.local_href())));
        }
        assert!(html.contains(r#"href="style/extra.css""#));
        assert!(html.contains(r#"href="favicon.ico""#));
    }

    #[test]
    fn theme_override_handles_single_quotes() {
        let overrides = vec![(ThemeRole::Cover, "remote/cover.css".to_string())];

        let html = override_theme_links("<link href='style/cover.css'>", &overrides);

        assert_eq!(html, "<link href='remote/cover.css'>");
    }

    #[test]
    fn no_overrides_leaves_links_unchanged() {
        let html = assemble(WRAPPER, &ReportConfig::default(), &[]);
        assert!(html.contains(r#"href="style/general.css""#));
    }
}
