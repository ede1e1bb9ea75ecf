//! Built-in templates for scaffolding a report.

use minijinja::{context, AutoEscape, Environment};

use scriptura_report::ThemeRole;

/// Values that parameterise a freshly scaffolded report.
#[derive(Debug, Clone)]
pub struct ScaffoldContext {
    /// Report title written to config.yaml
    pub title: String,
    /// Subtitle written to config.yaml
    pub subtitle: String,
    /// Author line written to config.yaml
    pub prepared: String,
    /// Kicker written to config.yaml
    pub kicker: String,
    /// `lang` attribute of the wrapper
    pub lang: String,
}

impl Default for ScaffoldContext {
    fn default() -> Self {
        Self {
            title: "New Report".to_string(),
            subtitle: "Modular report with Paged.js".to_string(),
            prepared: "Author".to_string(),
            kicker: "Internal Report".to_string(),
            lang: "en".to_string(),
        }
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|name| {
            if name.ends_with(".html") {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });

        env.add_template("report.html", WRAPPER_TEMPLATE)
            .expect("Failed to add wrapper template");
        env.add_template("config.yaml", CONFIG_TEMPLATE)
            .expect("Failed to add config template");

        Self { env }
    }

    /// Render the wrapper template (`report.html`).
    pub fn render_wrapper(&self, ctx: &ScaffoldContext) -> Result<String, minijinja::Error> {
        self.env
            .get_template("report.html")?
            .render(context! { lang => &ctx.lang })
    }

    /// Render the starter `config.yaml`.
    pub fn render_config(&self, ctx: &ScaffoldContext) -> Result<String, minijinja::Error> {
        self.env.get_template("config.yaml")?.render(context! {
            title => &ctx.title,
            subtitle => &ctx.subtitle,
            prepared => &ctx.prepared,
            kicker => &ctx.kicker,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrapper used when a report has no `report.html` of its own.
pub fn default_wrapper() -> String {
    TemplateEngine::new()
        .render_wrapper(&ScaffoldContext::default())
        .unwrap_or_else(|_| WRAPPER_TEMPLATE.replace("{{ lang }}", "en"))
}

/// Sample section files, in order.
pub const SAMPLE_SECTIONS: [(&str, &str); 3] = [
    (
        "01-introduction.html",
        r#"<section class="page-break">
  <h1>Introduction</h1>
  <p>Project goals, scope and context for [TITLE].</p>
</section>
"#,
    ),
    (
        "02-methodology.html",
        r#"<section class="page-break">
  <h1>Methodology</h1>
  <p>Approach, data and tools.</p>
</section>
"#,
    ),
    (
        "03-results.html",
        r#"<section class="page-break">
  <h1>Results</h1>
  <p>Key findings and figures.</p>
</section>
"#,
    ),
];

/// Contents of the scaffolded `.gitignore`.
pub const GITIGNORE: &str = "build/\nnode_modules/\n*.tmp.html\n.DS_Store\n";

/// Starter stylesheet for a theme role.
pub fn starter_stylesheet(role: ThemeRole) -> &'static str {
    match role {
        ThemeRole::General => GENERAL_CSS,
        ThemeRole::Numbering => NUMBERING_CSS,
        ThemeRole::Footer => FOOTER_CSS,
        ThemeRole::Cover => COVER_CSS,
        ThemeRole::LastPage => LAST_PAGE_CSS,
    }
}

const WRAPPER_TEMPLATE: &str = r##"<!doctype html>
<html lang="{{ lang }}">
<head>
  <meta charset="utf-8" />
  <title>[TITLE]</title>

  <link rel="stylesheet" href="style/general.css" />
  <link rel="stylesheet" href="style/numbering.css" />
  <link rel="stylesheet" href="style/footer.css" />
  <link rel="stylesheet" href="style/cover.css" />
  <link rel="stylesheet" href="style/last-page.css" />

  <script>
    // Load sections/*.html into the body before Paged.js lays out pages.
    // `scriptura build` inlines sections and leaves the list empty.
    window.PagedConfig = {
      before: async () => {
        const cfg = window.__CONFIG__ || {};
        for (const file of (cfg.sections || [])) {
          try {
            const res = await fetch(file);
            if (!res.ok) { console.warn("Missing section:", file); continue; }
            const host = document.createElement("div");
            host.innerHTML = await res.text();
            document.body.insertBefore(host, document.getElementById("end"));
          } catch (e) {
            console.warn("Fetch error for", file, e);
          }
        }
      }
    };
  </script>
  <script src="https://unpkg.com/pagedjs/dist/paged.polyfill.js"></script>
</head>
<body>
  <section class="cover unnumbered">
    <div class="title-section">
      <div class="kicker">[KICKER]</div>
      <h1 id="title">[TITLE]</h1>
      <p class="subtitle">[SUBTITLE]</p>
      <div class="prepared">[PREPARED]</div>
    </div>
  </section>

  <section id="end" class="last-page unnumbered">
    <h1>Thank you</h1>
    <p>Thanks for reading.</p>
  </section>
</body>
</html>
"##;

const CONFIG_TEMPLATE: &str = r##"title: {{ title | tojson }}
subtitle: {{ subtitle | tojson }}
prepared: {{ prepared | tojson }}
kicker: {{ kicker | tojson }}
# date: "2025-01-01"

# Leave `sections` unset to pick up sections/*.html in 01-, 02-, ... order.
# sections:
#   - sections/01-introduction.html
# section_glob: "*.html"

# Override individual stylesheets with remote or relative locations:
# theme:
#   general: "https://example.com/theme/general.css"
#   numbering: "https://example.com/theme/numbering.css"
#   footer: "https://example.com/theme/footer.css"
#   cover: "https://example.com/theme/cover.css"
#   last: "https://example.com/theme/last-page.css"
# or point all of them at one location:
# theme_base_url: "https://example.com/theme"
# theme_local_dir: style

# Extra [KEY] tokens for the wrapper and sections:
# placeholders:
#   COMPANY: "Acme Inc"
"##;

const GENERAL_CSS: &str = r#"@page {
  size: A4;
  margin: 18mm 18mm 20mm 18mm;
}

body {
  font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
  font-size: 11pt;
  line-height: 1.5;
  color: #1f2328;
}

h1, h2, h3 {
  line-height: 1.2;
}

.page-break {
  break-before: page;
}

img {
  max-width: 100%;
}
"#;

const NUMBERING_CSS: &str = r#"body {
  counter-reset: chapter;
}

section.page-break h1 {
  counter-increment: chapter;
  counter-reset: subsection;
}

section.page-break h1::before {
  content: counter(chapter) ". ";
}

section.page-break h2 {
  counter-increment: subsection;
}

section.page-break h2::before {
  content: counter(chapter) "." counter(subsection) " ";
}
"#;

const FOOTER_CSS: &str = r#"@page {
  @bottom-center {
    content: counter(page) " / " counter(pages);
    font-size: 9pt;
    color: #57606a;
  }
}

@page :first {
  @bottom-center {
    content: none;
  }
}
"#;

const COVER_CSS: &str = r#".cover {
  break-after: page;
  height: 100%;
  display: flex;
  align-items: center;
}

.cover .kicker {
  text-transform: uppercase;
  letter-spacing: 0.1em;
  color: #57606a;
}

.cover h1 {
  font-size: 32pt;
  margin: 0.25em 0;
}

.cover .subtitle {
  font-size: 14pt;
}
"#;

const LAST_PAGE_CSS: &str = r#".last-page {
  break-before: page;
  text-align: center;
  padding-top: 40%;
}

@page :last {
  @bottom-center {
    content: none;
  }
}
"#;
