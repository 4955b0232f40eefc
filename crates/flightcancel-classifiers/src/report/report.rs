use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

const STYLE: &str = r#"
body { font-family: Helvetica, Arial, sans-serif; margin: 2em auto; max-width: 1100px; color: #222; }
header { border-bottom: 2px solid #3c6e9f; margin-bottom: 1.5em; }
header .meta { color: #666; font-size: 0.9em; }
nav ul { list-style: none; padding-left: 0; }
nav li { display: inline; margin-right: 1em; }
section { margin-bottom: 2.5em; }
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #ccc; padding: 0.3em 0.8em; text-align: right; }
th:first-child, td:first-child { text-align: left; }
pre { background: #f5f5f5; padding: 1em; overflow-x: auto; }
"#;

/// A titled block of the report, rendered in insertion order.
pub struct ReportSection {
    title: String,
    content: Vec<Markup>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            content: Vec::new(),
        }
    }

    pub fn add_content(&mut self, content: Markup) {
        self.content.push(content);
    }

    /// Embed an interactive plot. The page loads plotly.js once in its head.
    pub fn add_plot(&mut self, plot: &Plot) {
        self.content.push(PreEscaped(plot.to_inline_html(None)));
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Standalone HTML report.
pub struct Report {
    software: String,
    version: String,
    title: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(software: &str, version: &str, title: &str) -> Self {
        Report {
            software: software.to_string(),
            version: version.to_string(),
            title: title.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    pub fn render(&self) -> Markup {
        let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style { (PreEscaped(STYLE)) }
                }
                body {
                    header {
                        h1 { (self.title) }
                        p class="meta" {
                            "Generated by " (self.software) " v" (self.version) " on " (generated)
                        }
                    }
                    nav {
                        ul {
                            @for (i, section) in self.sections.iter().enumerate() {
                                li { a href=(format!("#section-{}", i)) { (section.title) } }
                            }
                        }
                    }
                    @for (i, section) in self.sections.iter().enumerate() {
                        section id=(format!("section-{}", i)) {
                            h2 { (section.title) }
                            @for block in &section.content {
                                div class="block" { (block) }
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, self.render().into_string())
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }
}

/// Write `plot` as a standalone HTML page `<dir>/<stem>.html` and return its
/// path. With `show` set the plot is also opened in the default browser.
pub fn save_plot_html(plot: &Plot, dir: &Path, stem: &str, show: bool) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create plot directory {}", dir.display()))?;
    let path = dir.join(format!("{}.html", file_stem(stem)));
    fs::write(&path, plot.to_html())
        .with_context(|| format!("Failed to write plot {}", path.display()))?;
    log::debug!("Plot written to {}", path.display());
    if show {
        plot.show();
    }
    Ok(path)
}

/// Lowercase `name` and replace anything but ASCII alphanumerics with `_`.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Confusion Matrix - SVM"), "confusion_matrix___svm");
        assert_eq!(file_stem("Random Forest"), "random_forest");
    }

    #[test]
    fn test_report_renders_sections_in_order() {
        let mut report = Report::new("flightcancel", "0.1.0", "Run Report");
        let mut first = ReportSection::new("Overview");
        first.add_content(html! { p { "rows: 10" } });
        report.add_section(first);
        report.add_section(ReportSection::new("Comparison"));

        let page = report.render().into_string();
        let overview = page.find("Overview").unwrap();
        let comparison = page.find("Comparison").unwrap();
        assert!(overview < comparison);
        assert!(page.contains("rows: 10"));
        assert!(page.contains(PLOTLY_CDN));
    }

    #[test]
    fn test_save_to_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.html");
        let report = Report::new("flightcancel", "0.1.0", "Run Report");
        report.save_to_file(&path).unwrap();
        assert!(path.exists());
    }
}
