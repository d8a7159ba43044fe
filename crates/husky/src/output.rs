//! Terminal reporting for `serve` and `check`.
//!
//! Everything goes to stderr so it never mixes with logs piped from stdout.

use console::{Style, Term};
use husky_config::Config;
use husky_server::SiteSummary;

/// Writes styled CLI reports to stderr.
pub(crate) struct Output {
    term: Term,
    title: Style,
    ok: Style,
    failure: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            title: Style::new().cyan().bold(),
            ok: Style::new().green(),
            failure: Style::new().red(),
        }
    }

    /// Startup banner shown before the server binds.
    pub(crate) fn banner(&self, config: &Config) {
        self.write(&self.title, &config.site.name);
        for line in banner_lines(config) {
            self.write_plain(&line);
        }
    }

    /// Result of `husky check`.
    pub(crate) fn summary(&self, summary: &SiteSummary) {
        self.write(&self.ok, "Configuration OK");
        for line in summary_lines(summary) {
            self.write_plain(&line);
        }
    }

    /// Fatal error line.
    pub(crate) fn error(&self, err: &dyn std::fmt::Display) {
        self.write(&self.failure, &format!("Error: {err}"));
    }

    fn write(&self, style: &Style, msg: &str) {
        self.write_plain(&style.apply_to(msg).to_string());
    }

    fn write_plain(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }
}

fn banner_lines(config: &Config) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ),
        format!("Site mode: {}", config.site.mode),
        format!("Templates: {}", config.paths.templates_dir.display()),
    ];
    if config.dev_mode {
        lines.push("Card cache: disabled (development mode)".to_owned());
    }
    lines
}

fn summary_lines(summary: &SiteSummary) -> Vec<String> {
    let modules = if summary.active_modules.is_empty() {
        "none".to_owned()
    } else {
        summary.active_modules.join(", ")
    };

    let mut lines = vec![
        format!("Site mode: {}", summary.mode),
        format!("Active modules: {modules}"),
        "Routes:".to_owned(),
    ];
    lines.extend(summary.routes.iter().map(|route| format!("  {route}")));
    lines
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Config {
        Config::from_lookup(|key| {
            [
                ("TRELLO_APP_KEY", "key"),
                ("TRELLO_TOKEN", "token"),
                ("SITE_NAME", "Husky"),
                ("SITE_MODE", "multi"),
                ("TEMPLATES_DIR", "templates"),
            ]
            .iter()
            .chain(vars)
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_owned())
        })
        .unwrap()
    }

    #[test]
    fn test_banner_lines() {
        let lines = banner_lines(&config(&[("PORT", "8080")]));

        assert_eq!(
            lines,
            [
                "Starting server on 127.0.0.1:8080",
                "Site mode: multi",
                "Templates: templates",
            ]
        );
    }

    #[test]
    fn test_banner_lines_development_mode() {
        let lines = banner_lines(&config(&[("HUSKY_ENV", "development")]));

        assert_eq!(
            lines.last().map(String::as_str),
            Some("Card cache: disabled (development mode)")
        );
    }

    #[test]
    fn test_summary_lines() {
        let summary = SiteSummary {
            mode: "multi".to_owned(),
            active_modules: vec!["blog".to_owned(), "timeline".to_owned()],
            routes: vec!["/blog/".to_owned(), "/".to_owned()],
        };

        assert_eq!(
            summary_lines(&summary),
            [
                "Site mode: multi",
                "Active modules: blog, timeline",
                "Routes:",
                "  /blog/",
                "  /",
            ]
        );
    }

    #[test]
    fn test_summary_lines_without_modules() {
        let summary = SiteSummary {
            mode: "timeline".to_owned(),
            active_modules: Vec::new(),
            routes: vec!["/".to_owned()],
        };

        assert_eq!(summary_lines(&summary)[1], "Active modules: none");
    }
}
