//! Timeline module: dated entries grouped by label.
//!
//! A card description may carry date lines such as `2021-03-04: Opened the
//! shop`. They are collected into `extra.timeline`; the first one (or the
//! card's last activity) dates the card itself.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use serde_json::json;

use super::{label_name, load_pages};
use crate::module::{
    ModuleError, ModuleResponse, PageContext, PageModule, Route, RouteHandler, RouteTable,
};
use crate::page::CardPage;

/// Group name for cards without a named label.
const UNLABELED: &str = "Other";

static DATE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(\d{4}-\d{2}-\d{2})\s*[:\-]\s*(.+?)\s*$").unwrap()
});

/// Timeline backed by one card list.
pub struct TimelineModule {
    list_id: Option<String>,
}

impl TimelineModule {
    /// Create the module. It is active when `list_id` is set.
    #[must_use]
    pub fn new(list_id: Option<String>) -> Self {
        Self { list_id }
    }
}

#[async_trait]
impl PageModule for TimelineModule {
    fn page_type(&self) -> &str {
        "timeline"
    }

    fn display_name(&self) -> Option<&str> {
        self.list_id.as_ref().map(|_| "Timeline")
    }

    fn routes(&self) -> RouteTable {
        RouteTable::new().route(
            Route::relative(""),
            TimelineIndex {
                list_id: self.list_id.clone().unwrap_or_default(),
            },
        )
    }

    fn templates(&self) -> &'static [&'static str] {
        &["timeline"]
    }

    async fn process_card(&self, page: &mut CardPage) -> Result<(), ModuleError> {
        let entries = date_lines(&page.card.description);
        if !entries.is_empty() {
            let entries = serde_json::to_value(entries)
                .map_err(|e| ModuleError::Failed(e.to_string()))?;
            page.extra.insert("timeline".to_owned(), entries);
        }
        Ok(())
    }
}

/// A dated line from a card description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct DateLine {
    date: NaiveDate,
    text: String,
}

fn date_lines(description: &str) -> Vec<DateLine> {
    DATE_LINE_RE
        .captures_iter(description)
        .filter_map(|caps| {
            let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
            Some(DateLine {
                date,
                text: caps[2].to_owned(),
            })
        })
        .collect()
}

#[derive(Serialize)]
struct TimelineEntry {
    date: NaiveDate,
    #[serde(flatten)]
    page: CardPage,
}

#[derive(Serialize)]
struct TimelineGroup {
    name: String,
    color: Option<String>,
    entries: Vec<TimelineEntry>,
}

struct TimelineIndex {
    list_id: String,
}

#[async_trait]
impl RouteHandler for TimelineIndex {
    async fn call(&self, ctx: &PageContext<'_>) -> Result<ModuleResponse, ModuleError> {
        let pages = load_pages(ctx, &self.list_id).await?;
        let groups = group_by_label(pages)?;

        Ok(ModuleResponse::render(
            "timeline",
            "Timeline",
            json!({ "groups": groups }),
        ))
    }
}

/// Group pages by their first label, in order of first appearance, with
/// entries in date order.
fn group_by_label(pages: Vec<CardPage>) -> Result<Vec<TimelineGroup>, ModuleError> {
    let mut groups: Vec<TimelineGroup> = Vec::new();

    for mut page in pages {
        let lines = date_lines(&page.card.description);
        let date = lines
            .first()
            .map_or_else(|| page.card.last_activity_at.date_naive(), |line| line.date);
        let value =
            serde_json::to_value(&lines).map_err(|e| ModuleError::Failed(e.to_string()))?;
        page.extra.insert("timeline".to_owned(), value);

        let name = label_name(&page.card).unwrap_or(UNLABELED).to_owned();
        let entry = TimelineEntry { date, page };
        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.entries.push(entry),
            None => groups.push(TimelineGroup {
                color: entry.page.card.labels.first().and_then(|l| l.color.clone()),
                name,
                entries: vec![entry],
            }),
        }
    }

    for group in &mut groups {
        group.entries.sort_by_key(|entry| entry.date);
    }
    Ok(groups)
}
