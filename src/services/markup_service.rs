//! Itinerary to standalone HTML, for email bodies and downloads.
//!
//! Every piece of text is escaped first and only then scanned for `**bold**`
//! and `*italic*` markers, so model output can never inject markup.

use crate::models::itinerary::{BudgetTable, DayPlan};
use crate::services::currency_format::CurrencyFormat;
use crate::services::title_service::normalize_title;
use once_cell::sync::Lazy;
use regex::Regex;

const DEFAULT_DOCUMENT_TITLE: &str = "Travel Itinerary";

const STYLE_RULES: &str = r#"
    body { font-family: Arial, Helvetica, sans-serif; line-height: 1.6; color: #1f2933; margin: 0; padding: 24px; }
    .container { max-width: 720px; margin: 0 auto; }
    h1 { color: #0b4f6c; font-size: 28px; margin-bottom: 16px; }
    section.day { border-left: 4px solid #01baef; padding: 4px 16px; margin: 20px 0; }
    section.day h2 { font-size: 20px; margin: 8px 0; color: #0b4f6c; }
    .meta { color: #616e7c; font-size: 14px; margin: 0 0 8px; }
    ul { padding-left: 20px; }
    li { margin: 4px 0; }
    .tip { background: #fff8e1; border-left: 4px solid #f9a825; padding: 8px 12px; margin: 10px 0; border-radius: 4px; }
    table.budget { border-collapse: collapse; width: 100%; margin-top: 24px; }
    table.budget th, table.budget td { border: 1px solid #cbd2d9; padding: 6px 10px; text-align: right; }
    table.budget th:first-child, table.budget td:first-child { text-align: left; }
    table.budget tfoot th { background: #f5f7fa; }
"#;

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\n]+?)\*").unwrap());
// "Local tip:" after an optional bullet, with the label optionally in `*` or `**`
static TIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:[-*\x{2022}]\s*)?\*{0,2}local tip\*{0,2}:\*{0,2}\s*(.*)$").unwrap()
});
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-*\x{2022}]\s+(.*)$").unwrap());
// A line opening a "Day N:" section, optionally as a markdown heading or in bold
static DAY_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:#+[ \t]*)?(?:\*\*)?day[ \t]*\d+[ \t]*:").unwrap()
});

/// What to render: normalized day data, or the generation service's raw text.
#[derive(Debug, Clone)]
pub enum MarkupSource<'a> {
    Structured {
        trip_title: &'a str,
        days: &'a [DayPlan],
        budget: Option<&'a BudgetTable>,
    },
    Text {
        title: Option<&'a str>,
        body: &'a str,
    },
}

pub fn render_to_html(source: &MarkupSource, format: &CurrencyFormat) -> String {
    match source {
        MarkupSource::Structured {
            trip_title,
            days,
            budget,
        } => {
            let mut body = String::new();
            for day in days.iter() {
                body.push_str(&render_day(day));
            }
            if let Some(table) = budget {
                body.push_str(&render_budget(table, format));
            }
            document(trip_title, &body)
        }
        MarkupSource::Text { title, body } => {
            let title = title
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_DOCUMENT_TITLE);
            document(title, &render_text(body))
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn apply_emphasis(escaped: &str) -> String {
    let bold = BOLD_RE.replace_all(escaped, "<strong>${1}</strong>");
    ITALIC_RE.replace_all(&bold, "<em>${1}</em>").into_owned()
}

fn inline(text: &str) -> String {
    apply_emphasis(&escape_html(text.trim()))
}

fn document(title: &str, body: &str) -> String {
    let title = escape_html(title);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLE_RULES}</style>\n</head>\n<body>\n\
         <div class=\"container\">\n<h1>{title}</h1>\n{body}</div>\n</body>\n</html>\n"
    )
}

enum Block {
    Tip(String),
    Bullet(String),
    Text(String),
}

fn classify(line: &str) -> Block {
    if let Some(caps) = TIP_RE.captures(line) {
        return Block::Tip(caps[1].to_string());
    }
    if let Some(caps) = BULLET_RE.captures(line) {
        return Block::Bullet(caps[1].to_string());
    }
    Block::Text(line.to_string())
}

/// Consecutive bullets share one list; tips and plain lines break it.
fn render_blocks(blocks: impl IntoIterator<Item = Block>) -> String {
    let mut html = String::new();
    let mut in_list = false;

    for block in blocks {
        let is_bullet = matches!(block, Block::Bullet(_));
        if is_bullet && !in_list {
            html.push_str("<ul>\n");
        } else if !is_bullet && in_list {
            html.push_str("</ul>\n");
        }
        in_list = is_bullet;

        match block {
            Block::Tip(text) => html.push_str(&format!(
                "<div class=\"tip\"><strong>Local Tip:</strong> {}</div>\n",
                inline(&text)
            )),
            Block::Bullet(text) => html.push_str(&format!("<li>{}</li>\n", inline(&text))),
            Block::Text(text) => html.push_str(&format!("<p>{}</p>\n", inline(&text))),
        }
    }

    if in_list {
        html.push_str("</ul>\n");
    }
    html
}

fn render_day(day: &DayPlan) -> String {
    let title = normalize_title(day.index, &day.title, &day.location);

    let meta: Vec<String> = day
        .date
        .map(|d| d.format("%a, %b %-d, %Y").to_string())
        .into_iter()
        .chain(Some(day.location.trim().to_string()).filter(|l| !l.is_empty()))
        .map(|part| escape_html(&part))
        .collect();

    // Every activity is a list item unless it is a tip
    let blocks = day
        .activities
        .iter()
        .filter(|a| !a.trim().is_empty())
        .map(|activity| match classify(activity) {
            Block::Text(text) => Block::Bullet(text),
            other => other,
        });

    let mut html = format!("<section class=\"day\">\n<h2>{}</h2>\n", inline(&title));
    if !meta.is_empty() {
        html.push_str(&format!("<p class=\"meta\">{}</p>\n", meta.join(" &middot; ")));
    }
    html.push_str(&render_blocks(blocks));
    html.push_str("</section>\n");
    html
}

fn render_budget(table: &BudgetTable, format: &CurrencyFormat) -> String {
    let mut html = String::from(
        "<table class=\"budget\">\n<thead><tr><th>Category</th><th>Budget</th>\
         <th>Mid-range</th><th>Luxury</th></tr></thead>\n<tbody>\n",
    );
    for row in &table.rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&row.category),
            escape_html(&format.format(row.budget)),
            escape_html(&format.format(row.mid)),
            escape_html(&format.format(row.luxury)),
        ));
    }
    let totals = table.totals();
    html.push_str(&format!(
        "</tbody>\n<tfoot><tr><th>Total</th><th>{}</th><th>{}</th><th>{}</th></tr></tfoot>\n</table>\n",
        escape_html(&format.format(totals.budget)),
        escape_html(&format.format(totals.mid)),
        escape_html(&format.format(totals.luxury)),
    ));
    html
}

fn clean_heading(line: &str) -> &str {
    let line = line.trim().trim_start_matches('#').trim();
    match line.strip_prefix("**").and_then(|l| l.strip_suffix("**")) {
        Some(inner) if !inner.contains("**") => inner.trim(),
        _ => line,
    }
}

fn render_section(section: &str) -> String {
    let mut lines = section.lines();
    let heading = lines.next().map(clean_heading).unwrap_or_default();
    let blocks = lines.filter(|l| !l.trim().is_empty()).map(classify);

    format!(
        "<section class=\"day\">\n<h2>{}</h2>\n{}</section>\n",
        inline(heading),
        render_blocks(blocks)
    )
}

fn render_text(text: &str) -> String {
    let starts: Vec<usize> = DAY_LINE_RE.find_iter(text).map(|m| m.start()).collect();

    if starts.is_empty() {
        let paragraph = text
            .trim()
            .lines()
            .map(escape_html)
            .collect::<Vec<String>>()
            .join("<br>\n");
        return format!("<p>{}</p>\n", paragraph);
    }

    let mut html = String::new();
    let preamble = &text[..starts[0]];
    if !preamble.trim().is_empty() {
        let blocks = preamble
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(classify);
        html.push_str(&format!("<div class=\"intro\">\n{}</div>\n", render_blocks(blocks)));
    }

    for (i, start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        html.push_str(&render_section(&text[*start..end]));
    }
    html
}
