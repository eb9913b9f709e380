use crate::services::currency_format::CurrencyFormat;
use once_cell::sync::Lazy;
use regex::Regex;

const TITLE_SEPARATOR: &str = " — ";
const STYLE_SEPARATOR: &str = " + ";
const UNNAMED_DESTINATION: &str = "Your Trip";

// Leading "Day 3:", "day 3 -", "DAY3—" etc. Spaces are allowed around the separator.
static DAY_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*day\s*\d+\s*[:\x{2014}-]?\s*").unwrap());

/// Canonical label for the day at zero-based `index`.
///
/// Any numbering supplied upstream is discarded and replaced with `index + 1`;
/// the descriptive text after it is kept.
pub fn normalize_title(index: usize, raw_title: &str, location: &str) -> String {
    let display_number = index + 1;
    let trimmed = raw_title.trim();

    if trimmed.is_empty() {
        let location = location.trim();
        return if location.is_empty() {
            format!("Day {}", display_number)
        } else {
            format!("Day {}{}{}", display_number, TITLE_SEPARATOR, location)
        };
    }

    let suffix = match DAY_PREFIX_RE.find(trimmed) {
        Some(prefix) => trimmed[prefix.end()..].trim(),
        None => trimmed,
    };

    if suffix.is_empty() {
        format!("Day {}", display_number)
    } else {
        format!("Day {}: {}", display_number, suffix)
    }
}

/// Inputs for a composed trip title.
#[derive(Debug, Clone, Default)]
pub struct TitleParts<'a> {
    pub supplied_title: Option<&'a str>,
    pub destination: Option<&'a str>,
    pub day_count: usize,
    pub styles: &'a [String],
    pub budget_tier: Option<&'a str>,
    pub pace: Option<&'a str>,
    pub budget_usd: Option<f64>,
}

/// Returns the supplied title when it is non-blank, otherwise joins the
/// non-empty trip facts in a fixed order.
pub fn compose_title(parts: &TitleParts, format: &CurrencyFormat) -> String {
    if let Some(title) = parts.supplied_title {
        if !title.trim().is_empty() {
            return title.to_string();
        }
    }

    let non_blank = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let styles: Vec<&str> = parts
        .styles
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let fields = [
        Some(non_blank(parts.destination).unwrap_or_else(|| UNNAMED_DESTINATION.to_string())),
        (parts.day_count > 0).then(|| format!("{} days", parts.day_count)),
        (!styles.is_empty()).then(|| styles.join(STYLE_SEPARATOR)),
        non_blank(parts.budget_tier),
        non_blank(parts.pace),
        parts
            .budget_usd
            .filter(|amount| amount.is_finite() && *amount != 0.0)
            .map(|amount| format!("~{}", format.format(amount))),
    ];

    fields
        .into_iter()
        .flatten()
        .collect::<Vec<String>>()
        .join(TITLE_SEPARATOR)
}
