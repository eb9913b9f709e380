use crate::config::FillerTemplate;
use crate::models::itinerary::DayPlan;
use crate::services::title_service::normalize_title;
use serde_json::Value;

/// Field names accepted for a day's activity list, checked in this order.
pub const ACTIVITY_FIELD_ALIASES: [&str; 2] = ["items", "bullets"];

/// Builds exactly `requested_count` days from a loosely shaped source list.
///
/// Source entries past `requested_count` are dropped; missing entries are
/// filled from `filler`. `source_days` that is not a JSON array counts as empty.
/// `requested_count` must already be resolved to a positive number.
pub fn reconcile_days(
    requested_count: usize,
    source_days: Option<&Value>,
    destination: &str,
    filler: &FillerTemplate,
) -> Vec<DayPlan> {
    debug_assert!(requested_count > 0, "requested day count must be positive");

    let source: &[Value] = match source_days {
        Some(Value::Array(days)) => days.as_slice(),
        _ => &[],
    };

    let mut days: Vec<DayPlan> = source
        .iter()
        .take(requested_count)
        .enumerate()
        .map(|(index, record)| day_from_record(index, record, destination))
        .collect();

    while days.len() < requested_count {
        let index = days.len();
        days.push(filler_day(index, destination, filler));
    }

    days
}

fn day_from_record(index: usize, record: &Value, destination: &str) -> DayPlan {
    let location = non_blank_str(record.get("location"))
        .unwrap_or(destination)
        .to_string();
    let raw_title = non_blank_str(record.get("title")).unwrap_or("");

    DayPlan {
        index,
        title: normalize_title(index, raw_title, &location),
        activities: extract_activities(record),
        location,
        date: None,
    }
}

fn filler_day(index: usize, destination: &str, filler: &FillerTemplate) -> DayPlan {
    DayPlan {
        index,
        title: format!("Day {}: {}", index + 1, filler.title_suffix_for(destination)),
        location: destination.to_string(),
        activities: filler.activities.clone(),
        date: None,
    }
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// First alias holding an array wins. Scalars are kept as text; nulls and nested values are dropped.
fn extract_activities(record: &Value) -> Vec<String> {
    let list = ACTIVITY_FIELD_ALIASES
        .iter()
        .find_map(|alias| record.get(*alias).and_then(Value::as_array));

    match list {
        Some(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filler() -> FillerTemplate {
        FillerTemplate::default()
    }

    #[test]
    fn test_short_list_is_padded_with_filler() {
        let source = json!([{ "title": "Day 1 Arrival", "items": ["check in"] }]);

        let days = reconcile_days(3, Some(&source), "Kyoto", &filler());

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].title, "Day 1: Arrival");
        assert_eq!(days[0].location, "Kyoto");
        assert_eq!(days[0].activities, vec!["check in".to_string()]);
        assert_eq!(days[1].title, "Day 2: Highlights in Kyoto");
        assert_eq!(days[2].title, "Day 3: Highlights in Kyoto");
        assert_eq!(days[2].location, "Kyoto");
        assert_eq!(days[2].activities, filler().activities);
    }

    #[test]
    fn test_long_list_is_truncated() {
        let source = json!([
            { "title": "A" },
            { "title": "B" },
            { "title": "C" },
            { "title": "D" }
        ]);

        let days = reconcile_days(2, Some(&source), "Rome", &filler());

        let titles: Vec<&str> = days.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Day 1: A", "Day 2: B"]);
    }

    #[test]
    fn test_every_count_produces_exact_length_with_matching_indices() {
        let source = json!([
            { "title": "Day 5: Market", "bullets": ["x"] },
            { "title": "Hike", "items": ["y", "z"] }
        ]);

        for count in 1..=6 {
            let days = reconcile_days(count, Some(&source), "Oslo", &filler());
            assert_eq!(days.len(), count);
            for (position, day) in days.iter().enumerate() {
                assert_eq!(day.index, position);
                assert!(day.title.starts_with(&format!("Day {}", position + 1)));
            }
        }
    }

    #[test]
    fn test_missing_or_malformed_source_is_all_filler() {
        for source in [None, Some(json!({ "days": 3 })), Some(json!("Day 1: Paris"))] {
            let days = reconcile_days(2, source.as_ref(), "Paris", &filler());
            assert_eq!(days.len(), 2);
            assert_eq!(days[0].title, "Day 1: Highlights in Paris");
            assert_eq!(days[1].title, "Day 2: Highlights in Paris");
        }
    }

    #[test]
    fn test_items_alias_takes_priority_over_bullets() {
        let source = json!([{ "items": ["first"], "bullets": ["second"] }]);
        let days = reconcile_days(1, Some(&source), "Nice", &filler());
        assert_eq!(days[0].activities, vec!["first".to_string()]);

        let source = json!([{ "items": "not a list", "bullets": ["second"] }]);
        let days = reconcile_days(1, Some(&source), "Nice", &filler());
        assert_eq!(days[0].activities, vec!["second".to_string()]);
    }

    #[test]
    fn test_untitled_day_uses_its_location() {
        let source = json!([{ "location": "Nara", "items": [] }, 42]);

        let days = reconcile_days(2, Some(&source), "Kyoto", &filler());

        assert_eq!(days[0].title, "Day 1 — Nara");
        assert_eq!(days[0].location, "Nara");
        assert_eq!(days[1].title, "Day 2 — Kyoto");
        assert!(days[1].activities.is_empty());
    }

    #[test]
    fn test_non_text_activities_are_kept_as_text_or_dropped() {
        let source = json!([{ "items": ["walk", 3, null, { "a": 1 }, true] }]);
        let days = reconcile_days(1, Some(&source), "Bern", &filler());
        assert_eq!(days[0].activities, vec!["walk", "3", "true"]);
    }
}
