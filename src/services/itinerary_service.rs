use crate::config::PlannerPolicy;
use crate::models::generation::GenerationOutput;
use crate::models::itinerary::Itinerary;
use crate::models::plan_request::{PlanRequest, PlanRequestError};
use crate::services::budget_service::{resolve_budget, tier_from_amount};
use crate::services::day_service::reconcile_days;
use crate::services::markup_service::MarkupSource;
use crate::services::title_service::{compose_title, TitleParts};
use chrono::Duration;
use log::{info, warn};
use serde_json::Value;

/// Turns whatever the generation service returned into a complete itinerary.
///
/// Only the request can make this fail; any payload shape is accepted and
/// gaps are filled from `policy`.
pub fn build_itinerary(
    request: &PlanRequest,
    output: &GenerationOutput,
    policy: &PlannerPolicy,
) -> Result<Itinerary, PlanRequestError> {
    let destination = request.resolved_destination()?;
    let days_count = request.resolved_days(policy)?;
    let payload = output.payload();

    let source_days = payload.and_then(|p| p.get("days"));
    let supplied = source_days.and_then(Value::as_array).map_or(0, Vec::len);
    if supplied < days_count {
        warn!(
            "Generated plan for {} has {} of {} days, padding with filler",
            destination, supplied, days_count
        );
    }

    let mut days = reconcile_days(days_count, source_days, &destination, &policy.filler);
    if let Some(start) = request.start_date {
        for day in days.iter_mut() {
            // Dates past the calendar's end stay unset
            day.date = i64::try_from(day.index)
                .ok()
                .and_then(|offset| start.checked_add_signed(Duration::days(offset)));
        }
        if days.iter().any(|day| day.date.is_none()) {
            warn!("Start date {} leaves some days of the trip undated", start);
        }
    }

    let budget = resolve_budget(payload.and_then(|p| p.get("budget")));

    let budget_tier = match request.budget_level() {
        Some(level) => level.to_string(),
        None => tier_from_amount(request.budget_usd, &policy.tier_thresholds)
            .label()
            .to_string(),
    };

    let trip_title = compose_title(
        &TitleParts {
            supplied_title: payload.and_then(|p| p.get("title")).and_then(Value::as_str),
            destination: Some(destination.as_str()),
            day_count: days_count,
            styles: &request.style,
            budget_tier: Some(budget_tier.as_str()),
            pace: request.pace(),
            budget_usd: request.budget_usd,
        },
        &request.currency_format(),
    );

    info!("Built itinerary \"{}\" with {} days", trip_title, days.len());

    Ok(Itinerary {
        trip_title,
        days,
        budget: Some(budget),
        travelers: request.travelers,
        days_count,
        budget_tier,
        budget_usd: request.budget_usd,
        raw_text: output.text().map(str::to_string),
    })
}

/// Raw text is rendered as-is when present since its days were never parsed.
pub fn markup_source(itinerary: &Itinerary) -> MarkupSource<'_> {
    match itinerary.raw_text.as_deref() {
        Some(text) if !text.trim().is_empty() => MarkupSource::Text {
            title: Some(itinerary.trip_title.as_str()),
            body: text,
        },
        _ => MarkupSource::Structured {
            trip_title: &itinerary.trip_title,
            days: &itinerary.days,
            budget: itinerary.budget.as_ref(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::budget_service::default_budget;
    use chrono::NaiveDate;
    use serde_json::json;

    fn kyoto_request() -> PlanRequest {
        PlanRequest {
            destination: Some("Kyoto".to_string()),
            days: Some(3),
            travelers: Some(2),
            style: vec!["Food".to_string()],
            budget_usd: Some(2500.0),
            pace: Some("Relaxed".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_start_date_at_calendar_end_does_not_overflow() {
        let request = PlanRequest {
            start_date: Some(NaiveDate::MAX),
            days: Some(5),
            ..kyoto_request()
        };
        let output = GenerationOutput::Structured(json!({}));

        let itinerary = build_itinerary(&request, &output, &PlannerPolicy::default()).unwrap();

        assert_eq!(itinerary.days.len(), 5);
        assert_eq!(itinerary.days[0].date, Some(NaiveDate::MAX));
        assert!(itinerary.days[1..].iter().all(|day| day.date.is_none()));
    }

    #[test]
    fn test_structured_payload_is_normalized_and_padded() {
        let output = GenerationOutput::Structured(json!({
            "days": [{ "title": "Day 1 Arrival", "items": ["check in"] }]
        }));

        let itinerary =
            build_itinerary(&kyoto_request(), &output, &PlannerPolicy::default()).unwrap();

        assert_eq!(itinerary.days.len(), 3);
        assert_eq!(itinerary.days[0].title, "Day 1: Arrival");
        assert_eq!(itinerary.days[1].title, "Day 2: Highlights in Kyoto");
        assert_eq!(itinerary.days[2].title, "Day 3: Highlights in Kyoto");
        assert_eq!(itinerary.budget, Some(default_budget()));
        assert_eq!(itinerary.budget_tier, "Mid-range");
        assert_eq!(
            itinerary.trip_title,
            "Kyoto — 3 days — Food — Mid-range — Relaxed — ~$2,500"
        );
        assert_eq!(itinerary.travelers, Some(2));
        assert!(itinerary.raw_text.is_none());
    }

    #[test]
    fn test_supplied_title_and_level_are_kept() {
        let mut request = kyoto_request();
        request.budget_level = Some("Luxury".to_string());
        let output = GenerationOutput::Structured(json!({ "title": "Slow Kyoto" }));

        let itinerary = build_itinerary(&request, &output, &PlannerPolicy::default()).unwrap();

        assert_eq!(itinerary.trip_title, "Slow Kyoto");
        assert_eq!(itinerary.budget_tier, "Luxury");
    }

    #[test]
    fn test_raw_text_output_still_yields_full_itinerary() {
        let mut request = kyoto_request();
        request.days = None;
        let output = GenerationOutput::Text("Day 1: Temples\n- Kiyomizu".to_string());

        let itinerary = build_itinerary(&request, &output, &PlannerPolicy::default()).unwrap();

        assert_eq!(itinerary.days_count, 5);
        assert_eq!(itinerary.days.len(), 5);
        assert_eq!(itinerary.raw_text.as_deref(), Some("Day 1: Temples\n- Kiyomizu"));
        assert!(matches!(markup_source(&itinerary), MarkupSource::Text { .. }));
    }

    #[test]
    fn test_start_date_assigns_consecutive_dates() {
        let mut request = kyoto_request();
        request.start_date = NaiveDate::from_ymd_opt(2026, 12, 30);
        let output = GenerationOutput::Structured(json!({}));

        let itinerary = build_itinerary(&request, &output, &PlannerPolicy::default()).unwrap();

        let dates: Vec<NaiveDate> = itinerary.days.iter().filter_map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 12, 30).unwrap(),
                NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
                NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn test_invalid_request_is_rejected() {
        let request = PlanRequest::default();
        let output = GenerationOutput::Structured(json!({}));
        assert_eq!(
            build_itinerary(&request, &output, &PlannerPolicy::default()),
            Err(PlanRequestError::MissingDestination)
        );
    }
}
