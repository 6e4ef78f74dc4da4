use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::Serialize;

use crate::calendar;
use crate::directory::Directory;
use crate::score::ScoreCalculator;

pub const TREND_DAYS: usize = 30;
pub const FORECAST_POINTS: usize = 7;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub label: String,
    pub date: NaiveDate,
    pub score: Option<f64>,
    pub report_count: usize,
    pub predicted: Option<f64>,
}

/// Cosmetic forecast: `base` nudged by a random factor in roughly [-2.25%, +2.75%).
/// Not a model of anything.
pub fn placeholder_forecast<R: Rng>(base: f64, rng: &mut R) -> f64 {
    let noise: f64 = rng.gen();
    base * (1.0 + (noise - 0.45) * 0.05)
}

/// Daily averages for the thirty days ending `today`, matched by short label.
///
/// Reports are bucketed by their `Mon D` label, so a report from the same
/// day of an earlier year lands in the same bucket. Days without reports
/// have no score. The trailing points carry a placeholder forecast seeded from
/// the latest daily average, or `fallback` when no day has data.
pub fn trend_series<D: Directory + ?Sized, R: Rng>(
    calculator: &ScoreCalculator<'_, D>,
    today: NaiveDate,
    fallback: f64,
    rng: &mut R,
) -> Vec<TrendPoint> {
    let mut buckets: Vec<(String, NaiveDate, f64, usize)> = Vec::with_capacity(TREND_DAYS);
    for offset in (0..TREND_DAYS as i64).rev() {
        let date = today - Duration::days(offset);
        let label = calendar::chart_label(date);
        if !buckets.iter().any(|(existing, ..)| *existing == label) {
            buckets.push((label, date, 0.0, 0));
        }
    }

    for report in calculator
        .directory()
        .reports()
        .iter()
        .filter(|report| !report.is_draft())
    {
        let Some(date) = calendar::parse_date(&report.date) else {
            continue;
        };
        let label = calendar::chart_label(date);
        if let Some(bucket) = buckets.iter_mut().find(|(existing, ..)| *existing == label) {
            bucket.2 += calculator.score(report);
            bucket.3 += 1;
        }
    }

    let mut points: Vec<TrendPoint> = buckets
        .into_iter()
        .map(|(label, date, total, count)| TrendPoint {
            label,
            date,
            score: (count > 0).then(|| total / count as f64),
            report_count: count,
            predicted: None,
        })
        .collect();

    let base = points
        .iter()
        .rev()
        .find_map(|point| point.score)
        .filter(|score| *score != 0.0)
        .unwrap_or(fallback);
    let forecast_start = points.len().saturating_sub(FORECAST_POINTS);
    for point in points.iter_mut().skip(forecast_start) {
        point.predicted = Some(placeholder_forecast(base, rng));
    }

    points
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::models::ReportStatus;
    use crate::score::fixtures::{ymd, Fixture};

    fn series(fixture: &Fixture, today: NaiveDate, fallback: f64) -> Vec<TrendPoint> {
        let calculator = ScoreCalculator::new(&fixture.snapshot);
        let mut rng = StdRng::seed_from_u64(7);
        trend_series(&calculator, today, fallback, &mut rng)
    }

    #[test]
    fn produces_thirty_points_ending_today() {
        let fixture = Fixture::new();
        let points = series(&fixture, ymd(2026, 10, 19), 0.0);
        assert_eq!(points.len(), TREND_DAYS);
        assert_eq!(points[0].date, ymd(2026, 9, 20));
        assert_eq!(points[0].label, "Sep 20");
        assert_eq!(points[TREND_DAYS - 1].label, "Oct 19");
        assert!(points.iter().all(|point| point.score.is_none()));
    }

    #[test]
    fn averages_reports_per_day() {
        let mut fixture = Fixture::new();
        let location = fixture.location("Main Lobby");
        let inspector = fixture.inspector("Avery Lee");
        fixture.report(location, inspector, "2026-10-10", 80.0, ReportStatus::Submitted);
        fixture.report(location, inspector, "2026-10-10T16:45", 60.0, ReportStatus::Submitted);
        fixture.report(location, inspector, "2026-10-11", 10.0, ReportStatus::Draft);
        fixture.report(location, inspector, "2026-08-01", 10.0, ReportStatus::Submitted);

        let points = series(&fixture, ymd(2026, 10, 19), 0.0);
        let oct_10 = points.iter().find(|point| point.label == "Oct 10").unwrap();
        assert_eq!(oct_10.report_count, 2);
        assert!((oct_10.score.unwrap() - 70.0).abs() < 1e-9);
        let oct_11 = points.iter().find(|point| point.label == "Oct 11").unwrap();
        assert!(oct_11.score.is_none());
    }

    #[test]
    fn same_day_of_previous_year_shares_bucket() {
        let mut fixture = Fixture::new();
        let location = fixture.location("Main Lobby");
        let inspector = fixture.inspector("Avery Lee");
        fixture.report(location, inspector, "2025-10-15", 50.0, ReportStatus::Submitted);

        let points = series(&fixture, ymd(2026, 10, 19), 0.0);
        let oct_15 = points.iter().find(|point| point.label == "Oct 15").unwrap();
        assert_eq!(oct_15.report_count, 1);
    }

    #[test]
    fn forecast_covers_trailing_week_only() {
        let mut fixture = Fixture::new();
        let location = fixture.location("Main Lobby");
        let inspector = fixture.inspector("Avery Lee");
        fixture.report(location, inspector, "2026-10-01", 80.0, ReportStatus::Submitted);

        let points = series(&fixture, ymd(2026, 10, 19), 50.0);
        let forecast: Vec<f64> = points.iter().filter_map(|point| point.predicted).collect();
        assert_eq!(forecast.len(), FORECAST_POINTS);
        assert!(points[..TREND_DAYS - FORECAST_POINTS]
            .iter()
            .all(|point| point.predicted.is_none()));
        for value in forecast {
            assert!(value >= 80.0 * (1.0 - 0.45 * 0.05) - 1e-9);
            assert!(value < 80.0 * (1.0 + 0.55 * 0.05));
        }
    }

    #[test]
    fn forecast_falls_back_without_data() {
        let fixture = Fixture::new();
        let points = series(&fixture, ymd(2026, 10, 19), 90.0);
        for point in points.iter().skip(TREND_DAYS - FORECAST_POINTS) {
            let value = point.predicted.unwrap();
            assert!(value > 85.0 && value < 95.0);
        }
    }

    #[test]
    fn placeholder_forecast_stays_near_base() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let value = placeholder_forecast(100.0, &mut rng);
            assert!((97.75..102.75).contains(&value));
        }
    }
}
