use std::cmp::Ordering;
use std::io;

use anyhow::Context;
use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::calendar;
use crate::dashboard::location_name;
use crate::directory::Directory;
use crate::i18n::Language;
use crate::score::{self, ScoreCalculator};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalIssue {
    pub report_id: Uuid,
    pub date: String,
    pub location_id: Uuid,
    pub location_name: String,
    pub inspector_id: Uuid,
    pub inspector_name: String,
    pub score: f64,
    pub failed_items: usize,
}

/// Newest first; unparseable dates go last.
pub fn compare_newest_first(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Every critical report, newest first, untruncated.
pub fn critical_issues<D: Directory + ?Sized>(
    calculator: &ScoreCalculator<'_, D>,
    language: Language,
) -> Vec<CriticalIssue> {
    let directory = calculator.directory();
    let mut rows: Vec<(Option<NaiveDateTime>, CriticalIssue)> = directory
        .reports()
        .iter()
        .filter(|report| calculator.is_critical(report))
        .map(|report| {
            let issue = CriticalIssue {
                report_id: report.id,
                date: report.date.clone(),
                location_id: report.location_id,
                location_name: location_name(directory, report.location_id, language),
                inspector_id: report.inspector_id,
                inspector_name: directory
                    .inspector_by_id(report.inspector_id)
                    .map(|user| user.name.clone())
                    .unwrap_or_default(),
                score: calculator.score(report),
                failed_items: score::failed_items(report),
            };
            (calendar::parse_instant(&report.date), issue)
        })
        .collect();

    rows.sort_by(|(a, _), (b, _)| compare_newest_first(*a, *b));
    rows.into_iter().map(|(_, issue)| issue).collect()
}

pub fn write_csv<W: io::Write>(writer: W, issues: &[CriticalIssue]) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for issue in issues {
        csv.serialize(issue)
            .with_context(|| format!("failed to write critical issue {}", issue.report_id))?;
    }
    csv.flush().context("failed to flush critical issues csv")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReportItem, ReportStatus};
    use crate::score::fixtures::Fixture;

    #[test]
    fn lists_critical_reports_newest_first() {
        let mut fixture = Fixture::new();
        let location = fixture.location("Main Lobby");
        let inspector = fixture.inspector("Avery Lee");
        fixture.report(location, inspector, "2026-08-01", 50.0, ReportStatus::Submitted);
        fixture.report(location, inspector, "garbled", 10.0, ReportStatus::Submitted);
        fixture.report(location, inspector, "2026-10-01", 70.0, ReportStatus::Approved);
        fixture.report(location, inspector, "2026-09-01", 90.0, ReportStatus::Submitted);
        fixture.report(location, inspector, "2026-09-15", 30.0, ReportStatus::Draft);

        let calculator = ScoreCalculator::new(&fixture.snapshot);
        let issues = critical_issues(&calculator, Language::En);
        let dates: Vec<&str> = issues.iter().map(|issue| issue.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-10-01", "2026-08-01", "garbled"]);
        assert_eq!(issues[0].location_name, "Main Lobby");
        assert_eq!(issues[0].inspector_name, "Avery Lee");
    }

    #[test]
    fn offset_dates_sort_by_instant() {
        let mut fixture = Fixture::new();
        let location = fixture.location("Main Lobby");
        let inspector = fixture.inspector("Avery Lee");
        fixture.report(location, inspector, "2026-10-02T10:00:00+04:00", 50.0, ReportStatus::Submitted);
        fixture.report(location, inspector, "2026-10-02T08:00:00Z", 50.0, ReportStatus::Submitted);

        let calculator = ScoreCalculator::new(&fixture.snapshot);
        let issues = critical_issues(&calculator, Language::En);
        assert_eq!(issues[0].date, "2026-10-02T08:00:00Z");
        assert_eq!(issues[1].date, "2026-10-02T10:00:00+04:00");
    }

    #[test]
    fn list_is_not_truncated() {
        let mut fixture = Fixture::new();
        let location = fixture.location("Main Lobby");
        let inspector = fixture.inspector("Avery Lee");
        for day in 1..=28 {
            fixture.report(
                location,
                inspector,
                &format!("2026-02-{day:02}"),
                20.0,
                ReportStatus::Submitted,
            );
        }

        let calculator = ScoreCalculator::new(&fixture.snapshot);
        assert_eq!(critical_issues(&calculator, Language::En).len(), 28);
    }

    #[test]
    fn exposes_failed_item_count() {
        let mut fixture = Fixture::new();
        let location = fixture.location("Main Lobby");
        let inspector = fixture.inspector("Avery Lee");
        fixture.report(location, inspector, "2026-10-01", 0.0, ReportStatus::Submitted);
        fixture.snapshot.reports[0].items = vec![
            ReportItem { score: 10.0 },
            ReportItem { score: 1.0 },
            ReportItem { score: 2.0 },
        ];

        let calculator = ScoreCalculator::new(&fixture.snapshot);
        let issues = critical_issues(&calculator, Language::En);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].failed_items, 2);
        assert!((issues[0].score - 13.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_inspector_has_blank_name() {
        let mut fixture = Fixture::new();
        let location = fixture.location("Main Lobby");
        fixture.report(location, Uuid::new_v4(), "2026-10-01", 10.0, ReportStatus::Submitted);

        let calculator = ScoreCalculator::new(&fixture.snapshot);
        assert_eq!(critical_issues(&calculator, Language::En)[0].inspector_name, "");
    }

    #[test]
    fn writes_csv_with_header() {
        let mut fixture = Fixture::new();
        let location = fixture.location("Main Lobby");
        let inspector = fixture.inspector("Avery Lee");
        fixture.report(location, inspector, "2026-10-01", 50.0, ReportStatus::Submitted);

        let calculator = ScoreCalculator::new(&fixture.snapshot);
        let issues = critical_issues(&calculator, Language::En);
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &issues).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("reportId,date,locationId,locationName,inspectorId,inspectorName,score,failedItems")
        );
        let row = lines.next().unwrap();
        assert!(row.contains("Main Lobby"));
        assert!(row.contains("Avery Lee"));
        assert!(lines.next().is_none());
    }
}
