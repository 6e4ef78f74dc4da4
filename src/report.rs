use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::critical::CriticalIssue;
use crate::dashboard::{location_name, DashboardStats};
use crate::directory::Directory;
use crate::feed::{FeedEntry, FeedItem};
use crate::i18n::{t, Language};
use crate::score::ScoreCalculator;
use crate::trend::TrendPoint;

/// Everything the dashboard shows, in one serializable bundle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView<'a> {
    pub generated_for: NaiveDate,
    pub language: Language,
    pub stats: DashboardStats,
    pub trend: Vec<TrendPoint>,
    pub activity_feed: Vec<FeedEntry<'a>>,
}

pub fn compliance_band(score: f64) -> &'static str {
    if score >= 85.0 {
        "good"
    } else if score >= 70.0 {
        "fair"
    } else {
        "poor"
    }
}

fn first_name(name: &str) -> &str {
    name.split(' ').next().unwrap_or(name)
}

pub fn feed_line<D: Directory + ?Sized>(
    entry: &FeedEntry<'_>,
    calculator: &ScoreCalculator<'_, D>,
    language: Language,
) -> String {
    let directory = calculator.directory();
    let time = entry
        .timestamp
        .map(|timestamp| timestamp.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string());

    match entry.item {
        FeedItem::Report(report) => {
            let score = calculator.score(report);
            let inspector = directory
                .inspector_by_id(report.inspector_id)
                .map(|user| user.name.as_str())
                .unwrap_or("Unknown inspector");
            let location = location_name(directory, report.location_id, language);
            if calculator.is_critical(report) {
                format!(
                    "[critical] {inspector} flagged {location} ({score:.0}%). Inspection Report • {time} ([view](/report/{}))",
                    report.id
                )
            } else {
                format!(
                    "{inspector} inspected {location} with score {score:.0}%. Inspection Report • {time} ([view](/report/{}))",
                    report.id
                )
            }
        }
        FeedItem::Cdr(cdr) => {
            let employee = directory
                .inspector_by_id(cdr.employee_id)
                .map(|user| user.name.as_str())
                .unwrap_or("Unknown employee");
            let location = location_name(directory, cdr.location_id, language);
            format!(
                "New CDR: {} at {location} by {employee} ({}) • {time} ([view](/cdr/{}))",
                cdr.incident_type, cdr.status, cdr.id
            )
        }
    }
}

pub fn build_dashboard<D: Directory + ?Sized>(
    view: &DashboardView<'_>,
    calculator: &ScoreCalculator<'_, D>,
) -> String {
    let language = view.language;
    let stats = &view.stats;
    let mut output = String::new();

    let _ = writeln!(output, "# {}", t(language, "dashboard"));
    let _ = writeln!(output, "Generated for {}", view.generated_for);
    let _ = writeln!(output);

    if !stats.critical_panel.is_empty() {
        let _ = writeln!(
            output,
            "## {} - Action Required ({})",
            t(language, "criticalIssues"),
            stats.critical_total
        );
        for issue in &stats.critical_panel {
            let _ = writeln!(
                output,
                "- {} at {} on {}: {:.0}%, {} failed items detected. ([view](/report/{}))",
                issue.inspector_name,
                issue.location_name,
                issue.date,
                issue.score,
                issue.failed_items,
                issue.report_id
            );
        }
        if stats.critical_total > stats.critical_panel.len() {
            let _ = writeln!(
                output,
                "- [View all {} critical issues](/critical-issues)",
                stats.critical_total
            );
        }
        let _ = writeln!(output);
    }

    let arrow = if stats.compliance_trend >= 0.0 { "▲" } else { "▼" };
    let _ = writeln!(output, "## KPIs");
    let _ = writeln!(
        output,
        "- {}: {:.1}% ({}) {} {:.1}% {}",
        t(language, "overallCompliance"),
        stats.overall_compliance,
        compliance_band(stats.overall_compliance),
        arrow,
        stats.compliance_trend,
        t(language, "vsLastMonth")
    );
    let _ = writeln!(
        output,
        "- {}: {}",
        t(language, "totalInspections"),
        stats.total_inspections
    );
    let _ = writeln!(
        output,
        "- {}: {}",
        t(language, "criticalIssues"),
        stats.critical_issues
    );
    let _ = writeln!(output, "- {}: {}", t(language, "pendingCdrs"), stats.pending_cdrs);
    match &stats.top_inspector {
        Some(top) => {
            let _ = writeln!(
                output,
                "- {}: {} (leading: {} reports)",
                t(language, "topInspector"),
                first_name(&top.name),
                top.month_reports
            );
        }
        None => {
            let _ = writeln!(output, "- {}: N/A (No data)", t(language, "topInspector"));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", t(language, "performanceTrend"));
    output.push_str(&build_trend(&view.trend));

    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", t(language, "insights"));
    for insight in &stats.insights {
        let _ = writeln!(output, "- {insight}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", t(language, "inspectorActivity"));
    if stats.inspector_activity.is_empty() {
        let _ = writeln!(output, "No inspectors on record.");
    } else {
        let _ = writeln!(output, "| Inspector | Total | This Month | Avg Score | Last Active |");
        let _ = writeln!(output, "|---|---|---|---|---|");
        for activity in &stats.inspector_activity {
            let last_active = activity
                .last_active
                .map(|date| date.to_string())
                .unwrap_or_else(|| "Never".to_string());
            let _ = writeln!(
                output,
                "| {} | {} | {} | {:.1}% | {} |",
                activity.name,
                activity.total_reports,
                activity.month_reports,
                activity.avg_score,
                last_active
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## {} (LIVE)", t(language, "liveActivityFeed"));
    if view.activity_feed.is_empty() {
        let _ = writeln!(output, "No recent activity.");
    } else {
        for entry in &view.activity_feed {
            let _ = writeln!(output, "- {}", feed_line(entry, calculator, language));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", t(language, "lowPerformingAreas"));
    if stats.low_performing_areas.is_empty() {
        let _ = writeln!(output, "All areas are performing well.");
    } else {
        for area in &stats.low_performing_areas {
            let _ = writeln!(
                output,
                "- {} ({}): {:.1}%",
                area.location_name,
                area.zone_name.as_deref().unwrap_or("N/A"),
                area.avg_score
            );
        }
    }

    output
}

pub fn build_trend(points: &[TrendPoint]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "| Date | Score | Predicted |");
    let _ = writeln!(output, "|---|---|---|");
    for point in points {
        let score = point
            .score
            .map(|score| format!("{score:.1}%"))
            .unwrap_or_else(|| "-".to_string());
        let predicted = point
            .predicted
            .map(|value| format!("{value:.1}%"))
            .unwrap_or_default();
        let _ = writeln!(output, "| {} | {} | {} |", point.label, score, predicted);
    }
    output
}

pub fn build_critical_page(issues: &[CriticalIssue], language: Language) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "[← {}](/dashboard)", t(language, "dashboard"));
    let _ = writeln!(output);
    let _ = writeln!(output, "# {}", t(language, "criticalIssuesList"));
    let _ = writeln!(
        output,
        "{} {}",
        issues.len(),
        t(language, "requiresImmediateAction")
    );
    let _ = writeln!(output);

    if issues.is_empty() {
        let _ = writeln!(output, "No critical issues found.");
        return output;
    }

    let _ = writeln!(output, "| Date | Location | Inspector | Score | Failed Items | |");
    let _ = writeln!(output, "|---|---|---|---|---|---|");
    for issue in issues {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {:.0}% | {} | [view](/report/{}) |",
            issue.date,
            issue.location_name,
            issue.inspector_name,
            issue.score,
            issue.failed_items,
            issue.report_id
        );
    }
    output
}
