use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::calendar::{self, MonthWindow};
use crate::critical::{self, CriticalIssue};
use crate::directory::Directory;
use crate::i18n::Language;
use crate::models::{CdrStatus, Report};
use crate::score::{ScoreCalculator, LOW_PERFORMANCE_THRESHOLD};

pub const LOW_PERFORMING_LIMIT: usize = 5;
pub const CRITICAL_PANEL_SIZE: usize = 3;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectorActivity {
    pub inspector_id: Uuid,
    pub name: String,
    pub total_reports: usize,
    pub month_reports: usize,
    pub avg_score: f64,
    pub last_active: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowPerformingLocation {
    pub location_id: Uuid,
    pub location_name: String,
    pub zone_name: Option<String>,
    pub avg_score: f64,
    pub report_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub overall_compliance: f64,
    pub prev_month_compliance: f64,
    pub compliance_trend: f64,
    pub total_inspections: usize,
    pub critical_issues: usize,
    pub critical_total: usize,
    pub pending_cdrs: usize,
    pub top_inspector: Option<InspectorActivity>,
    pub inspector_activity: Vec<InspectorActivity>,
    pub low_performing_areas: Vec<LowPerformingLocation>,
    pub critical_panel: Vec<CriticalIssue>,
    pub insights: [String; 2],
}

/// Non-draft reports with a parseable date, paired with that date.
fn dated_reports<'r>(reports: &'r [Report]) -> Vec<(&'r Report, NaiveDate)> {
    reports
        .iter()
        .filter(|report| !report.is_draft())
        .filter_map(|report| match calendar::parse_date(&report.date) {
            Some(date) => Some((report, date)),
            None => {
                log::debug!("report {} has unparseable date {:?}", report.id, report.date);
                None
            }
        })
        .collect()
}

pub fn aggregate<D: Directory + ?Sized>(
    calculator: &ScoreCalculator<'_, D>,
    today: NaiveDate,
    language: Language,
) -> DashboardStats {
    let directory = calculator.directory();
    let window = MonthWindow::for_today(today);
    let dated = dated_reports(directory.reports());

    let this_month: Vec<&Report> = dated
        .iter()
        .filter(|(_, date)| window.is_this_month(*date))
        .map(|(report, _)| *report)
        .collect();
    let last_month: Vec<&Report> = dated
        .iter()
        .filter(|(_, date)| window.is_last_month(*date))
        .map(|(report, _)| *report)
        .collect();

    let overall_compliance = calculator.average(this_month.iter().copied());
    let prev_month_compliance = calculator.average(last_month.iter().copied());
    let critical_issues = this_month
        .iter()
        .filter(|report| calculator.is_critical(report))
        .count();

    let pending_cdrs = directory
        .cdrs()
        .iter()
        .filter(|cdr| cdr.status == CdrStatus::Submitted)
        .count();

    let inspector_activity = rank_inspectors(calculator, &window);
    let top_inspector = inspector_activity
        .first()
        .filter(|activity| activity.month_reports > 0)
        .cloned();

    let low_performing_areas = low_performing_locations(calculator, language);
    let insights = [
        location_insight(low_performing_areas.first()),
        inspector_insight(top_inspector.as_ref()),
    ];

    let critical_list = critical::critical_issues(calculator, language);
    let critical_total = critical_list.len();
    let critical_panel = critical_list.into_iter().take(CRITICAL_PANEL_SIZE).collect();

    DashboardStats {
        overall_compliance,
        prev_month_compliance,
        compliance_trend: overall_compliance - prev_month_compliance,
        total_inspections: this_month.len(),
        critical_issues,
        critical_total,
        pending_cdrs,
        top_inspector,
        inspector_activity,
        low_performing_areas,
        critical_panel,
        insights,
    }
}

/// Busiest inspectors this month first, ties broken by all-time volume.
///
/// All-time totals cover every finalized report; undated reports only miss
/// the monthly count and the last-active date.
pub fn rank_inspectors<D: Directory + ?Sized>(
    calculator: &ScoreCalculator<'_, D>,
    window: &MonthWindow,
) -> Vec<InspectorActivity> {
    let directory = calculator.directory();
    let mut activity: Vec<InspectorActivity> = directory
        .inspectors()
        .into_iter()
        .map(|inspector| {
            let own: Vec<&Report> = directory
                .reports()
                .iter()
                .filter(|report| !report.is_draft() && report.inspector_id == inspector.id)
                .collect();
            let dates: Vec<NaiveDate> = own
                .iter()
                .filter_map(|report| calendar::parse_date(&report.date))
                .collect();
            InspectorActivity {
                inspector_id: inspector.id,
                name: inspector.name.clone(),
                total_reports: own.len(),
                month_reports: dates
                    .iter()
                    .filter(|date| window.is_this_month(**date))
                    .count(),
                avg_score: calculator.average(own.iter().copied()),
                last_active: dates.iter().max().copied(),
            }
        })
        .collect();

    activity.sort_by(|a, b| {
        b.month_reports
            .cmp(&a.month_reports)
            .then_with(|| b.total_reports.cmp(&a.total_reports))
    });
    activity
}

/// Lowest averaging locations under the low-performance threshold.
pub fn low_performing_locations<D: Directory + ?Sized>(
    calculator: &ScoreCalculator<'_, D>,
    language: Language,
) -> Vec<LowPerformingLocation> {
    let directory = calculator.directory();
    // Insertion order keeps ties in first-seen order.
    let mut groups: Vec<(Uuid, f64, usize)> = Vec::new();

    for report in directory.reports().iter().filter(|report| !report.is_draft()) {
        let score = calculator.score(report);
        match groups.iter_mut().find(|(id, _, _)| *id == report.location_id) {
            Some(entry) => {
                entry.1 += score;
                entry.2 += 1;
            }
            None => groups.push((report.location_id, score, 1)),
        }
    }

    let mut areas: Vec<LowPerformingLocation> = groups
        .into_iter()
        .map(|(location_id, total, count)| LowPerformingLocation {
            location_id,
            location_name: location_name(directory, location_id, language),
            zone_name: directory
                .zone_by_location_id(location_id)
                .and_then(|zone| zone.name.get(language))
                .map(str::to_string),
            avg_score: total / count as f64,
            report_count: count,
        })
        .filter(|area| area.avg_score < LOW_PERFORMANCE_THRESHOLD)
        .collect();

    areas.sort_by(|a, b| a.avg_score.total_cmp(&b.avg_score));
    areas.truncate(LOW_PERFORMING_LIMIT);
    areas
}

pub fn location_name<D: Directory + ?Sized>(
    directory: &D,
    location_id: Uuid,
    language: Language,
) -> String {
    directory
        .location_by_id(location_id)
        .and_then(|location| location.name.get(language))
        .unwrap_or("N/A")
        .to_string()
}

pub fn location_insight(lowest: Option<&LowPerformingLocation>) -> String {
    match lowest {
        Some(area) => format!(
            "**{}** recorded {} low scores this week. Follow-up inspection recommended.",
            area.location_name, area.report_count
        ),
        None => "All areas are performing well.".to_string(),
    }
}

pub fn inspector_insight(top: Option<&InspectorActivity>) -> String {
    match top {
        Some(inspector) => format!(
            "**{}** is leading this month with {} inspections.",
            inspector.name, inspector.month_reports
        ),
        None => "Not enough data to rank inspectors.".to_string(),
    }
}
