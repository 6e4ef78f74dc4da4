//! Read-only loader for the inspection store in Postgres.
//!
//! Tables live in the `inspection` schema. Report and CDR dates are kept as
//! text so that malformed values reach the aggregation untouched.

use std::collections::HashMap;

use anyhow::Context;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::directory::Snapshot;
use crate::models::{
    Cdr, CdrStatus, Form, FormItem, LocalizedText, Location, Report, ReportItem, ReportStatus,
    User, UserRole, Zone,
};

pub async fn load_snapshot(pool: &PgPool) -> anyhow::Result<Snapshot> {
    let snapshot = Snapshot {
        reports: fetch_reports(pool).await.context("failed to load reports")?,
        cdrs: fetch_cdrs(pool).await.context("failed to load cdrs")?,
        locations: fetch_locations(pool).await.context("failed to load locations")?,
        forms: fetch_forms(pool).await.context("failed to load forms")?,
        zones: fetch_zones(pool).await.context("failed to load zones")?,
        users: fetch_users(pool).await.context("failed to load users")?,
    };
    log::info!(
        "loaded {} reports and {} cdrs from postgres",
        snapshot.reports.len(),
        snapshot.cdrs.len()
    );
    Ok(snapshot)
}

async fn fetch_names(pool: &PgPool, table: &str, key: &str) -> anyhow::Result<HashMap<Uuid, LocalizedText>> {
    let query = format!("SELECT {key} AS owner_id, language, name FROM inspection.{table}");
    let rows = sqlx::query(&query).fetch_all(pool).await?;
    let mut names: HashMap<Uuid, LocalizedText> = HashMap::new();

    for row in rows {
        let owner_id: Uuid = row.get("owner_id");
        names
            .entry(owner_id)
            .or_default()
            .0
            .insert(row.get("language"), row.get("name"));
    }

    Ok(names)
}

async fn fetch_locations(pool: &PgPool) -> anyhow::Result<Vec<Location>> {
    let mut names = fetch_names(pool, "location_names", "location_id").await?;
    let rows = sqlx::query("SELECT id, zone_id, form_id FROM inspection.locations ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let id: Uuid = row.get("id");
            Location {
                id,
                name: names.remove(&id).unwrap_or_default(),
                zone_id: row.get("zone_id"),
                form_id: row.get("form_id"),
            }
        })
        .collect())
}

async fn fetch_zones(pool: &PgPool) -> anyhow::Result<Vec<Zone>> {
    let mut names = fetch_names(pool, "zone_names", "zone_id").await?;
    let rows = sqlx::query("SELECT id FROM inspection.zones ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let id: Uuid = row.get("id");
            Zone {
                id,
                name: names.remove(&id).unwrap_or_default(),
            }
        })
        .collect())
}

async fn fetch_forms(pool: &PgPool) -> anyhow::Result<Vec<Form>> {
    let item_rows = sqlx::query(
        "SELECT form_id, label, max_score FROM inspection.form_items ORDER BY form_id, position",
    )
    .fetch_all(pool)
    .await?;
    let mut items: HashMap<Uuid, Vec<FormItem>> = HashMap::new();
    for row in item_rows {
        items.entry(row.get("form_id")).or_default().push(FormItem {
            label: row.get("label"),
            max_score: row.get("max_score"),
        });
    }

    let rows = sqlx::query("SELECT id, name FROM inspection.forms ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let id: Uuid = row.get("id");
            Form {
                id,
                name: row.get("name"),
                items: items.remove(&id).unwrap_or_default(),
            }
        })
        .collect())
}

async fn fetch_users(pool: &PgPool) -> anyhow::Result<Vec<User>> {
    let rows = sqlx::query("SELECT id, full_name, role FROM inspection.users ORDER BY full_name")
        .fetch_all(pool)
        .await?;
    let mut users = Vec::with_capacity(rows.len());

    for row in rows {
        let role: String = row.get("role");
        users.push(User {
            id: row.get("id"),
            name: row.get("full_name"),
            role: parse_role(&role)?,
        });
    }

    Ok(users)
}

async fn fetch_reports(pool: &PgPool) -> anyhow::Result<Vec<Report>> {
    let item_rows = sqlx::query(
        "SELECT report_id, score FROM inspection.report_items ORDER BY report_id, position",
    )
    .fetch_all(pool)
    .await?;
    let mut items: HashMap<Uuid, Vec<ReportItem>> = HashMap::new();
    for row in item_rows {
        items
            .entry(row.get("report_id"))
            .or_default()
            .push(ReportItem {
                score: row.get("score"),
            });
    }

    let rows = sqlx::query(
        "SELECT id, location_id, inspector_id, report_date, status \
         FROM inspection.reports ORDER BY report_date DESC",
    )
    .fetch_all(pool)
    .await?;
    let mut reports = Vec::with_capacity(rows.len());

    for row in rows {
        let id: Uuid = row.get("id");
        let status: String = row.get("status");
        reports.push(Report {
            id,
            location_id: row.get("location_id"),
            inspector_id: row.get("inspector_id"),
            date: row.get("report_date"),
            status: parse_report_status(&status)?,
            items: items.remove(&id).unwrap_or_default(),
        });
    }

    Ok(reports)
}

async fn fetch_cdrs(pool: &PgPool) -> anyhow::Result<Vec<Cdr>> {
    let rows = sqlx::query(
        "SELECT id, location_id, employee_id, cdr_date, cdr_time, status, incident_type \
         FROM inspection.cdrs ORDER BY cdr_date DESC, cdr_time DESC",
    )
    .fetch_all(pool)
    .await?;
    let mut cdrs = Vec::with_capacity(rows.len());

    for row in rows {
        let status: String = row.get("status");
        cdrs.push(Cdr {
            id: row.get("id"),
            location_id: row.get("location_id"),
            employee_id: row.get("employee_id"),
            date: row.get("cdr_date"),
            time: row.get("cdr_time"),
            status: parse_cdr_status(&status)?,
            incident_type: row.get("incident_type"),
        });
    }

    Ok(cdrs)
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

pub fn parse_report_status(value: &str) -> anyhow::Result<ReportStatus> {
    match normalize(value).as_str() {
        "draft" => Ok(ReportStatus::Draft),
        "submitted" => Ok(ReportStatus::Submitted),
        "reviewed" => Ok(ReportStatus::Reviewed),
        "approved" => Ok(ReportStatus::Approved),
        _ => anyhow::bail!("unknown report status {value:?}"),
    }
}

pub fn parse_cdr_status(value: &str) -> anyhow::Result<CdrStatus> {
    match normalize(value).as_str() {
        "draft" => Ok(CdrStatus::Draft),
        "submitted" => Ok(CdrStatus::Submitted),
        "underreview" => Ok(CdrStatus::UnderReview),
        "resolved" => Ok(CdrStatus::Resolved),
        "closed" => Ok(CdrStatus::Closed),
        _ => anyhow::bail!("unknown cdr status {value:?}"),
    }
}

pub fn parse_role(value: &str) -> anyhow::Result<UserRole> {
    match normalize(value).as_str() {
        "manager" => Ok(UserRole::Manager),
        "inspector" => Ok(UserRole::Inspector),
        "employee" => Ok(UserRole::Employee),
        "admin" => Ok(UserRole::Admin),
        _ => anyhow::bail!("unknown user role {value:?}"),
    }
}
