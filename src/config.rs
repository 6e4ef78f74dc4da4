use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;

use crate::calendar;
use crate::db;
use crate::directory::Snapshot;

/// Where the inspection collections come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    SnapshotFile(PathBuf),
    Postgres(String),
}

impl Source {
    /// An explicit snapshot wins over `DATABASE_URL`.
    pub fn resolve(snapshot: Option<PathBuf>, database_url: Option<String>) -> anyhow::Result<Self> {
        if let Some(path) = snapshot {
            return Ok(Self::SnapshotFile(path));
        }
        match database_url.filter(|url| !url.trim().is_empty()) {
            Some(url) => Ok(Self::Postgres(url)),
            None => anyhow::bail!(
                "no data source: pass --snapshot <file> or set DATABASE_URL to a Postgres instance"
            ),
        }
    }

    pub async fn load(&self) -> anyhow::Result<Snapshot> {
        match self {
            Self::SnapshotFile(path) => Snapshot::from_json_file(path),
            Self::Postgres(url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(url)
                    .await
                    .context("failed to connect to Postgres")?;
                db::load_snapshot(&pool).await
            }
        }
    }
}

pub fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(calendar::today)
}
