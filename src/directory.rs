use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Cdr, Form, Location, Report, User, UserRole, Zone};

/// Read-only view of the inspection data store.
pub trait Directory {
    fn reports(&self) -> &[Report];
    fn cdrs(&self) -> &[Cdr];
    fn users(&self) -> &[User];
    fn location_by_id(&self, id: Uuid) -> Option<&Location>;
    fn form_by_id(&self, id: Uuid) -> Option<&Form>;
    fn zone_by_location_id(&self, location_id: Uuid) -> Option<&Zone>;

    /// Any user, not only inspectors: CDR employees resolve through here too.
    fn inspector_by_id(&self, id: Uuid) -> Option<&User> {
        self.users().iter().find(|user| user.id == id)
    }

    fn inspectors(&self) -> Vec<&User> {
        self.users()
            .iter()
            .filter(|user| user.role == UserRole::Inspector)
            .collect()
    }
}

/// Every collection held in memory, as loaded from a snapshot file or Postgres.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub reports: Vec<Report>,
    pub cdrs: Vec<Cdr>,
    pub locations: Vec<Location>,
    pub forms: Vec<Form>,
    pub zones: Vec<Zone>,
    pub users: Vec<User>,
}

impl Snapshot {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
        log::info!(
            "loaded snapshot {}: {} reports, {} cdrs, {} locations",
            path.display(),
            snapshot.reports.len(),
            snapshot.cdrs.len(),
            snapshot.locations.len()
        );
        Ok(snapshot)
    }
}

impl Directory for Snapshot {
    fn reports(&self) -> &[Report] {
        &self.reports
    }

    fn cdrs(&self) -> &[Cdr] {
        &self.cdrs
    }

    fn users(&self) -> &[User] {
        &self.users
    }

    fn location_by_id(&self, id: Uuid) -> Option<&Location> {
        self.locations.iter().find(|location| location.id == id)
    }

    fn form_by_id(&self, id: Uuid) -> Option<&Form> {
        self.forms.iter().find(|form| form.id == id)
    }

    fn zone_by_location_id(&self, location_id: Uuid) -> Option<&Zone> {
        let zone_id = self.location_by_id(location_id)?.zone_id;
        self.zones.iter().find(|zone| zone.id == zone_id)
    }
}
