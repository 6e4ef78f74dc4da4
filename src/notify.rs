use anyhow::Context;
use serde::Serialize;
use uuid::Uuid;

use crate::dashboard::location_name;
use crate::directory::Directory;
use crate::i18n::Language;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningNotice {
    pub report_id: Uuid,
    pub inspector_id: Uuid,
    pub inspector_name: String,
    pub location_name: String,
    pub message: String,
}

impl WarningNotice {
    pub fn new(report_id: Uuid, inspector_id: Uuid, inspector_name: &str, location_name: &str) -> Self {
        Self {
            report_id,
            inspector_id,
            inspector_name: inspector_name.to_string(),
            location_name: location_name.to_string(),
            message: format!(
                "Warning notification sent to {inspector_name} regarding low performance at {location_name}."
            ),
        }
    }
}

/// Delivery channel for low-performance warnings.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn send_warning(&self, notice: &WarningNotice) -> anyhow::Result<()>;
}

/// Writes notices to the log; stands in until a real delivery channel exists.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_warning(&self, notice: &WarningNotice) -> anyhow::Result<()> {
        log::warn!("{} (report {})", notice.message, notice.report_id);
        Ok(())
    }
}

/// Builds the notice for `report_id` and hands it to `notifier`.
pub fn send_report_warning<D: Directory + ?Sized, N: Notifier + ?Sized>(
    directory: &D,
    notifier: &N,
    report_id: Uuid,
    language: Language,
) -> anyhow::Result<WarningNotice> {
    let report = directory
        .reports()
        .iter()
        .find(|report| report.id == report_id)
        .with_context(|| format!("report {report_id} not found"))?;

    let inspector_name = directory
        .inspector_by_id(report.inspector_id)
        .map(|user| user.name.clone())
        .unwrap_or_default();
    let location = location_name(directory, report.location_id, language);
    let notice = WarningNotice::new(report.id, report.inspector_id, &inspector_name, &location);

    notifier
        .send_warning(&notice)
        .with_context(|| format!("failed to send warning for report {report_id}"))?;
    Ok(notice)
}
