use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::i18n::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Draft,
    Submitted,
    Reviewed,
    Approved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CdrStatus {
    Draft,
    Submitted,
    UnderReview,
    Resolved,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Manager,
    Inspector,
    Employee,
    Admin,
}

/// Text keyed by language tag, e.g. `{"en": "Main Lobby", "ar": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(pub BTreeMap<String, String>);

impl LocalizedText {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(tag, text)| (tag.to_string(), text.to_string()))
                .collect(),
        )
    }

    /// Falls back to English, then to whatever entry exists.
    pub fn get(&self, language: Language) -> Option<&str> {
        self.0
            .get(language.tag())
            .or_else(|| self.0.get(Language::En.tag()))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub location_id: Uuid,
    pub inspector_id: Uuid,
    pub date: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub items: Vec<ReportItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormItem {
    #[serde(default)]
    pub label: String,
    pub max_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<FormItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Uuid,
    pub name: LocalizedText,
    pub zone_id: Uuid,
    pub form_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: Uuid,
    pub name: LocalizedText,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cdr {
    pub id: Uuid,
    pub location_id: Uuid,
    pub employee_id: Uuid,
    pub date: String,
    pub time: String,
    pub status: CdrStatus,
    pub incident_type: String,
}

impl fmt::Display for CdrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "Draft"),
            Self::Submitted => write!(f, "Submitted"),
            Self::UnderReview => write!(f, "Under Review"),
            Self::Resolved => write!(f, "Resolved"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

impl Report {
    pub fn is_draft(&self) -> bool {
        self.status == ReportStatus::Draft
    }
}

impl Cdr {
    pub fn is_draft(&self) -> bool {
        self.status == CdrStatus::Draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localized_text_falls_back_to_english() {
        let name = LocalizedText::new(&[("en", "Main Lobby")]);
        assert_eq!(name.get(Language::Ar), Some("Main Lobby"));
        assert_eq!(name.get(Language::En), Some("Main Lobby"));
    }

    #[test]
    fn localized_text_prefers_requested_language() {
        let name = LocalizedText::new(&[("en", "Kitchen"), ("ar", "المطبخ")]);
        assert_eq!(name.get(Language::Ar), Some("المطبخ"));
    }

    #[test]
    fn cdr_status_labels_read_as_words() {
        assert_eq!(CdrStatus::UnderReview.to_string(), "Under Review");
        assert_eq!(CdrStatus::Submitted.to_string(), "Submitted");
    }

    #[test]
    fn empty_localized_text_has_no_value() {
        assert_eq!(LocalizedText::default().get(Language::En), None);
    }

    #[test]
    fn report_deserializes_from_camel_case() {
        let json = r#"{
            "id": "3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2",
            "locationId": "0c22f1f1-9184-4fd4-9b21-28c68a6a89dc",
            "inspectorId": "d5a0a1a2-2a3c-44c2-8f73-60b7897a9dd2",
            "date": "2026-02-02",
            "status": "Submitted",
            "items": [{"score": 4}, {"score": 2.5}]
        }"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.items.len(), 2);
        assert!(!report.is_draft());
    }
}
