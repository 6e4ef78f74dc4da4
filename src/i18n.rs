use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }
}

/// Heading lookup for rendered output. Unknown keys render as the key itself.
pub fn t(language: Language, key: &str) -> String {
    let text = match (language, key) {
        (Language::En, "dashboard") => "Dashboard",
        (Language::Ar, "dashboard") => "لوحة التحكم",
        (Language::En, "criticalIssues") => "Critical Issues",
        (Language::Ar, "criticalIssues") => "المشاكل الحرجة",
        (Language::En, "criticalIssuesList") => "Critical Issues List",
        (Language::Ar, "criticalIssuesList") => "قائمة المشاكل الحرجة",
        (Language::En, "requiresImmediateAction") => "reports require immediate action",
        (Language::Ar, "requiresImmediateAction") => "تقارير تتطلب إجراءً فورياً",
        (Language::En, "overallCompliance") => "Overall Compliance",
        (Language::Ar, "overallCompliance") => "الامتثال العام",
        (Language::En, "totalInspections") => "Inspections This Month",
        (Language::Ar, "totalInspections") => "عمليات التفتيش هذا الشهر",
        (Language::En, "pendingCdrs") => "Pending CDRs",
        (Language::Ar, "pendingCdrs") => "سجلات الإفصاح المعلقة",
        (Language::En, "topInspector") => "Top Inspector",
        (Language::Ar, "topInspector") => "أفضل مفتش",
        (Language::En, "performanceTrend") => "Performance Trend",
        (Language::Ar, "performanceTrend") => "اتجاه الأداء",
        (Language::En, "insights") => "Insights",
        (Language::Ar, "insights") => "رؤى",
        (Language::En, "inspectorActivity") => "Inspector Activity",
        (Language::Ar, "inspectorActivity") => "نشاط المفتشين",
        (Language::En, "liveActivityFeed") => "Live Activity Feed",
        (Language::Ar, "liveActivityFeed") => "موجز النشاط المباشر",
        (Language::En, "lowPerformingAreas") => "Low Performing Areas",
        (Language::Ar, "lowPerformingAreas") => "المناطق ذات الأداء المنخفض",
        (Language::En, "vsLastMonth") => "vs last month",
        (Language::Ar, "vsLastMonth") => "مقارنة بالشهر الماضي",
        _ => return key.to_string(),
    };
    text.to_string()
}
