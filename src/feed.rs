use chrono::NaiveDateTime;
use serde::Serialize;

use crate::calendar;
use crate::critical::compare_newest_first;
use crate::models::{Cdr, Report};

pub const FEED_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "type", content = "item", rename_all = "lowercase")]
pub enum FeedItem<'a> {
    Report(&'a Report),
    Cdr(&'a Cdr),
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry<'a> {
    pub timestamp: Option<NaiveDateTime>,
    /// Ordering key; offset timestamps are normalized to UTC.
    #[serde(skip)]
    pub instant: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub item: FeedItem<'a>,
}

/// Non-draft reports and CDRs, newest first, capped at `limit` (never above [`FEED_LIMIT`]).
pub fn activity_feed<'a>(reports: &'a [Report], cdrs: &'a [Cdr], limit: usize) -> Vec<FeedEntry<'a>> {
    let report_entries = reports
        .iter()
        .filter(|report| !report.is_draft())
        .map(|report| FeedEntry {
            timestamp: calendar::parse_timestamp(&report.date),
            instant: calendar::parse_instant(&report.date),
            item: FeedItem::Report(report),
        });
    let cdr_entries = cdrs.iter().filter(|cdr| !cdr.is_draft()).map(|cdr| FeedEntry {
        timestamp: calendar::cdr_timestamp(&cdr.date, &cdr.time),
        instant: calendar::cdr_instant(&cdr.date, &cdr.time),
        item: FeedItem::Cdr(cdr),
    });

    let mut entries: Vec<FeedEntry<'a>> = report_entries.chain(cdr_entries).collect();
    entries.sort_by(|a, b| compare_newest_first(a.instant, b.instant));
    entries.truncate(limit.min(FEED_LIMIT));
    entries
}
