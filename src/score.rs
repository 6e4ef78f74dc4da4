use std::cell::RefCell;
use std::collections::HashMap;

use uuid::Uuid;

use crate::directory::Directory;
use crate::models::Report;

pub const CRITICAL_THRESHOLD: f64 = 75.0;
pub const LOW_PERFORMANCE_THRESHOLD: f64 = 85.0;
/// Items scoring below this count as failed.
pub const FAILED_ITEM_SCORE: f64 = 3.0;

/// Compliance percentage per report, memoized by report id for one aggregation pass.
pub struct ScoreCalculator<'a, D: Directory + ?Sized> {
    directory: &'a D,
    cache: RefCell<HashMap<Uuid, f64>>,
}

impl<'a, D: Directory + ?Sized> ScoreCalculator<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self {
            directory,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn directory(&self) -> &'a D {
        self.directory
    }

    pub fn score(&self, report: &Report) -> f64 {
        if let Some(score) = self.cache.borrow().get(&report.id) {
            return *score;
        }
        let score = compute_score(self.directory, report);
        self.cache.borrow_mut().insert(report.id, score);
        score
    }

    pub fn is_critical(&self, report: &Report) -> bool {
        is_critical(report, self.score(report))
    }

    pub fn average<'r, I>(&self, reports: I) -> f64
    where
        I: IntoIterator<Item = &'r Report>,
    {
        let (total, count) = reports
            .into_iter()
            .fold((0.0, 0usize), |(total, count), report| {
                (total + self.score(report), count + 1)
            });
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }
}

/// Unresolvable location or form, or an empty form, scores 0.
pub fn compute_score<D: Directory + ?Sized>(directory: &D, report: &Report) -> f64 {
    let Some(location) = directory.location_by_id(report.location_id) else {
        log::debug!(
            "report {} references unknown location {}",
            report.id,
            report.location_id
        );
        return 0.0;
    };
    let Some(form) = directory.form_by_id(location.form_id) else {
        log::debug!(
            "location {} references unknown form {}",
            location.id,
            location.form_id
        );
        return 0.0;
    };
    if form.items.is_empty() {
        return 0.0;
    }

    let max_score: f64 = form.items.iter().map(|item| item.max_score).sum();
    let actual_score: f64 = report.items.iter().map(|item| item.score).sum();
    if max_score > 0.0 {
        actual_score / max_score * 100.0
    } else {
        0.0
    }
}

/// A finalized report below the compliance threshold.
pub fn is_critical(report: &Report, score: f64) -> bool {
    score < CRITICAL_THRESHOLD && !report.is_draft()
}

pub fn failed_items(report: &Report) -> usize {
    report
        .items
        .iter()
        .filter(|item| item.score < FAILED_ITEM_SCORE)
        .count()
}
