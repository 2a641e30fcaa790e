//! Schedule and progress classification.
//!
//! Each project is judged on its own against an injected `now`. The four
//! buckets overlap: a project can be both delayed and high-progress.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::Project;

/// Progress at or above which a project counts as high-progress.
pub const HIGH_PROGRESS_PERCENT: f64 = 75.0;
/// Progress at or below which a project counts as low-progress.
pub const LOW_PROGRESS_PERCENT: f64 = 25.0;

/// Schedule/progress flags for one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleState {
    pub on_time: bool,
    pub delayed: bool,
    pub high_progress: bool,
    pub low_progress: bool,
}

impl ScheduleState {
    pub fn classify(project: &Project, now: DateTime<Utc>) -> Self {
        let progress = project.progress_percent;
        let high_progress = progress >= HIGH_PROGRESS_PERCENT;
        let (on_time, delayed) = match project.end_date {
            Some(end) if end >= now => (high_progress, false),
            Some(_) => (false, progress < 100.0),
            None => (false, false),
        };
        Self {
            on_time,
            delayed,
            high_progress,
            low_progress: progress <= LOW_PROGRESS_PERCENT,
        }
    }
}

/// Bucket counts over the project list.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub on_time_projects: i64,
    pub delayed_projects: i64,
    pub high_progress_projects: i64,
    pub low_progress_projects: i64,
}

impl PerformanceMetrics {
    pub fn compute(projects: &[Project], now: DateTime<Utc>) -> Self {
        let mut metrics = Self::default();
        for project in projects {
            let state = ScheduleState::classify(project, now);
            metrics.on_time_projects += state.on_time as i64;
            metrics.delayed_projects += state.delayed as i64;
            metrics.high_progress_projects += state.high_progress as i64;
            metrics.low_progress_projects += state.low_progress as i64;
        }
        metrics
    }
}
