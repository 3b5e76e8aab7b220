//! Reports: six analytics feeds shaped into chart series and tables.

use campus_client::models::analytics::{ClassCapacity, RecentEnrollment, Stats};
use campus_client::resources::analytics::AnalyticsApi;
use campus_core::navigation::Route;

use super::{admit, View};
use crate::error::AppResult;
use crate::state::AppState;

/// One bar of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: u64,
    /// `value` relative to the largest value in the series, in `0.0..=1.0`.
    pub ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSeries {
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series keeping input order. An all-zero series has ratio 0.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, u64)>) -> Self {
        let pairs: Vec<(String, u64)> = pairs.into_iter().collect();
        let max = pairs.iter().map(|(_, v)| *v).max().unwrap_or(0);
        let bars = pairs
            .into_iter()
            .map(|(label, value)| Bar {
                ratio: if max == 0 {
                    0.0
                } else {
                    value as f64 / max as f64
                },
                label,
                value,
            })
            .collect();
        Self { bars }
    }

    pub fn max(&self) -> u64 {
        self.bars.iter().map(|b| b.value).max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.bars.iter().map(|b| b.value).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// A class-capacity table row.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityRow {
    pub class_name: String,
    pub capacity: u64,
    pub enrolled: u64,
    /// `enrolled / capacity`; 0 for a class without capacity.
    pub utilization: f64,
    pub is_full: bool,
}

impl From<ClassCapacity> for CapacityRow {
    fn from(row: ClassCapacity) -> Self {
        let utilization = if row.capacity == 0 {
            0.0
        } else {
            row.enrolled as f64 / row.capacity as f64
        };
        Self {
            is_full: row.capacity > 0 && row.enrolled >= row.capacity,
            class_name: row.class_name,
            capacity: row.capacity,
            enrolled: row.enrolled,
            utilization,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub stats: Stats,
    pub enrollments_by_class: BarSeries,
    pub students_by_grade: BarSeries,
    pub activity: BarSeries,
    pub class_capacity: Vec<CapacityRow>,
    pub recent_enrollments: Vec<RecentEnrollment>,
}

/// Fetch all feeds concurrently; any failure fails the report.
pub async fn load_report(state: &AppState) -> AppResult<View<Report>> {
    if let Err(view) = admit(&state.session.current(), Route::Reports) {
        return Ok(view);
    }

    let api = &state.api;
    let (stats, by_class, by_grade, recent, capacity, timeline) = tokio::try_join!(
        AnalyticsApi::stats(api),
        AnalyticsApi::enrollments_by_class(api),
        AnalyticsApi::students_by_grade(api),
        AnalyticsApi::recent_enrollments(api),
        AnalyticsApi::class_capacity(api),
        AnalyticsApi::activity_timeline(api),
    )?;

    Ok(View::Ready(Report {
        stats,
        enrollments_by_class: BarSeries::from_pairs(
            by_class.into_iter().map(|r| (r.class_name, r.count)),
        ),
        students_by_grade: BarSeries::from_pairs(by_grade.into_iter().map(|r| (r.grade, r.count))),
        activity: BarSeries::from_pairs(timeline.into_iter().map(|p| (p.date, p.count))),
        class_capacity: capacity.into_iter().map(CapacityRow::from).collect(),
        recent_enrollments: recent,
    }))
}
