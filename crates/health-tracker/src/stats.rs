//! Summary statistics shown under `list` output.

use serde::Serialize;
use tracker_core::{ExerciseEntry, FastingEntry, Record, SodaEntry, WeightEntry};

/// A category's list summary.
pub(crate) trait Summary: Serialize {
    /// "Label: value" lines for text output.
    fn lines(&self) -> Vec<String>;
}

pub(crate) trait Summarize: Record {
    type Summary: Summary;

    /// Summarize entries sorted by date.
    fn summarize(entries: &[Self]) -> Self::Summary;
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct WeightSummary {
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub spread: f64,
    /// Last minus first; zero with fewer than two entries.
    pub change: f64,
}

impl Summary for WeightSummary {
    fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total Records : {}", self.count),
            format!("Average Weight: {:.1} lbs", self.average),
            format!(
                "Weight Range  : {:.1} - {:.1} lbs ({:.1} lbs)",
                self.min, self.max, self.spread
            ),
        ];
        if self.count > 1 {
            lines.push(format!("Overall Change: {:+.1} lbs", self.change));
        }
        lines
    }
}

impl Summarize for WeightEntry {
    type Summary = WeightSummary;

    fn summarize(entries: &[Self]) -> WeightSummary {
        let weights: Vec<f64> = entries.iter().map(|e| e.weight).collect();
        let (Some(first), Some(last)) = (weights.first(), weights.last()) else {
            return WeightSummary {
                count: 0,
                average: 0.0,
                min: 0.0,
                max: 0.0,
                spread: 0.0,
                change: 0.0,
            };
        };
        let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
        let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        WeightSummary {
            count: weights.len(),
            average: weights.iter().sum::<f64>() / weights.len() as f64,
            min,
            max,
            spread: max - min,
            change: last - first,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ExerciseSummary {
    pub count: usize,
    pub total_minutes: i64,
    pub average_minutes: f64,
    pub completed: usize,
    pub completion_rate: f64,
    /// Completed sessions that met the daily goal.
    pub compliant_days: usize,
}

impl Summary for ExerciseSummary {
    fn lines(&self) -> Vec<String> {
        vec![
            format!("Total Records    : {}", self.count),
            format!("Total Duration   : {} minutes", self.total_minutes),
            format!("Average Duration : {:.1} minutes", self.average_minutes),
            format!("Completed        : {}", self.completed),
            format!("Completion Rate  : {:.1}%", self.completion_rate),
            format!("Goal Days        : {}", self.compliant_days),
        ]
    }
}

impl Summarize for ExerciseEntry {
    type Summary = ExerciseSummary;

    fn summarize(entries: &[Self]) -> ExerciseSummary {
        let count = entries.len();
        let total_minutes: i64 = entries.iter().map(|e| i64::from(e.duration)).sum();
        let completed = entries.iter().filter(|e| e.completed).count();
        ExerciseSummary {
            count,
            total_minutes,
            average_minutes: if count == 0 {
                0.0
            } else {
                total_minutes as f64 / count as f64
            },
            completed,
            completion_rate: percent(completed, count),
            compliant_days: entries.iter().filter(|e| e.is_compliant()).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct FastingSummary {
    pub count: usize,
    pub compliant: usize,
    pub compliance_rate: f64,
}

impl Summary for FastingSummary {
    fn lines(&self) -> Vec<String> {
        vec![
            format!("Total Days      : {}", self.count),
            format!("Compliant Days  : {}", self.compliant),
            format!("Compliance Rate : {:.1}%", self.compliance_rate),
        ]
    }
}

impl Summarize for FastingEntry {
    type Summary = FastingSummary;

    fn summarize(entries: &[Self]) -> FastingSummary {
        let compliant = entries.iter().filter(|e| e.is_compliant()).count();
        FastingSummary {
            count: entries.len(),
            compliant,
            compliance_rate: percent(compliant, entries.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SodaSummary {
    pub count: usize,
    pub days_consumed: usize,
    pub total_oz: f64,
    pub compliance_rate: f64,
}

impl Summary for SodaSummary {
    fn lines(&self) -> Vec<String> {
        vec![
            format!("Total Days      : {}", self.count),
            format!("Days Consumed   : {}", self.days_consumed),
            format!("Total Quantity  : {} oz", self.total_oz),
            format!("Compliance Rate : {:.1}%", self.compliance_rate),
        ]
    }
}

impl Summarize for SodaEntry {
    type Summary = SodaSummary;

    fn summarize(entries: &[Self]) -> SodaSummary {
        let compliant = entries.iter().filter(|e| e.is_compliant()).count();
        SodaSummary {
            count: entries.len(),
            days_consumed: entries.iter().filter(|e| e.consumed).count(),
            total_oz: entries.iter().filter(|e| e.consumed).map(|e| e.quantity).sum(),
            compliance_rate: percent(compliant, entries.len()),
        }
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
