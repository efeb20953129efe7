//! Weighted score computation
//!
//! The score of a submission is the sum, over the survey's sections, of the
//! section's mean answer multiplied by the section weight. Means are taken
//! over the section's defined item count, so missing and non-numeric
//! answers pull the mean down as zeros. A section with no items has a mean
//! of zero.
//!
//! ```rust
//! use survey_service::models::Section;
//! use survey_service::scoring::{compute_score, format_score};
//!
//! let sections = vec![
//!     Section { title: None, weight: 0.6, items: vec!["a".into(), "b".into()] },
//!     Section { title: None, weight: 0.4, items: vec!["c".into(), "d".into()] },
//! ];
//! let answers = vec![
//!     vec![Some(4.into()), Some(4.into())],
//!     vec![Some(2.into()), Some(2.into())],
//! ];
//! assert_eq!(format_score(compute_score(&sections, &answers)), "3.20");
//! ```

use crate::models::{Answers, Section};

/// Per-section contribution to a total score
#[derive(Debug, Clone, PartialEq)]
pub struct SectionScore {
    pub mean: f64,
    pub weight: f64,
}

impl SectionScore {
    pub fn weighted(&self) -> f64 {
        self.mean * self.weight
    }
}

/// Full breakdown of a score, one entry per survey section
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub sections: Vec<SectionScore>,
}

impl ScoreBreakdown {
    /// Unrounded weighted sum
    pub fn total(&self) -> f64 {
        self.sections.iter().map(SectionScore::weighted).sum()
    }
}

/// Compute the per-section breakdown for a set of answers
pub fn breakdown(sections: &[Section], answers: &Answers) -> ScoreBreakdown {
    let sections = sections
        .iter()
        .enumerate()
        .map(|(index, section)| {
            let item_count = section.items.len();
            let mean = if item_count == 0 {
                0.0
            } else {
                let sum: f64 = answers
                    .get(index)
                    .map(|row| {
                        row.iter()
                            .take(item_count)
                            .map(|answer| answer.as_ref().map_or(0.0, |a| a.numeric_value()))
                            .sum()
                    })
                    .unwrap_or(0.0);
                sum / item_count as f64
            };

            SectionScore {
                mean,
                weight: section.weight,
            }
        })
        .collect();

    ScoreBreakdown { sections }
}

/// Compute the total score, rounded to two decimals
pub fn compute_score(sections: &[Section], answers: &Answers) -> f64 {
    round_score(breakdown(sections, answers).total())
}

/// Round to two decimal places
pub fn round_score(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format with exactly two decimals, e.g. `3.2` -> `"3.20"`
pub fn format_score(value: f64) -> String {
    format!("{:.2}", value)
}
