//! Aggregate view of the session history

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::types::{Frame, SessionRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub sessions: usize,
    pub total_questions: u32,
    pub total_correct: u32,
    /// Over all questions, not a mean of session accuracies
    pub accuracy: f64,
    pub best_score: u32,
    pub mean_final_depth: f64,
    /// Weighted by questions per session
    pub mean_reaction_ms: f64,
    pub frame_attempts: BTreeMap<Frame, u32>,
}

impl HistorySummary {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let mut summary = Self {
            sessions: records.len(),
            ..Self::default()
        };
        let mut depth_sum = 0usize;
        let mut reaction_sum = 0.0;
        for record in records {
            summary.total_questions += record.questions_attempted;
            summary.total_correct += record.correct;
            summary.best_score = summary.best_score.max(record.score);
            depth_sum += record.final_depth;
            reaction_sum += record.avg_reaction_ms * record.questions_attempted as f64;
            for frame in &record.frames {
                *summary.frame_attempts.entry(*frame).or_insert(0) += 1;
            }
        }
        summary.mean_final_depth = depth_sum as f64 / records.len() as f64;
        if summary.total_questions > 0 {
            let total = summary.total_questions as f64;
            summary.accuracy = summary.total_correct as f64 / total;
            summary.mean_reaction_ms = reaction_sum / total;
        }
        summary
    }

    /// Multi-line plain-text report
    pub fn to_report(&self) -> String {
        let mut lines = vec![
            format!("sessions:        {}", self.sessions),
            format!("questions:       {} ({} correct)", self.total_questions, self.total_correct),
            format!("accuracy:        {:.1}%", self.accuracy * 100.0),
            format!("best score:      {}", self.best_score),
            format!("mean end depth:  {:.2}", self.mean_final_depth),
            format!("mean reaction:   {:.0} ms", self.mean_reaction_ms),
        ];
        for (frame, count) in &self.frame_attempts {
            lines.push(format!("  {:<12} {}", frame.to_string(), count));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionEndCause;
    use chrono::Utc;

    fn record(score: u32, attempted: u32, correct: u32, reaction: f64, frames: Vec<Frame>) -> SessionRecord {
        SessionRecord {
            id: "s".into(),
            started_at: Utc::now(),
            ended_at: Utc::now(),
            end_cause: SessionEndCause::Aborted,
            score,
            questions_attempted: attempted,
            correct,
            accuracy: correct as f64 / attempted as f64,
            start_depth: 2,
            final_depth: 3,
            peak_depth: 3,
            avg_reaction_ms: reaction,
            modifiers: vec![],
            frames,
        }
    }

    #[test]
    fn test_empty_history_is_zeroed() {
        let s = HistorySummary::from_records(&[]);
        assert_eq!(s, HistorySummary::default());
        assert_eq!(s.accuracy, 0.0);
    }

    #[test]
    fn test_aggregates_weighted() {
        let records = vec![
            record(40, 2, 2, 1000.0, vec![Frame::Linear, Frame::Linear]),
            record(10, 2, 0, 2000.0, vec![Frame::Hierarchy, Frame::Linear]),
        ];
        let s = HistorySummary::from_records(&records);
        assert_eq!(s.sessions, 2);
        assert_eq!(s.total_questions, 4);
        assert_eq!(s.accuracy, 0.5);
        assert_eq!(s.best_score, 40);
        assert_eq!(s.mean_reaction_ms, 1500.0);
        assert_eq!(s.frame_attempts[&Frame::Linear], 3);
        assert!(s.to_report().contains("accuracy:        50.0%"));
    }
}
