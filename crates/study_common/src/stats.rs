//! Dashboard statistics over the activity log.

use crate::activity_log::{HistoryEntry, QuizScoreEntry};

/// Score below this fraction marks a topic as a weak area
pub const WEAK_AREA_THRESHOLD: f64 = 0.6;

pub const MAX_WEAK_AREAS: usize = 3;

/// Aggregated stats for display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_quizzes: usize,
    /// Mean of per-quiz percentages, rounded
    pub average_percent: u32,
    /// Most recent low-scoring topics, deduplicated
    pub weak_areas: Vec<String>,
}

impl DashboardStats {
    /// Aggregate newest-first quiz scores
    pub fn from_scores(scores: &[QuizScoreEntry]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }

        let total_ratio: f64 = scores.iter().map(QuizScoreEntry::ratio).sum();
        let average_percent = ((total_ratio / scores.len() as f64) * 100.0).round() as u32;

        let mut weak_areas: Vec<String> = Vec::new();
        for entry in scores.iter().filter(|e| e.ratio() < WEAK_AREA_THRESHOLD) {
            if weak_areas.len() == MAX_WEAK_AREAS {
                break;
            }
            if !weak_areas.contains(&entry.topic) {
                weak_areas.push(entry.topic.clone());
            }
        }

        Self {
            total_quizzes: scores.len(),
            average_percent,
            weak_areas,
        }
    }
}

/// Newest `limit` history entries
pub fn recent_activity(history: &[HistoryEntry], limit: usize) -> &[HistoryEntry] {
    &history[..history.len().min(limit)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn score(topic: &str, score: u32, total: u32) -> QuizScoreEntry {
        QuizScoreEntry {
            id: 0,
            topic: topic.to_string(),
            score,
            total,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_empty_scores() {
        let stats = DashboardStats::from_scores(&[]);
        assert_eq!(stats.total_quizzes, 0);
        assert_eq!(stats.average_percent, 0);
        assert!(stats.weak_areas.is_empty());
    }

    #[test]
    fn test_average_is_mean_of_percentages() {
        // 100% and 60% -> 80%
        let stats = DashboardStats::from_scores(&[score("B", 5, 5), score("A", 3, 5)]);
        assert_eq!(stats.average_percent, 80);
        assert_eq!(stats.total_quizzes, 2);
        assert!(stats.weak_areas.is_empty());
    }

    #[test]
    fn test_weak_areas_newest_first_deduplicated_capped() {
        let scores = vec![
            score("Optics", 1, 5),
            score("Optics", 2, 5),
            score("Algebra", 5, 5),
            score("Cells", 0, 5),
            score("Tax law", 2, 5),
            score("History", 1, 5),
        ];
        let stats = DashboardStats::from_scores(&scores);
        assert_eq!(stats.weak_areas, vec!["Optics", "Cells", "Tax law"]);
    }

    #[test]
    fn test_zero_total_counts_as_zero() {
        let stats = DashboardStats::from_scores(&[score("Empty", 0, 0), score("Full", 4, 4)]);
        assert_eq!(stats.average_percent, 50);
        assert_eq!(stats.weak_areas, vec!["Empty"]);
    }

    #[test]
    fn test_recent_activity_limit() {
        let history: Vec<HistoryEntry> = (0..8)
            .map(|i| HistoryEntry {
                id: i,
                activity_type: "Summary".into(),
                topic: format!("t{}", i),
                date: Utc::now(),
            })
            .collect();
        assert_eq!(recent_activity(&history, 5).len(), 5);
        assert_eq!(recent_activity(&history[..2], 5).len(), 2);
    }
}
