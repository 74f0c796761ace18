//! Learner statistics
//!
//! - `UserStats`: running totals updated after every graded answer
//! - `subject_breakdown`: per-subject coverage of the question bank

use std::collections::{BTreeMap, HashMap};

use crate::types::{Question, ReviewOverride, SubjectStats, UserStats};

/// floor(part / whole * 100), 0 when `whole` is 0
fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        0
    } else {
        (u64::from(part) * 100 / u64::from(whole)) as u32
    }
}

impl UserStats {
    /// Record one graded answer
    pub fn record(&mut self, subject: Option<&str>, is_correct: bool) {
        self.total_attempted += 1;
        if is_correct {
            self.correct_count += 1;
        }
        self.mastery = percent(self.correct_count, self.total_attempted).min(100);
        if let Some(subject) = subject {
            *self.subject_progress.entry(subject.to_string()).or_insert(0) += 1;
        }
    }

    /// Share of correct answers, 0-100
    pub fn accuracy(&self) -> u32 {
        percent(self.correct_count, self.total_attempted)
    }
}

/// Aggregate bank coverage by subject, sorted by subject name
///
/// A question counts as attempted once it has an override or a positive
/// review count in the bank.
pub fn subject_breakdown(
    bank: &[Question],
    overrides: &BTreeMap<u64, ReviewOverride>,
) -> Vec<SubjectStats> {
    let mut by_subject: HashMap<&str, SubjectStats> = HashMap::new();

    for q in bank {
        let entry = by_subject
            .entry(q.subject.as_str())
            .or_insert_with(|| SubjectStats {
                subject: q.subject.clone(),
                total_questions: 0,
                attempted: 0,
                total_reviews: 0,
                mastery: 0,
            });
        entry.total_questions += 1;

        let reviews = overrides
            .get(&q.id)
            .map(|o| o.review_count)
            .or(q.review_count)
            .unwrap_or(0);
        if overrides.contains_key(&q.id) || reviews > 0 {
            entry.attempted += 1;
            entry.total_reviews += reviews.max(0);
        }
    }

    let mut stats: Vec<SubjectStats> = by_subject
        .into_values()
        .map(|mut s| {
            s.mastery = percent(s.attempted, s.total_questions);
            s
        })
        .collect();
    stats.sort_by(|a, b| a.subject.cmp(&b.subject));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u64, subject: &str, review_count: Option<i64>) -> Question {
        Question {
            id,
            subject: subject.to_string(),
            question_text: format!("Question {id}"),
            option_a: "a".to_string(),
            option_b: "b".to_string(),
            option_c: "c".to_string(),
            option_d: "d".to_string(),
            correct_answer: "A".to_string(),
            last_reviewed_at: None,
            review_count,
        }
    }

    #[test]
    fn test_record_updates_mastery() {
        let mut stats = UserStats::default();
        stats.record(Some("Anatomy"), true);
        stats.record(Some("Anatomy"), false);
        stats.record(Some("Pharmacology"), true);

        assert_eq!(stats.total_attempted, 3);
        assert_eq!(stats.correct_count, 2);
        // floor(2 / 3 * 100)
        assert_eq!(stats.mastery, 66);
        assert_eq!(stats.subject_progress.get("Anatomy"), Some(&2));
        assert_eq!(stats.subject_progress.get("Pharmacology"), Some(&1));
    }

    #[test]
    fn test_accuracy_empty() {
        assert_eq!(UserStats::default().accuracy(), 0);
    }

    #[test]
    fn test_subject_breakdown() {
        let bank = vec![
            question(1, "Physiology", None),
            question(2, "Anatomy", Some(3)),
            question(3, "Anatomy", None),
            question(4, "Anatomy", None),
            question(5, "Physiology", None),
        ];
        let mut overrides = BTreeMap::new();
        overrides.insert(
            3,
            ReviewOverride {
                review_count: 1,
                last_reviewed_at: "2026-02-01T00:00:00Z".to_string(),
            },
        );

        let stats = subject_breakdown(&bank, &overrides);
        assert_eq!(stats.len(), 2);

        let anatomy = &stats[0];
        assert_eq!(anatomy.subject, "Anatomy");
        assert_eq!(anatomy.total_questions, 3);
        assert_eq!(anatomy.attempted, 2);
        assert_eq!(anatomy.total_reviews, 4);
        assert_eq!(anatomy.mastery, 66);

        let physiology = &stats[1];
        assert_eq!(physiology.attempted, 0);
        assert_eq!(physiology.mastery, 0);
    }
}
