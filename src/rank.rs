//! Experience filter and top-N ranking.

use crate::models::{Candidate, ScoreTable};

/// Candidates with at least `min_experience` years, best score first,
/// truncated to `pick`. Equal scores keep upload order.
pub fn filter_and_rank(table: &ScoreTable, min_experience: f64, pick: usize) -> Vec<&Candidate> {
    let mut eligible: Vec<&Candidate> = table
        .iter()
        .filter(|c| f64::from(c.experience) >= min_experience)
        .collect();
    // sort_by is stable, so ties stay in upload order.
    eligible.sort_by(|a, b| b.score.total_cmp(&a.score));
    eligible.truncate(pick);
    eligible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, score: f64, experience: u32) -> Candidate {
        Candidate {
            name: name.to_string(),
            text: String::new(),
            experience,
            score,
            similarity: 0.0,
        }
    }

    fn names(ranked: &[&Candidate]) -> Vec<String> {
        ranked.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn filters_then_ranks() {
        let table = ScoreTable::new(vec![
            candidate("A", 9.0, 5),
            candidate("B", 7.0, 6),
            candidate("C", 8.0, 2),
        ]);
        assert_eq!(names(&filter_and_rank(&table, 4.0, 2)), vec!["A", "B"]);
    }

    #[test]
    fn ties_keep_upload_order() {
        let table = ScoreTable::new(vec![
            candidate("first", 5.0, 1),
            candidate("top", 8.0, 1),
            candidate("second", 5.0, 1),
            candidate("third", 5.0, 1),
        ]);
        assert_eq!(
            names(&filter_and_rank(&table, 0.0, 10)),
            vec!["top", "first", "second", "third"]
        );
    }

    #[test]
    fn threshold_is_inclusive_and_fractional() {
        let table = ScoreTable::new(vec![candidate("A", 1.0, 3), candidate("B", 10.0, 2)]);
        assert_eq!(names(&filter_and_rank(&table, 3.0, 5)), vec!["A"]);
        assert_eq!(names(&filter_and_rank(&table, 2.5, 5)), vec!["A"]);
    }

    #[test]
    fn pick_zero_and_empty_table() {
        let table = ScoreTable::new(vec![candidate("A", 1.0, 3)]);
        assert!(filter_and_rank(&table, 0.0, 0).is_empty());
        assert!(filter_and_rank(&ScoreTable::default(), 0.0, 3).is_empty());
    }

    #[test]
    fn nobody_qualifies() {
        let table = ScoreTable::new(vec![candidate("A", 10.0, 1), candidate("B", 1.0, 0)]);
        assert!(filter_and_rank(&table, 5.0, 2).is_empty());
    }
}
