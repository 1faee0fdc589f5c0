use std::cmp::Ordering;

/// One narration event. Timestamps are seconds; `None` means the store had
/// no usable value.
#[derive(Debug, Clone, PartialEq)]
pub struct Narration {
    pub participant_id: String,
    pub video_id: String,
    pub narration: String,
    pub start_timestamp: Option<f64>,
    pub end_timestamp: Option<f64>,
}

/// The `n` earliest narrations by start time. Undefined starts sort last;
/// equal starts keep their table order.
pub fn earliest(mut narrations: Vec<Narration>, n: usize) -> Vec<Narration> {
    narrations.sort_by(|a, b| match (a.start_timestamp, b.start_timestamp) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    narrations.truncate(n);
    narrations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narration(text: &str, start: Option<f64>) -> Narration {
        Narration {
            participant_id: "P01".to_string(),
            video_id: "P01-a".to_string(),
            narration: text.to_string(),
            start_timestamp: start,
            end_timestamp: start.map(|s| s + 1.0),
        }
    }

    fn texts(narrations: &[Narration]) -> Vec<&str> {
        narrations.iter().map(|n| n.narration.as_str()).collect()
    }

    #[test]
    fn picks_three_earliest_regardless_of_order() {
        let rows = vec![
            narration("e", Some(40.0)),
            narration("b", Some(7.5)),
            narration("d", Some(30.0)),
            narration("a", Some(1.0)),
            narration("c", Some(12.0)),
        ];

        let mut reversed = rows.clone();
        reversed.reverse();

        assert_eq!(texts(&earliest(rows, 3)), vec!["a", "b", "c"]);
        assert_eq!(texts(&earliest(reversed, 3)), vec!["a", "b", "c"]);
    }

    #[test]
    fn undefined_starts_sort_last_and_ties_are_stable() {
        let rows = vec![
            narration("none", None),
            narration("x", Some(2.0)),
            narration("y", Some(2.0)),
        ];
        assert_eq!(texts(&earliest(rows, 5)), vec!["x", "y", "none"]);
    }

    #[test]
    fn n_larger_than_rows_returns_all() {
        let rows = vec![narration("only", Some(0.0))];
        assert_eq!(earliest(rows, 3).len(), 1);
        assert!(earliest(Vec::new(), 3).is_empty());
    }
}
