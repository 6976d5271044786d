use crate::audio::SoundKey;
use crate::model::{Action, Polarity, Student};
use serde::Serialize;

/// Applies one action to one student record.
///
/// `points` always moves by `delta`. A delta of zero or more feeds
/// `plus_count`; a negative delta feeds `minus_count` by its magnitude.
pub fn apply_action(student: &Student, action: &Action) -> Student {
    let mut next = student.clone();
    next.points = next.points.saturating_add(action.delta);
    if action.delta >= 0 {
        next.plus_count = next.plus_count.saturating_add(action.delta as u64);
    } else {
        next.minus_count = next.minus_count.saturating_add(action.delta.unsigned_abs());
    }
    next
}

/// Derived feedback for one committed action. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSummary {
    pub target_count: usize,
    pub first_target_id: String,
    pub first_target_name: String,
    pub first_target_pokemon_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_target_points_after: Option<i64>,
    pub delta: i64,
    pub label: String,
    pub polarity: Polarity,
}

impl ScoringSummary {
    /// `first` is the first target's record before the action.
    pub fn new(first: &Student, target_count: usize, action: &Action) -> Self {
        Self {
            target_count,
            first_target_id: first.id.clone(),
            first_target_name: first.name.clone(),
            first_target_pokemon_id: first.pokemon_id,
            first_target_points_after: (target_count == 1)
                .then(|| first.points.saturating_add(action.delta)),
            delta: action.delta,
            label: action.label_primary.clone(),
            polarity: action.polarity,
        }
    }

    /// Batch positive actions get applause instead of the single-target chime.
    pub fn sound(&self) -> SoundKey {
        match self.polarity {
            Polarity::Negative => SoundKey::Lose,
            Polarity::Positive if self.target_count > 1 => SoundKey::Clap,
            Polarity::Positive => SoundKey::Win,
        }
    }

    pub fn points_change(&self) -> String {
        if self.delta >= 0 {
            format!("+{}", self.delta)
        } else {
            self.delta.to_string()
        }
    }

    pub fn names(&self) -> String {
        if self.target_count > 1 {
            format!("{} + {} 位學生", self.first_target_name, self.target_count - 1)
        } else {
            self.first_target_name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog_action;
    use proptest::prelude::*;

    fn student(id: &str, points: i64, plus: u64, minus: u64) -> Student {
        Student {
            id: id.to_string(),
            name: format!("S{id}"),
            points,
            plus_count: plus,
            minus_count: minus,
            pokemon_id: 1,
        }
    }

    #[test]
    fn negative_delta_feeds_minus_count() {
        let s = student("1", 0, 0, 0);
        let after = apply_action(&s, &Action::manual(-3));
        assert_eq!(after.points, -3);
        assert_eq!(after.plus_count, 0);
        assert_eq!(after.minus_count, 3);
        assert_eq!(after.id, "1");
    }

    #[test]
    fn zero_manual_entry_counts_as_positive_without_moving_counts() {
        let s = student("1", 4, 2, 1);
        let action = Action::manual(0);
        assert_eq!(action.polarity, Polarity::Positive);
        let after = apply_action(&s, &action);
        assert_eq!(after, s);
    }

    #[test]
    fn summary_reports_points_after_only_for_single_target() {
        let s = student("9", 10, 0, 0);
        let action = catalog_action(Polarity::Positive, 7).expect("amazing");
        let single = ScoringSummary::new(&s, 1, &action);
        assert_eq!(single.first_target_points_after, Some(20));
        assert_eq!(single.sound(), SoundKey::Win);
        assert_eq!(single.points_change(), "+10");
        assert_eq!(single.names(), "S9");

        let batch = ScoringSummary::new(&s, 3, &action);
        assert_eq!(batch.first_target_points_after, None);
        assert_eq!(batch.sound(), SoundKey::Clap);
        assert_eq!(batch.names(), "S9 + 2 位學生");

        let lose = ScoringSummary::new(&s, 3, &Action::manual(-1));
        assert_eq!(lose.sound(), SoundKey::Lose);
        assert_eq!(lose.points_change(), "-1");
    }

    proptest! {
        #[test]
        fn exactly_one_counter_moves(
            points in -10_000i64..10_000,
            plus in 0u64..10_000,
            minus in 0u64..10_000,
            delta in -1_000i64..1_000,
        ) {
            let before = student("1", points, plus, minus);
            let after = apply_action(&before, &Action::manual(delta));
            prop_assert_eq!(after.points, points + delta);
            if delta >= 0 {
                prop_assert_eq!(after.plus_count, plus + delta as u64);
                prop_assert_eq!(after.minus_count, minus);
            } else {
                prop_assert_eq!(after.plus_count, plus);
                prop_assert_eq!(after.minus_count, minus + delta.unsigned_abs());
            }
        }
    }
}
