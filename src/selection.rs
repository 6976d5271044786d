use indexmap::IndexSet;
use serde::Serialize;

/// Who the next scoring action lands on. Single and multi targeting are
/// mutually exclusive. A multi selection keeps click order, so its first
/// member is the student toggled in first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Single(String),
    Multi(IndexSet<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionPhase {
    Idle,
    Single,
    MultiEmpty,
    MultiNonEmpty,
}

impl Selection {
    pub fn phase(&self) -> SelectionPhase {
        match self {
            Selection::None => SelectionPhase::Idle,
            Selection::Single(_) => SelectionPhase::Single,
            Selection::Multi(set) if set.is_empty() => SelectionPhase::MultiEmpty,
            Selection::Multi(_) => SelectionPhase::MultiNonEmpty,
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Selection::Multi(_))
    }

    /// Direct click or completed draw. Leaves multi mode if it was active.
    pub fn select_single(&mut self, id: impl Into<String>) {
        *self = Selection::Single(id.into());
    }

    /// Enters multi mode from anywhere else; leaving it clears everything.
    pub fn toggle_multi_mode(&mut self) {
        *self = match self {
            Selection::Multi(_) => Selection::None,
            _ => Selection::Multi(IndexSet::new()),
        };
    }

    /// Returns false when not in multi mode.
    pub fn toggle_member(&mut self, id: &str) -> bool {
        let Selection::Multi(set) = self else {
            return false;
        };
        if !set.shift_remove(id) {
            set.insert(id.to_string());
        }
        true
    }

    /// Deselects everything when the set already covers `roster_ids`,
    /// otherwise selects all of them in roster order. Enters multi mode if
    /// needed.
    pub fn toggle_select_all<'a, I>(&mut self, roster_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let all: IndexSet<String> = roster_ids.into_iter().map(str::to_string).collect();
        let covered = matches!(self, Selection::Multi(set) if *set == all);
        *self = if covered {
            Selection::Multi(IndexSet::new())
        } else {
            Selection::Multi(all)
        };
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    /// Ids an action would be applied to right now.
    pub fn targets(&self) -> Vec<String> {
        match self {
            Selection::None => Vec::new(),
            Selection::Single(id) => vec![id.clone()],
            Selection::Multi(set) => set.iter().cloned().collect(),
        }
    }

    /// After an action commits: batches exit multi mode, a single target
    /// stays selected.
    pub fn after_commit(&mut self) {
        if self.is_multi() {
            *self = Selection::None;
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "phase": self.phase(),
            "multi": self.is_multi(),
            "studentIds": self.targets(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: [&str; 3] = ["1", "2", "3"];

    #[test]
    fn entering_multi_clears_single_and_back() {
        let mut sel = Selection::default();
        sel.select_single("2");
        assert_eq!(sel.phase(), SelectionPhase::Single);

        sel.toggle_multi_mode();
        assert_eq!(sel.phase(), SelectionPhase::MultiEmpty);
        assert!(sel.targets().is_empty());

        assert!(sel.toggle_member("1"));
        assert_eq!(sel.phase(), SelectionPhase::MultiNonEmpty);
        assert!(sel.toggle_member("1"));
        assert_eq!(sel.phase(), SelectionPhase::MultiEmpty);

        sel.toggle_member("3");
        sel.toggle_multi_mode();
        assert_eq!(sel, Selection::None);
    }

    #[test]
    fn toggle_member_outside_multi_is_ignored() {
        let mut sel = Selection::Single("1".into());
        assert!(!sel.toggle_member("2"));
        assert_eq!(sel.targets(), vec!["1".to_string()]);
    }

    #[test]
    fn select_all_after_toggling_everyone_deselects_then_reselects() {
        let mut sel = Selection::default();
        sel.toggle_multi_mode();
        for id in IDS {
            sel.toggle_member(id);
        }
        sel.toggle_select_all(IDS);
        assert_eq!(sel.phase(), SelectionPhase::MultiEmpty);
        sel.toggle_select_all(IDS);
        assert_eq!(sel.targets(), vec!["1", "2", "3"]);
    }

    #[test]
    fn multi_targets_keep_click_order() {
        let mut sel = Selection::default();
        sel.toggle_multi_mode();
        for id in ["2", "10", "1"] {
            sel.toggle_member(id);
        }
        assert_eq!(sel.targets(), vec!["2", "10", "1"]);

        sel.toggle_member("10");
        sel.toggle_member("10");
        assert_eq!(sel.targets(), vec!["2", "1", "10"]);
    }

    #[test]
    fn select_all_follows_roster_order_and_ignores_click_order() {
        let roster = ["3", "1", "2"];
        let mut sel = Selection::default();
        sel.toggle_multi_mode();
        for id in ["2", "1", "3"] {
            sel.toggle_member(id);
        }
        // Same members in a different order still count as everyone.
        sel.toggle_select_all(roster);
        assert_eq!(sel.phase(), SelectionPhase::MultiEmpty);
        sel.toggle_select_all(roster);
        assert_eq!(sel.targets(), vec!["3", "1", "2"]);
    }

    #[test]
    fn batch_commit_exits_multi_but_single_stays() {
        let mut sel = Selection::Multi(IDS.iter().map(|s| s.to_string()).collect());
        sel.after_commit();
        assert_eq!(sel, Selection::None);

        let mut single = Selection::Single("2".into());
        single.after_commit();
        assert_eq!(single.phase(), SelectionPhase::Single);
    }
}
