//! One teacher session over the roster store: active class, sort order,
//! selection, the no-repeat picker and the two timed sequences.

use crate::audio::{AudioSink, SoundKey};
use crate::config::Config;
use crate::exchange::{self, ImportError};
use crate::model::{ClassRoster, Action, Student};
use crate::picker::{self, DrawState};
use crate::scoring::{self, ScoringSummary};
use crate::seed;
use crate::selection::Selection;
use crate::sort::{self, NameCollator, SortCriterion};
use crate::store::{RosterStore, StoreError};
use crate::timers::{Clock, DrawAnimation, DrawPhase, DrawStep, Expiring};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("no class is active")]
    NoActiveClass,

    #[error("class not found: {0}")]
    ClassNotFound(String),

    #[error("student not found: {0}")]
    StudentNotFound(String),

    #[error("the active class has no students")]
    EmptyRoster,

    #[error("multi-select mode is not active")]
    NotMultiSelect,

    #[error("avatar id {0} is out of range")]
    AvatarOutOfRange(u32),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("export failed: {0:#}")]
    Export(anyhow::Error),
}

impl BoardError {
    pub fn code(&self) -> &'static str {
        match self {
            BoardError::NoActiveClass => "no_active_class",
            BoardError::ClassNotFound(_) | BoardError::StudentNotFound(_) => "not_found",
            BoardError::EmptyRoster => "empty_roster",
            BoardError::NotMultiSelect => "not_multi_select",
            BoardError::AvatarOutOfRange(_) => "bad_params",
            BoardError::Store(StoreError::ClassNotFound(_)) => "not_found",
            BoardError::Store(StoreError::Persist(_)) => "storage_failed",
            BoardError::Import(_) => "import_failed",
            BoardError::Export(_) => "export_failed",
        }
    }
}

/// Transient feedback shown after an action commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Splash {
    pub names: String,
    pub action_label: String,
    pub points_change: String,
    pub is_positive: bool,
    pub pokemon_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_points: Option<i64>,
}

impl From<&ScoringSummary> for Splash {
    fn from(s: &ScoringSummary) -> Self {
        let single = s.target_count == 1;
        Self {
            names: s.names(),
            action_label: s.label.clone(),
            points_change: s.points_change(),
            is_positive: s.polarity.is_positive(),
            pokemon_id: s.first_target_pokemon_id,
            id: single.then(|| s.first_target_id.clone()),
            count: s.target_count,
            final_points: s.first_target_points_after,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedStudent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(flatten)]
    pub student: Student,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub rolled: Vec<Student>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committed: Option<Student>,
    pub splash_cleared: bool,
}

pub struct Board {
    config: Config,
    store: RosterStore,
    active: Option<String>,
    sort: SortCriterion,
    collator: NameCollator,
    selection: Selection,
    draws: DrawState,
    animation: DrawAnimation,
    /// Candidate on screen during a spin; the one committed when it settles.
    last_rolled: Option<String>,
    splash: Expiring<Splash>,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl Board {
    pub fn new(config: Config, store: RosterStore, clock: Box<dyn Clock>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let active = store.rosters().first().map(|c| c.class_name.clone());
        let collator = NameCollator::new(&config.collation_locale);
        tracing::debug!(locale = collator.locale(), active = ?active, "board ready");
        Self {
            collator,
            animation: DrawAnimation::new(
                config.draw_tick_ms,
                config.draw_ticks,
                config.draw_settle_ms,
            ),
            last_rolled: None,
            splash: Expiring::new(config.splash_ms),
            config,
            store,
            active,
            sort: SortCriterion::default(),
            selection: Selection::default(),
            draws: DrawState::default(),
            clock,
            rng,
        }
    }

    /// Default seed rosters for a fresh workspace.
    pub fn seed_rosters(config: &Config) -> Vec<ClassRoster> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        seed::default_rosters(config.pokemon_count, &mut rng)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn rosters(&self) -> &[ClassRoster] {
        self.store.rosters()
    }

    pub fn active_class_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_roster(&self) -> Result<&ClassRoster, BoardError> {
        let name = self.active.as_deref().ok_or(BoardError::NoActiveClass)?;
        self.store
            .roster(name)
            .ok_or_else(|| BoardError::ClassNotFound(name.to_string()))
    }

    pub fn sort(&self) -> SortCriterion {
        self.sort
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn draw_state(&self) -> &DrawState {
        &self.draws
    }

    pub fn draw_phase(&self) -> DrawPhase {
        self.animation.phase()
    }

    pub fn splash(&self) -> Option<&Splash> {
        self.splash.get()
    }

    /// Time left before the splash clears, if one is up.
    pub fn splash_remaining_ms(&self) -> Option<u64> {
        self.splash
            .expires_at()
            .map(|until| until.saturating_sub(self.clock.now_ms()))
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Active roster in display order; ranks only for the high-to-low sort.
    pub fn sorted_students(&self, criterion: SortCriterion) -> Result<Vec<RankedStudent>, BoardError> {
        let roster = self.active_roster()?;
        let sorted = sort::sort_students(&roster.students, criterion, &self.collator);
        let ranks = sort::display_ranks(sorted.len(), criterion);
        Ok(sorted
            .into_iter()
            .zip(ranks)
            .map(|(student, rank)| RankedStudent { rank, student })
            .collect())
    }

    // ── Roster switching ─────────────────────────────────────────────

    /// Switching classes drops selection, the draw cycle and any spin in
    /// flight.
    pub fn select_class(&mut self, class_name: &str) -> Result<(), BoardError> {
        if self.store.roster(class_name).is_none() {
            return Err(BoardError::ClassNotFound(class_name.to_string()));
        }
        self.active = Some(class_name.to_string());
        self.reset_session();
        tracing::debug!(class = class_name, "active class changed");
        Ok(())
    }

    pub fn set_sort(&mut self, criterion: SortCriterion) {
        self.sort = criterion;
    }

    fn reset_session(&mut self) {
        self.selection.clear();
        self.draws.reset();
        self.animation.cancel();
        self.last_rolled = None;
    }

    fn require_student(&self, student_id: &str) -> Result<&Student, BoardError> {
        self.active_roster()?
            .student(student_id)
            .ok_or_else(|| BoardError::StudentNotFound(student_id.to_string()))
    }

    // ── Selection ────────────────────────────────────────────────────

    pub fn select_single(&mut self, student_id: &str) -> Result<(), BoardError> {
        self.require_student(student_id)?;
        self.selection.select_single(student_id);
        Ok(())
    }

    pub fn toggle_multi_mode(&mut self) {
        self.selection.toggle_multi_mode();
    }

    pub fn toggle_member(&mut self, student_id: &str) -> Result<(), BoardError> {
        self.require_student(student_id)?;
        if !self.selection.toggle_member(student_id) {
            return Err(BoardError::NotMultiSelect);
        }
        Ok(())
    }

    pub fn toggle_select_all(&mut self) -> Result<(), BoardError> {
        let ids: Vec<String> = self
            .active_roster()?
            .students
            .iter()
            .map(|s| s.id.clone())
            .collect();
        self.selection.toggle_select_all(ids.iter().map(String::as_str));
        Ok(())
    }

    // ── Scoring ──────────────────────────────────────────────────────

    /// Applies `action` to the current targets. With nothing targeted the
    /// call is a no-op and returns `None`.
    pub fn apply_action(
        &mut self,
        action: &Action,
        audio: &mut dyn AudioSink,
    ) -> Result<Option<ScoringSummary>, BoardError> {
        let targets = self.selection.targets();
        let Some(first_id) = targets.first() else {
            return Ok(None);
        };
        let first = self.require_student(first_id)?.clone();
        let class_name = self.active_roster()?.class_name.clone();

        let ids: HashSet<String> = targets.iter().cloned().collect();
        let touched = self
            .store
            .apply_to_students(&class_name, &ids, |s| scoring::apply_action(s, action))?;

        let summary = ScoringSummary::new(&first, touched, action);
        self.splash.set(Splash::from(&summary), self.clock.now_ms());
        audio.play(summary.sound());
        self.selection.after_commit();

        tracing::info!(
            class = %class_name,
            targets = touched,
            delta = action.delta,
            label = %action.label_primary,
            "action applied"
        );
        Ok(Some(summary))
    }

    /// Free-form entry. Non-numeric input is not submitted.
    pub fn apply_manual(
        &mut self,
        input: &str,
        audio: &mut dyn AudioSink,
    ) -> Result<Option<ScoringSummary>, BoardError> {
        match Action::parse_manual(input) {
            Some(action) => self.apply_action(&action, audio),
            None => {
                tracing::debug!(input, "manual entry ignored");
                Ok(None)
            }
        }
    }

    pub fn set_avatar(&mut self, student_id: &str, pokemon_id: Option<u32>) -> Result<Student, BoardError> {
        self.require_student(student_id)?;
        let max = self.config.pokemon_count;
        let pokemon_id = match pokemon_id {
            Some(id) if (1..=max).contains(&id) => id,
            Some(id) => return Err(BoardError::AvatarOutOfRange(id)),
            None => seed::random_pokemon_id(max, &mut self.rng),
        };
        let class_name = self.active_roster()?.class_name.clone();
        let ids = HashSet::from([student_id.to_string()]);
        self.store.apply_to_students(&class_name, &ids, |s| Student {
            pokemon_id,
            ..s.clone()
        })?;
        Ok(self.require_student(student_id)?.clone())
    }

    // ── Picker ───────────────────────────────────────────────────────

    fn require_non_empty_roster(&self) -> Result<(), BoardError> {
        if self.active_roster()?.students.is_empty() {
            return Err(BoardError::EmptyRoster);
        }
        Ok(())
    }

    /// Commits one draw right away and targets the chosen student.
    pub fn draw_now(&mut self, audio: &mut dyn AudioSink) -> Result<Student, BoardError> {
        self.require_non_empty_roster()?;
        let name = self.active.clone().ok_or(BoardError::NoActiveClass)?;
        let roster = self
            .store
            .roster(&name)
            .ok_or_else(|| BoardError::ClassNotFound(name.clone()))?;
        let chosen = self
            .draws
            .draw(roster, &mut self.rng)
            .ok_or(BoardError::EmptyRoster)?;
        self.finish_draw(&name, chosen, audio)
    }

    fn finish_draw(
        &mut self,
        class_name: &str,
        chosen: Student,
        audio: &mut dyn AudioSink,
    ) -> Result<Student, BoardError> {
        audio.play(SoundKey::Clap);
        self.selection.select_single(chosen.id.clone());
        tracing::info!(class = %class_name, student = %chosen.id, picked = self.draws.picked_count(), "student drawn");
        Ok(chosen)
    }

    /// Commits the candidate the spin stopped on. Falls back to a fresh
    /// draw if that student is gone or is no longer eligible.
    fn settle_draw(&mut self, audio: &mut dyn AudioSink) -> Result<Student, BoardError> {
        let Some(last_id) = self.last_rolled.take() else {
            return self.draw_now(audio);
        };
        let name = self.active.clone().ok_or(BoardError::NoActiveClass)?;
        let roster = self
            .store
            .roster(&name)
            .ok_or_else(|| BoardError::ClassNotFound(name.clone()))?;
        let chosen = self
            .draws
            .pool(roster)
            .into_iter()
            .find(|s| s.id == last_id)
            .cloned();
        let Some(chosen) = chosen else {
            return self.draw_now(audio);
        };
        self.draws.commit(roster, &chosen.id);
        self.finish_draw(&name, chosen, audio)
    }

    /// Starts the spin. Returns false if one is already running.
    pub fn start_draw(&mut self) -> Result<bool, BoardError> {
        self.require_non_empty_roster()?;
        let started = self.animation.start(self.clock.now_ms());
        if started {
            self.last_rolled = None;
        }
        Ok(started)
    }

    pub fn reset_draws(&mut self) {
        self.draws.reset();
    }

    /// Brings the splash and the spin up to date with the clock.
    pub fn tick(&mut self, audio: &mut dyn AudioSink) -> Result<TickReport, BoardError> {
        let now = self.clock.now_ms();
        let mut report = TickReport {
            splash_cleared: self.splash.advance(now),
            ..TickReport::default()
        };

        for step in self.animation.advance(now) {
            match step {
                DrawStep::Rolled => {
                    let name = self.active.as_deref().ok_or(BoardError::NoActiveClass)?;
                    let roster = self
                        .store
                        .roster(name)
                        .ok_or_else(|| BoardError::ClassNotFound(name.to_string()))?;
                    let pool = self.draws.pool(roster);
                    if let Some(s) = picker::spin_sample(&pool, &mut self.rng) {
                        self.last_rolled = Some(s.id.clone());
                        report.rolled.push(s.clone());
                    }
                    audio.play(SoundKey::Roll);
                }
                DrawStep::Commit => {
                    report.committed = Some(self.settle_draw(audio)?);
                }
            }
        }
        Ok(report)
    }

    // ── Exchange ─────────────────────────────────────────────────────

    pub fn export_to(&self, dir: &Path) -> Result<PathBuf, BoardError> {
        let today = chrono::Local::now().date_naive();
        let snapshot = self.store.snapshot();
        let path = exchange::export_to_dir(dir, &self.config.export_prefix, today, &snapshot)
            .map_err(BoardError::Export)?;
        tracing::info!(path = %path.to_string_lossy(), classes = snapshot.len(), "rosters exported");
        Ok(path)
    }

    /// Replaces every roster with the file's contents. A file that does not
    /// parse leaves the board exactly as it was.
    pub fn import_from(&mut self, path: &Path) -> Result<usize, BoardError> {
        let rosters = match exchange::read_import_file(path) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(path = %path.to_string_lossy(), error = %e, "import rejected");
                return Err(e.into());
            }
        };
        let count = rosters.len();
        self.store.replace_all(rosters)?;
        self.active = self.store.rosters().first().map(|c| c.class_name.clone());
        self.reset_session();
        tracing::info!(classes = count, "rosters imported");
        Ok(count)
    }
}
