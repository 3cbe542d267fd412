//! The single-slot active-workout session store.
//!
//! Owns the one in-progress [`ActiveWorkout`] and provides its mutation
//! operations plus the commit/discard lifecycle. All mutations are
//! synchronous single-step transitions; mutating while no session exists is
//! a silent no-op (guarded-button scenario, not an error).

use crate::clock::{Clock, SystemClock};
use crate::commit;
use crate::storage::WorkoutStore;
use crate::types::{
    ActiveExercise, ActiveSet, ActiveWorkout, ExerciseDefinition, SavedWorkout, SetKind,
};
use crate::{Error, Result};
use std::sync::Arc;
use uuid::Uuid;

/// Partial set values, used both to seed `add_set` and to merge in
/// `update_set`. Fields left `None` are untouched (or carry-forward
/// defaulted on add).
#[derive(Clone, Debug, Default)]
pub struct SetPatch {
    pub kind: Option<SetKind>,
    pub logged_weight: Option<f64>,
    pub logged_reps: Option<u32>,
    pub completed: Option<bool>,
    pub notes: Option<String>,
    pub target_weight: Option<f64>,
}

/// State container for the in-progress workout.
///
/// At most one [`ActiveWorkout`] exists at a time; every caller goes through
/// this store, so the single-session invariant cannot be bypassed.
pub struct SessionStore {
    clock: Arc<dyn Clock>,
    active: Option<ActiveWorkout>,
    /// Guards against a reentrant `complete_workout` while one is running
    commit_in_flight: bool,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            active: None,
            commit_in_flight: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveWorkout> {
        self.active.as_ref()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Begin a new session. If one is already in progress it is preserved
    /// untouched and `false` is returned, so the caller can tell the user
    /// they are still mid-workout.
    pub fn start_workout(&mut self) -> bool {
        if self.active.is_some() {
            tracing::warn!("start_workout called with a session already in progress");
            return false;
        }
        self.active = Some(ActiveWorkout {
            started_at: self.clock.now(),
            name: None,
            notes: None,
            exercises: Vec::new(),
        });
        tracing::info!("workout session started");
        true
    }

    /// Drop the session without persisting anything
    pub fn discard_workout(&mut self) {
        if self.active.take().is_some() {
            tracing::info!("workout session discarded");
        }
        self.commit_in_flight = false;
    }

    /// Finish the session: filter to completed sets, map them to persisted
    /// records and save everything through `store` as one atomic unit.
    ///
    /// On success the session is cleared. On validation or storage failure
    /// the session is left untouched so the caller can fix and retry; the
    /// error is returned. A second call while one is in flight fails with
    /// [`Error::CommitInFlight`].
    pub fn complete_workout(&mut self, store: &mut dyn WorkoutStore) -> Result<SavedWorkout> {
        if self.commit_in_flight {
            return Err(Error::CommitInFlight);
        }
        let workout = self.active.as_ref().ok_or(Error::NoActiveSession)?;

        self.commit_in_flight = true;
        let ended_at = self.clock.now();
        let result = commit::commit_workout(store, workout, ended_at);
        self.commit_in_flight = false;

        match result {
            Ok(saved) => {
                tracing::info!(workout_id = %saved.workout_id, sets = saved.sets.len(), "workout committed");
                self.active = None;
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!("workout commit failed, session preserved: {}", e);
                Err(e)
            }
        }
    }

    // ── Exercise mutations ───────────────────────────────────────────

    /// Append an exercise, snapshotting its definition. Adding an exercise
    /// already in the workout is a no-op.
    pub fn add_exercise(&mut self, definition: &ExerciseDefinition) {
        let Some(workout) = self.active.as_mut() else {
            return;
        };
        if workout.exercise(&definition.id).is_some() {
            tracing::debug!(exercise_id = %definition.id, "exercise already in workout, ignoring");
            return;
        }
        let position = workout.exercises.len() as u32;
        workout.exercises.push(ActiveExercise {
            exercise_id: definition.id.clone(),
            definition: definition.clone(),
            position,
            sets: Vec::new(),
        });
    }

    /// Remove an exercise and its sets, renumbering the remaining exercises
    /// contiguously from 0 in their original relative order.
    pub fn remove_exercise(&mut self, exercise_id: &str) {
        let Some(workout) = self.active.as_mut() else {
            return;
        };
        workout.exercises.retain(|e| e.exercise_id != exercise_id);
        for (index, exercise) in workout.exercises.iter_mut().enumerate() {
            exercise.position = index as u32;
        }
    }

    // ── Set mutations ────────────────────────────────────────────────

    /// Append a set to the given exercise, returning its local id.
    ///
    /// Values absent from `initial` are carried forward from the exercise's
    /// previous set (kind including any target duration, weights), falling
    /// back to zeroed standard values for the first set. This keeps
    /// consecutive sets of the same exercise from needing re-entry.
    pub fn add_set(&mut self, exercise_id: &str, initial: SetPatch) -> Option<Uuid> {
        let workout = self.active.as_mut()?;
        let exercise = workout.exercise_mut(exercise_id)?;

        let previous = exercise.last_set();
        let set = ActiveSet {
            local_id: Uuid::new_v4(),
            position_in_exercise: exercise.sets.len() as u32,
            kind: initial
                .kind
                .or_else(|| previous.map(|p| p.kind.clone()))
                .unwrap_or_default(),
            logged_weight: initial
                .logged_weight
                .or_else(|| previous.map(|p| p.logged_weight))
                .unwrap_or(0.0),
            logged_reps: initial.logged_reps.unwrap_or(0),
            completed: initial.completed.unwrap_or(false),
            notes: initial.notes,
            target_weight: initial
                .target_weight
                .or_else(|| previous.and_then(|p| p.target_weight)),
        };
        let local_id = set.local_id;
        exercise.sets.push(set);
        Some(local_id)
    }

    /// Merge the given fields into the matching set; `None` fields are
    /// untouched.
    pub fn update_set(&mut self, exercise_id: &str, set_local_id: Uuid, updates: SetPatch) {
        let Some(set) = self.set_mut(exercise_id, set_local_id) else {
            return;
        };
        if let Some(kind) = updates.kind {
            set.kind = kind;
        }
        if let Some(weight) = updates.logged_weight {
            set.logged_weight = weight;
        }
        if let Some(reps) = updates.logged_reps {
            set.logged_reps = reps;
        }
        if let Some(completed) = updates.completed {
            set.completed = completed;
        }
        if let Some(notes) = updates.notes {
            set.notes = Some(notes);
        }
        if let Some(target) = updates.target_weight {
            set.target_weight = Some(target);
        }
    }

    /// Remove a set, renumbering the exercise's remaining sets contiguously
    /// from 0.
    pub fn remove_set(&mut self, exercise_id: &str, set_local_id: Uuid) {
        let Some(workout) = self.active.as_mut() else {
            return;
        };
        let Some(exercise) = workout.exercise_mut(exercise_id) else {
            return;
        };
        exercise.sets.retain(|s| s.local_id != set_local_id);
        for (index, set) in exercise.sets.iter_mut().enumerate() {
            set.position_in_exercise = index as u32;
        }
    }

    // ── Notes ────────────────────────────────────────────────────────

    pub fn update_workout_notes(&mut self, notes: impl Into<String>) {
        if let Some(workout) = self.active.as_mut() {
            workout.notes = Some(notes.into());
        }
    }

    pub fn update_workout_name(&mut self, name: impl Into<String>) {
        if let Some(workout) = self.active.as_mut() {
            workout.name = Some(name.into());
        }
    }

    pub fn update_set_notes(&mut self, exercise_id: &str, set_local_id: Uuid, notes: impl Into<String>) {
        self.update_set(
            exercise_id,
            set_local_id,
            SetPatch {
                notes: Some(notes.into()),
                ..SetPatch::default()
            },
        );
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn set_mut(&mut self, exercise_id: &str, set_local_id: Uuid) -> Option<&mut ActiveSet> {
        self.active
            .as_mut()?
            .exercise_mut(exercise_id)?
            .sets
            .iter_mut()
            .find(|s| s.local_id == set_local_id)
    }
}
