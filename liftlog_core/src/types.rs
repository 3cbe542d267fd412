//! Core domain types for Liftlog.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise definitions (catalog entries)
//! - The in-memory active-workout aggregate and its set kinds
//! - The persisted workout/set record shapes
//! - User-facing units

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Exercise Definitions
// ============================================================================

/// An exercise definition (e.g., "Bench Press")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDefinition {
    pub id: String,
    pub name: String,
    pub equipment: Option<String>,
    #[serde(default)]
    pub primary_muscle_groups: Vec<String>,
    pub notes: Option<String>,
    pub is_custom: bool,
}

/// Weight unit preference (display-only; logged weights are plain numbers)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

// ============================================================================
// Set Kinds
// ============================================================================

/// Default target duration for AMRAP-time sets, matching the timer engine's
/// default countdown.
pub const DEFAULT_AMRAP_DURATION_SECS: u32 = 60;

/// Kind of set being logged, carrying only the fields that kind requires.
///
/// Kind-specific data lives on the variant rather than as a bag of optional
/// fields, so an `AmrapTime` set without a target duration is unrepresentable.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SetKind {
    /// Fixed weight and reps
    #[default]
    Standard,
    /// As many reps as possible, open-ended
    AmrapReps,
    /// As many reps as possible within a target duration
    AmrapTime { target_duration_secs: u32 },
    /// A target rep count completed for time
    RepsForTime {
        target_reps: Option<u32>,
        logged_time_taken_secs: Option<u32>,
    },
}

impl SetKind {
    /// AMRAP-time kind with the default target duration
    pub fn amrap_time() -> Self {
        SetKind::AmrapTime {
            target_duration_secs: DEFAULT_AMRAP_DURATION_SECS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SetKind::Standard => "standard",
            SetKind::AmrapReps => "amrap_reps",
            SetKind::AmrapTime { .. } => "amrap_time",
            SetKind::RepsForTime { .. } => "reps_for_time",
        }
    }
}

// ============================================================================
// Active (in-memory) Aggregate
// ============================================================================
//
// These types are deliberately NOT serializable: an in-progress session lives
// only in memory and must pass through the commit adapter to reach storage.

/// A set being logged during an active session
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveSet {
    /// Ephemeral identifier, not the persisted id
    pub local_id: Uuid,
    /// 0-based order within the owning exercise
    pub position_in_exercise: u32,
    pub kind: SetKind,
    pub logged_weight: f64,
    pub logged_reps: u32,
    pub completed: bool,
    pub notes: Option<String>,
    pub target_weight: Option<f64>,
}

/// An exercise within an active session, with a snapshot of its definition
#[derive(Clone, Debug)]
pub struct ActiveExercise {
    /// Foreign key to the exercise-catalog definition
    pub exercise_id: String,
    /// Denormalized copy of the definition at add-time
    pub definition: ExerciseDefinition,
    /// 0-based order within the workout
    pub position: u32,
    pub sets: Vec<ActiveSet>,
}

impl ActiveExercise {
    pub fn set_by_id(&self, local_id: Uuid) -> Option<&ActiveSet> {
        self.sets.iter().find(|s| s.local_id == local_id)
    }

    /// The most recently added set, used for carry-forward defaults
    pub fn last_set(&self) -> Option<&ActiveSet> {
        self.sets.last()
    }
}

/// The single in-progress workout
#[derive(Clone, Debug)]
pub struct ActiveWorkout {
    pub started_at: DateTime<Utc>,
    pub name: Option<String>,
    pub notes: Option<String>,
    /// Insertion order is the workout's exercise sequence
    pub exercises: Vec<ActiveExercise>,
}

impl ActiveWorkout {
    pub fn exercise(&self, exercise_id: &str) -> Option<&ActiveExercise> {
        self.exercises.iter().find(|e| e.exercise_id == exercise_id)
    }

    pub(crate) fn exercise_mut(&mut self, exercise_id: &str) -> Option<&mut ActiveExercise> {
        self.exercises
            .iter_mut()
            .find(|e| e.exercise_id == exercise_id)
    }
}

// ============================================================================
// Persisted Record Shapes
// ============================================================================

/// Committed workout header record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub name: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_ms: i64,
    pub notes: Option<String>,
}

/// Kind-specific payload of a committed set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "set_type", rename_all = "snake_case")]
pub enum SetDetail {
    Standard {
        target_weight: Option<f64>,
        logged_weight: f64,
        logged_reps: u32,
    },
    AmrapReps {
        target_weight: Option<f64>,
        logged_weight: f64,
        logged_reps: u32,
    },
    AmrapTime {
        target_weight: Option<f64>,
        target_duration_secs: u32,
        logged_weight: f64,
        logged_reps: u32,
        logged_duration_secs: Option<u32>,
    },
    RepsForTime {
        target_weight: Option<f64>,
        target_reps: u32,
        logged_weight: f64,
        logged_reps: u32,
        logged_time_taken_secs: u32,
    },
}

impl SetDetail {
    pub fn logged_weight(&self) -> f64 {
        match self {
            SetDetail::Standard { logged_weight, .. }
            | SetDetail::AmrapReps { logged_weight, .. }
            | SetDetail::AmrapTime { logged_weight, .. }
            | SetDetail::RepsForTime { logged_weight, .. } => *logged_weight,
        }
    }

    pub fn logged_reps(&self) -> u32 {
        match self {
            SetDetail::Standard { logged_reps, .. }
            | SetDetail::AmrapReps { logged_reps, .. }
            | SetDetail::AmrapTime { logged_reps, .. }
            | SetDetail::RepsForTime { logged_reps, .. } => *logged_reps,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SetDetail::Standard { .. } => "standard",
            SetDetail::AmrapReps { .. } => "amrap_reps",
            SetDetail::AmrapTime { .. } => "amrap_time",
            SetDetail::RepsForTime { .. } => "reps_for_time",
        }
    }
}

/// Committed set record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetRecord {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_id: String,
    pub order_in_workout: u32,
    pub order_in_exercise: u32,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub detail: SetDetail,
}

/// Result of a successful commit
#[derive(Clone, Debug)]
pub struct SavedWorkout {
    pub workout_id: Uuid,
    pub sets: Vec<SetRecord>,
}
