#![forbid(unsafe_code)]

//! Core domain model and business logic for the Liftlog workout tracker.
//!
//! This crate provides:
//! - Domain types (exercise definitions, active sessions, persisted records)
//! - The drift-corrected workout timer engine
//! - The single-slot active-session store and its commit adapter
//! - Persistence (JSONL workout log) and the exercise catalog

pub mod types;
pub mod error;
pub mod clock;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod storage;
pub mod timer;
pub mod session;
pub mod commit;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, ExerciseCatalog, InMemoryCatalog};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use commit::commit_workout;
pub use session::{SessionStore, SetPatch};
pub use storage::{read_workouts, JsonlWorkoutStore, PersistedWorkout, WorkoutStore};
pub use timer::{TimerEngine, TimerMode, DEFAULT_COUNTDOWN_SECS};
