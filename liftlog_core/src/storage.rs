//! Workout persistence backed by a JSONL (JSON Lines) log.
//!
//! Each committed workout is appended as a single line holding its header and
//! set records together, under an exclusive file lock. One line lands or
//! nothing does, which gives the commit adapter its all-or-nothing contract
//! without a transaction layer.

use crate::types::{SavedWorkout, SetRecord, WorkoutRecord};
use crate::Result;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Atomic sink for committed workouts
pub trait WorkoutStore {
    /// Persist the header and its set records as a single unit:
    /// either all records land or none do.
    fn persist_workout(
        &mut self,
        header: &WorkoutRecord,
        sets: &[SetRecord],
    ) -> Result<SavedWorkout>;
}

/// One persisted workout, as stored on a JSONL line
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistedWorkout {
    pub workout: WorkoutRecord,
    pub sets: Vec<SetRecord>,
}

/// JSONL-backed workout store with file locking
pub struct JsonlWorkoutStore {
    path: PathBuf,
}

impl JsonlWorkoutStore {
    /// Create a store appending to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl WorkoutStore for JsonlWorkoutStore {
    fn persist_workout(
        &mut self,
        header: &WorkoutRecord,
        sets: &[SetRecord],
    ) -> Result<SavedWorkout> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Exclusive lock serializes concurrent writers
        file.lock_exclusive()?;

        let entry = PersistedWorkout {
            workout: header.clone(),
            sets: sets.to_vec(),
        };
        let line = serde_json::to_string(&entry)?;

        let mut writer = std::io::BufWriter::new(&file);
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!(workout_id = %header.id, "appended workout to log");
        Ok(SavedWorkout {
            workout_id: header.id,
            sets: entry.sets,
        })
    }
}

/// Read all persisted workouts from a log file.
///
/// Unparseable lines are skipped with a warning rather than failing the
/// whole read.
pub fn read_workouts(path: &Path) -> Result<Vec<PersistedWorkout>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut workouts = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<PersistedWorkout>(&line) {
            Ok(entry) => workouts.push(entry),
            Err(e) => {
                tracing::warn!("Failed to parse workout at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} workouts from log", workouts.len());
    Ok(workouts)
}
