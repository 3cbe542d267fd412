//! Commit adapter: maps the in-memory aggregate to persisted records.
//!
//! Completed sets are translated to their kind-specific record shape,
//! validated, and handed to the [`WorkoutStore`] in a single call. An invalid
//! record anywhere rejects the whole payload before the store is touched, so
//! partially-invalid workouts never reach storage.

use crate::storage::WorkoutStore;
use crate::types::{ActiveWorkout, SavedWorkout, SetDetail, SetKind, SetRecord, WorkoutRecord};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Map, validate and atomically persist a finished workout.
pub fn commit_workout(
    store: &mut dyn WorkoutStore,
    workout: &ActiveWorkout,
    ended_at: DateTime<Utc>,
) -> Result<SavedWorkout> {
    let workout_id = Uuid::new_v4();
    let header = WorkoutRecord {
        id: workout_id,
        name: workout.name.clone(),
        started_at: workout.started_at,
        ended_at,
        duration_ms: (ended_at - workout.started_at).num_milliseconds(),
        notes: workout.notes.clone(),
    };
    let sets = map_completed_sets(workout, workout_id);

    validate_header(&header)?;
    for set in &sets {
        validate_set(set)?;
    }

    tracing::debug!(
        workout_id = %workout_id,
        sets = sets.len(),
        duration_ms = header.duration_ms,
        "persisting workout"
    );
    store.persist_workout(&header, &sets)
}

/// Translate every `completed` set into its persisted record shape.
/// Incomplete sets are dropped: in-progress entries do not become history.
pub fn map_completed_sets(workout: &ActiveWorkout, workout_id: Uuid) -> Vec<SetRecord> {
    let mut records = Vec::new();

    for exercise in &workout.exercises {
        for set in exercise.sets.iter().filter(|s| s.completed) {
            let detail = match &set.kind {
                SetKind::Standard => SetDetail::Standard {
                    target_weight: set.target_weight,
                    logged_weight: set.logged_weight,
                    logged_reps: set.logged_reps,
                },
                SetKind::AmrapReps => SetDetail::AmrapReps {
                    target_weight: set.target_weight,
                    logged_weight: set.logged_weight,
                    logged_reps: set.logged_reps,
                },
                SetKind::AmrapTime {
                    target_duration_secs,
                } => SetDetail::AmrapTime {
                    target_weight: set.target_weight,
                    target_duration_secs: *target_duration_secs,
                    logged_weight: set.logged_weight,
                    logged_reps: set.logged_reps,
                    // The target duration doubles as the logged one; a later
                    // stopwatch integration can record the true figure
                    logged_duration_secs: Some(*target_duration_secs),
                },
                SetKind::RepsForTime {
                    target_reps,
                    logged_time_taken_secs,
                } => SetDetail::RepsForTime {
                    target_weight: set.target_weight,
                    target_reps: target_reps.unwrap_or(set.logged_reps),
                    logged_weight: set.logged_weight,
                    logged_reps: set.logged_reps,
                    logged_time_taken_secs: logged_time_taken_secs.unwrap_or(0),
                },
            };

            records.push(SetRecord {
                id: Uuid::new_v4(),
                workout_id,
                exercise_id: exercise.exercise_id.clone(),
                order_in_workout: exercise.position,
                order_in_exercise: set.position_in_exercise,
                notes: set.notes.clone(),
                detail,
            });
        }
    }

    records
}

fn validate_header(header: &WorkoutRecord) -> Result<()> {
    if header.ended_at < header.started_at {
        return Err(Error::Validation(
            "workout end time precedes its start time".into(),
        ));
    }
    Ok(())
}

fn validate_set(record: &SetRecord) -> Result<()> {
    let context = |field: &str| {
        format!(
            "set {} of exercise {}: {}",
            record.order_in_exercise, record.exercise_id, field
        )
    };

    let check_weight = |value: f64, field: &str| -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::Validation(context(&format!(
                "{} must be a non-negative number, got {}",
                field, value
            ))));
        }
        Ok(())
    };

    check_weight(record.detail.logged_weight(), "logged_weight")?;

    let target_weight = match &record.detail {
        SetDetail::Standard { target_weight, .. }
        | SetDetail::AmrapReps { target_weight, .. }
        | SetDetail::AmrapTime { target_weight, .. }
        | SetDetail::RepsForTime { target_weight, .. } => *target_weight,
    };
    if let Some(target) = target_weight {
        check_weight(target, "target_weight")?;
    }

    match &record.detail {
        SetDetail::AmrapTime {
            target_duration_secs,
            logged_duration_secs,
            ..
        } => {
            if *target_duration_secs == 0 {
                return Err(Error::Validation(context(
                    "target_duration_secs must be positive",
                )));
            }
            if logged_duration_secs == &Some(0) {
                return Err(Error::Validation(context(
                    "logged_duration_secs must be positive when present",
                )));
            }
        }
        SetDetail::RepsForTime { target_reps, .. } => {
            if *target_reps == 0 {
                return Err(Error::Validation(context("target_reps must be positive")));
            }
        }
        SetDetail::Standard { .. } | SetDetail::AmrapReps { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActiveExercise, ActiveSet, ExerciseDefinition};

    fn workout_with_set(set: ActiveSet) -> ActiveWorkout {
        ActiveWorkout {
            started_at: Utc::now(),
            name: None,
            notes: None,
            exercises: vec![ActiveExercise {
                exercise_id: "ex1".into(),
                definition: ExerciseDefinition {
                    id: "ex1".into(),
                    name: "Bench Press".into(),
                    equipment: Some("Barbell".into()),
                    primary_muscle_groups: vec![],
                    notes: None,
                    is_custom: false,
                },
                position: 0,
                sets: vec![set],
            }],
        }
    }

    fn completed_set(kind: SetKind) -> ActiveSet {
        ActiveSet {
            local_id: Uuid::new_v4(),
            position_in_exercise: 0,
            kind,
            logged_weight: 100.0,
            logged_reps: 10,
            completed: true,
            notes: None,
            target_weight: None,
        }
    }

    /// Store that never gets called in rejection tests
    struct PanickingStore;

    impl WorkoutStore for PanickingStore {
        fn persist_workout(
            &mut self,
            _header: &WorkoutRecord,
            _sets: &[SetRecord],
        ) -> Result<SavedWorkout> {
            panic!("store must not be reached with an invalid payload");
        }
    }

    #[test]
    fn test_reps_for_time_defaults() {
        let workout = workout_with_set(completed_set(SetKind::RepsForTime {
            target_reps: None,
            logged_time_taken_secs: None,
        }));
        let records = map_completed_sets(&workout, Uuid::new_v4());

        match &records[0].detail {
            SetDetail::RepsForTime {
                target_reps,
                logged_time_taken_secs,
                ..
            } => {
                assert_eq!(*target_reps, 10); // Falls back to logged reps
                assert_eq!(*logged_time_taken_secs, 0);
            }
            other => panic!("expected reps_for_time, got {:?}", other),
        }
    }

    #[test]
    fn test_amrap_time_maps_duration_to_logged() {
        let workout = workout_with_set(completed_set(SetKind::AmrapTime {
            target_duration_secs: 90,
        }));
        let records = map_completed_sets(&workout, Uuid::new_v4());

        match &records[0].detail {
            SetDetail::AmrapTime {
                target_duration_secs,
                logged_duration_secs,
                ..
            } => {
                assert_eq!(*target_duration_secs, 90);
                assert_eq!(*logged_duration_secs, Some(90));
            }
            other => panic!("expected amrap_time, got {:?}", other),
        }
    }

    #[test]
    fn test_records_preserve_ordering_fields() {
        let mut workout = workout_with_set(completed_set(SetKind::Standard));
        let exercise = &mut workout.exercises[0];
        exercise.position = 2;
        let mut second = completed_set(SetKind::AmrapReps);
        second.position_in_exercise = 1;
        exercise.sets.push(second);

        let records = map_completed_sets(&workout, Uuid::new_v4());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].order_in_workout, 2);
        assert_eq!(records[0].order_in_exercise, 0);
        assert_eq!(records[1].order_in_exercise, 1);
    }

    #[test]
    fn test_invalid_weight_rejected_before_store() {
        let mut set = completed_set(SetKind::Standard);
        set.logged_weight = f64::NAN;
        let workout = workout_with_set(set);

        let err = commit_workout(&mut PanickingStore, &workout, Utc::now()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_zero_target_reps_rejected() {
        let mut set = completed_set(SetKind::RepsForTime {
            target_reps: None,
            logged_time_taken_secs: Some(30),
        });
        set.logged_reps = 0; // Default target falls back to 0, which is invalid
        let workout = workout_with_set(set);

        let err = commit_workout(&mut PanickingStore, &workout, Utc::now()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_end_before_start_rejected() {
        let workout = workout_with_set(completed_set(SetKind::Standard));
        let too_early = workout.started_at - chrono::Duration::seconds(1);

        let err = commit_workout(&mut PanickingStore, &workout, too_early).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
