//! Exercise catalog: built-in definitions plus user-defined extras.
//!
//! The session store only ever looks exercises up by id to snapshot them;
//! catalog editing lives outside the core.

use crate::types::ExerciseDefinition;
use crate::Result;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

/// Lookup interface the session layer snapshots definitions through
pub trait ExerciseCatalog {
    fn exercise_by_id(&self, id: &str) -> Option<&ExerciseDefinition>;

    /// All definitions, sorted by id for deterministic listing
    fn all_exercises(&self) -> Vec<&ExerciseDefinition>;
}

/// Cached built-in catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<InMemoryCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached built-in catalog
pub fn get_default_catalog() -> &'static InMemoryCatalog {
    &DEFAULT_CATALOG
}

/// Map-backed catalog of exercise definitions
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    exercises: HashMap<String, ExerciseDefinition>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a definition
    pub fn insert(&mut self, definition: ExerciseDefinition) {
        self.exercises.insert(definition.id.clone(), definition);
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Merge user-defined exercises from a JSON file into this catalog.
    ///
    /// The file holds an array of definitions; they are marked custom on the
    /// way in and shadow built-ins with the same id. A missing file is fine.
    pub fn load_custom(&mut self, path: &Path) -> Result<usize> {
        if !path.exists() {
            return Ok(0);
        }
        let contents = std::fs::read_to_string(path)?;
        let definitions: Vec<ExerciseDefinition> = serde_json::from_str(&contents)?;
        let count = definitions.len();
        for mut definition in definitions {
            definition.is_custom = true;
            self.insert(definition);
        }
        tracing::info!("Loaded {} custom exercises from {:?}", count, path);
        Ok(count)
    }

    /// Sanity-check the catalog, returning human-readable problems
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (key, definition) in &self.exercises {
            if definition.id.is_empty() || definition.id != *key {
                errors.push(format!("exercise key {:?} does not match its id", key));
            }
            if definition.name.trim().is_empty() {
                errors.push(format!("exercise {:?} has an empty name", key));
            }
        }
        errors
    }
}

impl ExerciseCatalog for InMemoryCatalog {
    fn exercise_by_id(&self, id: &str) -> Option<&ExerciseDefinition> {
        self.exercises.get(id)
    }

    fn all_exercises(&self) -> Vec<&ExerciseDefinition> {
        let mut all: Vec<_> = self.exercises.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}

/// Builds the catalog of built-in exercise definitions
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns
/// a cached reference. This function is retained for testing and custom
/// catalog creation.
pub fn build_default_catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();

    let builtin = |id: &str, name: &str, equipment: &str, groups: &[&str]| ExerciseDefinition {
        id: id.into(),
        name: name.into(),
        equipment: Some(equipment.into()),
        primary_muscle_groups: groups.iter().map(|g| (*g).into()).collect(),
        notes: None,
        is_custom: false,
    };

    // Push
    catalog.insert(builtin(
        "bench_press",
        "Bench Press",
        "Barbell",
        &["Chest", "Triceps", "Shoulders"],
    ));
    catalog.insert(builtin(
        "incline_bench_press",
        "Incline Bench Press",
        "Barbell",
        &["Upper Chest", "Shoulders", "Triceps"],
    ));
    catalog.insert(builtin(
        "overhead_press",
        "Overhead Press",
        "Barbell",
        &["Shoulders", "Triceps"],
    ));
    catalog.insert(builtin(
        "dip",
        "Dip",
        "Bodyweight",
        &["Chest", "Triceps"],
    ));

    // Pull
    catalog.insert(builtin(
        "pull_up",
        "Pull-up",
        "Bodyweight",
        &["Back", "Biceps"],
    ));
    catalog.insert(builtin(
        "barbell_row",
        "Barbell Row",
        "Barbell",
        &["Back", "Biceps"],
    ));
    catalog.insert(builtin(
        "lat_pulldown",
        "Lat Pulldown",
        "Machine",
        &["Back", "Biceps"],
    ));

    // Legs
    catalog.insert(builtin(
        "back_squat",
        "Back Squat",
        "Barbell",
        &["Quads", "Glutes"],
    ));
    catalog.insert(builtin(
        "deadlift",
        "Deadlift",
        "Barbell",
        &["Hamstrings", "Glutes", "Back"],
    ));
    catalog.insert(builtin(
        "romanian_deadlift",
        "Romanian Deadlift",
        "Barbell",
        &["Hamstrings", "Glutes"],
    ));
    catalog.insert(builtin(
        "leg_press",
        "Leg Press",
        "Machine",
        &["Quads", "Glutes"],
    ));

    // Conditioning staples for timed sets
    catalog.insert(builtin(
        "kettlebell_swing",
        "Kettlebell Swing",
        "Kettlebell",
        &["Glutes", "Hamstrings"],
    ));
    catalog.insert(builtin(
        "burpee",
        "Burpee",
        "Bodyweight",
        &["Full Body"],
    ));

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = build_default_catalog();
        assert!(!catalog.is_empty());
        assert!(catalog.validate().is_empty());
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = build_default_catalog();
        let bench = catalog.exercise_by_id("bench_press").unwrap();
        assert_eq!(bench.name, "Bench Press");
        assert!(!bench.is_custom);
        assert!(catalog.exercise_by_id("does_not_exist").is_none());
    }

    #[test]
    fn test_all_exercises_sorted() {
        let catalog = build_default_catalog();
        let ids: Vec<_> = catalog.all_exercises().iter().map(|e| e.id.clone()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_load_custom_marks_and_shadows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("exercises.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "zercher_squat", "name": "Zercher Squat", "equipment": "Barbell",
                 "primary_muscle_groups": ["Quads", "Core"], "notes": null, "is_custom": false},
                {"id": "bench_press", "name": "Swiss Bar Bench", "equipment": "Swiss Bar",
                 "notes": null, "is_custom": false}
            ]"#,
        )
        .unwrap();

        let mut catalog = build_default_catalog();
        let count = catalog.load_custom(&path).unwrap();
        assert_eq!(count, 2);

        let zercher = catalog.exercise_by_id("zercher_squat").unwrap();
        assert!(zercher.is_custom);

        // Custom definition shadows the built-in
        assert_eq!(
            catalog.exercise_by_id("bench_press").unwrap().name,
            "Swiss Bar Bench"
        );
    }

    #[test]
    fn test_load_custom_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut catalog = InMemoryCatalog::new();
        let count = catalog
            .load_custom(&temp_dir.path().join("missing.json"))
            .unwrap();
        assert_eq!(count, 0);
    }
}
