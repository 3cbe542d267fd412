use clap::{Parser, Subcommand};
use liftlog_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Workout logging from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout interactively (default)
    Log,

    /// Show committed workouts, newest first
    History {
        /// Maximum number of workouts to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// List known exercises
    Exercises,
}

fn main() -> Result<()> {
    // Initialize logging
    liftlog_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory: {:?}", data_dir);

    match cli.command {
        Some(Commands::History { limit }) => cmd_history(data_dir, limit, &config),
        Some(Commands::Exercises) => cmd_exercises(data_dir),
        Some(Commands::Log) | None => cmd_log(data_dir, &config),
    }
}

fn log_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("workouts.jsonl")
}

fn load_catalog(data_dir: &std::path::Path) -> Result<InMemoryCatalog> {
    let mut catalog = build_default_catalog();
    catalog.load_custom(&data_dir.join("exercises.json"))?;

    let errors = catalog.validate();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("Catalog problem: {}", error);
        }
        return Err(Error::Config("invalid exercise catalog".into()));
    }
    Ok(catalog)
}

fn cmd_log(data_dir: PathBuf, config: &Config) -> Result<()> {
    std::fs::create_dir_all(&data_dir)?;
    let catalog = load_catalog(&data_dir)?;
    let mut store = JsonlWorkoutStore::new(log_path(&data_dir));
    let mut sessions = SessionStore::new();
    let unit = config.units.preferred_weight_unit;

    println!("liftlog — type 'start' to begin a workout, 'help' for commands");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        match command {
            "start" => {
                if sessions.start_workout() {
                    println!("Workout started. Add an exercise with 'add <exercise-id>'.");
                } else {
                    println!("Already mid-workout — 'finish' or 'discard' it first.");
                }
            }

            "add" => match args.first() {
                Some(id) => match catalog.exercise_by_id(id) {
                    Some(definition) => {
                        if !sessions.is_active() {
                            println!("No active workout. 'start' one first.");
                            continue;
                        }
                        sessions.add_exercise(definition);
                        println!("Added {}.", definition.name);
                    }
                    None => println!("Unknown exercise '{}'. See 'liftlog exercises'.", id),
                },
                None => println!("Usage: add <exercise-id>"),
            },

            "drop" => match args.first() {
                Some(id) => sessions.remove_exercise(id),
                None => println!("Usage: drop <exercise-id>"),
            },

            // set <exercise-id> [<weight> <reps>] — omitted values carry
            // forward from the previous set. Sets start incomplete; 'done'
            // marks them finished.
            "set" => {
                let Some(id) = args.first() else {
                    println!("Usage: set <exercise-id> [<weight> <reps>]");
                    continue;
                };
                let patch = match parse_weight_reps(&args[1..]) {
                    Ok((weight, reps)) => SetPatch {
                        logged_weight: weight,
                        logged_reps: reps,
                        ..SetPatch::default()
                    },
                    Err(msg) => {
                        println!("{}", msg);
                        continue;
                    }
                };
                record_set(&mut sessions, id, patch, unit);
            }

            // done <exercise-id> — mark the exercise's last set completed
            "done" => match args.first() {
                Some(id) => {
                    let last = sessions
                        .active()
                        .and_then(|w| w.exercise(id))
                        .and_then(|e| e.last_set())
                        .map(|s| (s.local_id, s.position_in_exercise));
                    match last {
                        Some((set_id, position)) => {
                            sessions.update_set(
                                id,
                                set_id,
                                SetPatch {
                                    completed: Some(true),
                                    ..SetPatch::default()
                                },
                            );
                            println!("Set {} of {} marked done.", position + 1, id);
                        }
                        None => println!("No sets logged for '{}' yet.", id),
                    }
                }
                None => println!("Usage: done <exercise-id>"),
            },

            // amrap <exercise-id> <weight> <reps> [secs] — timed AMRAP set
            "amrap" => {
                let Some(id) = args.first() else {
                    println!("Usage: amrap <exercise-id> <weight> <reps> [secs]");
                    continue;
                };
                let (weight, reps) = match parse_weight_reps(&args[1..3.min(args.len())]) {
                    Ok(parsed) => parsed,
                    Err(msg) => {
                        println!("{}", msg);
                        continue;
                    }
                };
                let kind = match args.get(3).map(|s| s.parse::<u32>()) {
                    Some(Ok(secs)) if secs > 0 => SetKind::AmrapTime {
                        target_duration_secs: secs,
                    },
                    Some(_) => {
                        println!("Duration must be a positive number of seconds");
                        continue;
                    }
                    None => SetKind::amrap_time(),
                };
                let patch = SetPatch {
                    kind: Some(kind),
                    logged_weight: weight,
                    logged_reps: reps,
                    ..SetPatch::default()
                };
                record_set(&mut sessions, id, patch, unit);
            }

            "undo" => match args.first() {
                Some(id) => {
                    let last = sessions
                        .active()
                        .and_then(|w| w.exercise(id))
                        .and_then(|e| e.last_set())
                        .map(|s| s.local_id);
                    match last {
                        Some(set_id) => {
                            sessions.remove_set(id, set_id);
                            println!("Removed last set of {}.", id);
                        }
                        None => println!("No sets to remove for '{}'.", id),
                    }
                }
                None => println!("Usage: undo <exercise-id>"),
            },

            "name" => sessions.update_workout_name(args.join(" ")),
            "note" => sessions.update_workout_notes(args.join(" ")),

            "rest" => {
                let secs = match args.first().map(|s| s.parse::<u32>()) {
                    Some(Ok(secs)) if secs > 0 => secs,
                    Some(_) => {
                        println!("Usage: rest [secs]");
                        continue;
                    }
                    None => config.timer.default_rest_secs,
                };
                run_rest_timer(secs)?;
            }

            "status" => print_status(&sessions, unit),

            "finish" => {
                if !sessions.is_active() {
                    println!("No active workout.");
                    continue;
                }
                match sessions.complete_workout(&mut store) {
                    Ok(saved) => {
                        println!(
                            "✓ Workout saved ({} sets, id {})",
                            saved.sets.len(),
                            saved.workout_id
                        );
                    }
                    Err(e) => {
                        // Session is preserved; fix the data and finish again
                        println!("Could not save workout: {}", e);
                    }
                }
            }

            "discard" => {
                sessions.discard_workout();
                println!("Workout discarded.");
            }

            "help" => print_help(),

            "quit" | "exit" => break,

            other => println!("Unknown command '{}'. Try 'help'.", other),
        }
    }

    if sessions.is_active() {
        println!("Discarding unfinished workout (in-progress sessions are not kept).");
        sessions.discard_workout();
    }

    Ok(())
}

fn parse_weight_reps(args: &[&str]) -> std::result::Result<(Option<f64>, Option<u32>), String> {
    match args {
        [] => Ok((None, None)),
        [weight, reps, ..] => {
            let weight: f64 = weight
                .parse()
                .map_err(|_| format!("'{}' is not a weight", weight))?;
            let reps: u32 = reps
                .parse()
                .map_err(|_| format!("'{}' is not a rep count", reps))?;
            Ok((Some(weight), Some(reps)))
        }
        [only] => Err(format!(
            "Need both weight and reps (or neither), got just '{}'",
            only
        )),
    }
}

fn record_set(sessions: &mut SessionStore, exercise_id: &str, patch: SetPatch, unit: WeightUnit) {
    if !sessions.is_active() {
        println!("No active workout. 'start' one first.");
        return;
    }
    if sessions.active().and_then(|w| w.exercise(exercise_id)).is_none() {
        println!("'{}' is not in this workout. 'add {}' first.", exercise_id, exercise_id);
        return;
    }
    if sessions.add_set(exercise_id, patch).is_none() {
        return;
    }
    let last = sessions
        .active()
        .and_then(|w| w.exercise(exercise_id))
        .and_then(|e| e.last_set());
    if let Some(set) = last {
        println!(
            "Set {}: {} {} x {} [{}]",
            set.position_in_exercise + 1,
            set.logged_weight,
            unit.suffix(),
            set.logged_reps,
            set.kind.label()
        );
    }
}

fn run_rest_timer(secs: u32) -> Result<()> {
    let mut engine = TimerEngine::countdown(secs);
    engine.start();
    println!("Resting {}s — Ctrl-C to bail out", secs);

    while engine.wants_tick() {
        std::thread::sleep(std::time::Duration::from_millis(200));
        if engine.tick() {
            println!("\r  00:00 — back to work!");
            return Ok(());
        }
        print!("\r  {} ", engine.display_time());
        io::stdout().flush()?;
    }
    Ok(())
}

fn print_status(sessions: &SessionStore, unit: WeightUnit) {
    let Some(workout) = sessions.active() else {
        println!("No active workout.");
        return;
    };

    println!(
        "Workout started {}",
        workout.started_at.format("%Y-%m-%d %H:%M UTC")
    );
    if let Some(name) = &workout.name {
        println!("  Name: {}", name);
    }
    for exercise in &workout.exercises {
        println!("  {}. {}", exercise.position + 1, exercise.definition.name);
        for set in &exercise.sets {
            let mark = if set.completed { "✓" } else { " " };
            println!(
                "     {} {} {} x {} [{}]",
                mark,
                set.logged_weight,
                unit.suffix(),
                set.logged_reps,
                set.kind.label()
            );
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  start                          begin a workout");
    println!("  add <exercise-id>              add an exercise");
    println!("  set <id> [<weight> <reps>]     log a set (omit values to repeat last)");
    println!("  amrap <id> <weight> <reps> [secs]  log a timed AMRAP set");
    println!("  done <id>                      mark the exercise's last set completed");
    println!("  undo <id>                      remove the exercise's last set");
    println!("  drop <id>                      remove an exercise");
    println!("  name/note <text>               name or annotate the workout");
    println!("  rest [secs]                    run a rest countdown");
    println!("  status                         show the session so far");
    println!("  finish / discard               commit or throw away the workout");
    println!("  quit                           leave (unfinished work is discarded)");
}

fn cmd_history(data_dir: PathBuf, limit: usize, config: &Config) -> Result<()> {
    let workouts = read_workouts(&log_path(&data_dir))?;
    if workouts.is_empty() {
        println!("No workouts logged yet.");
        return Ok(());
    }
    let unit = config.units.preferred_weight_unit;

    for entry in workouts.iter().rev().take(limit) {
        let header = &entry.workout;
        let minutes = header.duration_ms / 60_000;
        println!(
            "{}  {}  ({} min, {} sets)",
            header.started_at.format("%Y-%m-%d %H:%M"),
            header.name.as_deref().unwrap_or("Workout"),
            minutes,
            entry.sets.len()
        );
        for set in &entry.sets {
            println!(
                "    {}  {} {} x {} [{}]",
                set.exercise_id,
                set.detail.logged_weight(),
                unit.suffix(),
                set.detail.logged_reps(),
                set.detail.label()
            );
        }
    }
    Ok(())
}

fn cmd_exercises(data_dir: PathBuf) -> Result<()> {
    let catalog = load_catalog(&data_dir)?;
    for exercise in catalog.all_exercises() {
        let custom = if exercise.is_custom { " (custom)" } else { "" };
        println!(
            "{:<22} {}{}  [{}]",
            exercise.id,
            exercise.name,
            custom,
            exercise.equipment.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
