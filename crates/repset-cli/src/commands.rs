use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use repset_cli::catalog::load_catalog;
use repset_cli::config::{data_dir, load_settings, save_settings, settings_path};
use repset_cli::summary::{history_table, routines_table, validation_table};
use repset_core::{LogNotifier, SessionDeps, SessionEngine, build_routine};
use repset_model::{RoutineDraft, RoutineSession};
use repset_persistence::{JsonFileStore, PersistenceError, WorkoutStore, upsert_routine};
use repset_validate::{DraftReport, gate_routine_save, validate_routine_draft};

use crate::cli::{Cli, RunArgs, SettingsArgs};

/// Open the file store under `--store` or the platform data folder.
fn open_store(cli: &Cli) -> Result<JsonFileStore> {
    let root = data_dir(cli.store.as_deref())?;
    fs::create_dir_all(&root).with_context(|| format!("create data directory {}", root.display()))?;
    Ok(JsonFileStore::new(root))
}

fn store_error(error: PersistenceError) -> anyhow::Error {
    match error.suggestion() {
        Some(suggestion) => anyhow::anyhow!("{} {suggestion}", error.user_message()),
        None => anyhow::anyhow!(error.user_message()),
    }
}

fn read_draft(path: &Path) -> Result<RoutineDraft> {
    let content = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse routine draft {}", path.display()))
}

pub async fn run_routines(cli: &Cli) -> Result<()> {
    let store = open_store(cli)?;
    let routines = store.get_routines().await.map_err(store_error)?;
    if routines.is_empty() {
        println!("No routines yet. Import one with `repset import <FILE>`.");
        return Ok(());
    }
    println!("{}", routines_table(&routines));
    Ok(())
}

/// Validate a draft and print the report. Returns whether it can be saved.
pub fn run_validate(path: &Path) -> Result<bool> {
    let draft = read_draft(path)?;
    let reports = validate_routine_draft(&draft);
    print_reports(&reports);
    Ok(!gate_routine_save(&reports).block_save)
}

fn print_reports(reports: &[DraftReport]) {
    if reports.is_empty() {
        println!("The draft has no exercises.");
        return;
    }
    println!("{}", validation_table(reports));
}

pub async fn run_import(cli: &Cli, path: &Path) -> Result<String> {
    let draft = read_draft(path)?;
    let reports = validate_routine_draft(&draft);
    let gate = gate_routine_save(&reports);
    if gate.block_save {
        print_reports(&reports);
        bail!(
            "exercises without a valid series: {}",
            gate.blocking_exercises.join(", ")
        );
    }

    let routine = build_routine(&draft, Uuid::new_v4().to_string(), Utc::now())
        .with_context(|| format!("build routine from {}", path.display()))?;
    let store = open_store(cli)?;
    let id = routine.id.clone();
    let title = routine.title.clone();
    upsert_routine(&store, routine)
        .await
        .map_err(store_error)
        .context("save routine")?;
    info!(routine_id = %id, "imported routine");
    println!("Imported \"{title}\" as {id}");
    Ok(id)
}

pub async fn run_history(cli: &Cli) -> Result<()> {
    let store = open_store(cli)?;
    let sessions = store
        .get_routine_sessions()
        .await
        .map_err(store_error)?;
    if sessions.is_empty() {
        println!("No sessions saved yet.");
        return Ok(());
    }
    println!("{}", history_table(&sessions));
    Ok(())
}

pub fn run_settings(cli: &Cli, args: &SettingsArgs) -> Result<()> {
    let mut settings = load_settings(cli.settings.as_deref());
    let changed = args.rpe_policy.is_some() || args.rest_step.is_some() || args.vibration.is_some();
    if let Some(policy) = args.rpe_policy {
        settings.rpe_policy = policy.into();
    }
    if let Some(step) = args.rest_step {
        settings.rest_adjust_step_seconds = step;
    }
    if let Some(vibration) = args.vibration {
        settings.vibration = vibration;
    }
    if changed {
        let path = match cli.settings.clone().or_else(settings_path) {
            Some(path) => path,
            None => bail!("could not determine settings path; pass --settings <PATH>"),
        };
        save_settings(&settings, &path)?;
        println!("Saved {}", path.display());
    }
    println!("rpe_policy = {}", settings.rpe_policy);
    println!("rest_adjust_step_seconds = {}", settings.rest_adjust_step_seconds);
    println!("vibration = {}", settings.vibration);
    Ok(())
}

/// Drive a session to the end: every series is completed, RPE prompts are
/// answered with `--rpe` (or the planned value) and countdowns run out.
pub async fn run_session(cli: &Cli, args: &RunArgs) -> Result<Option<RoutineSession>> {
    let span = info_span!("session", routine_id = %args.routine_id);
    drive_session(cli, args).instrument(span).await
}

async fn drive_session(cli: &Cli, args: &RunArgs) -> Result<Option<RoutineSession>> {
    let mut settings = load_settings(cli.settings.as_deref());
    if let Some(policy) = args.rpe_policy {
        settings.rpe_policy = policy.into();
    }
    let catalog = load_catalog(args.catalog.as_deref())?;
    let deps = SessionDeps::new(Arc::new(open_store(cli)?))
        .with_settings(Arc::new(settings))
        .with_catalog(Arc::new(catalog))
        .with_notifier(Arc::new(LogNotifier));

    let mut engine = SessionEngine::load(deps, &args.routine_id).await;
    let Some(routine) = engine.routine().cloned() else {
        bail!("routine {} not found", args.routine_id);
    };
    println!("Starting \"{}\"", routine.title);

    while !engine.routine_finished() {
        let Some(state) = engine.state() else {
            bail!("session ended unexpectedly");
        };
        if state.pending_series().is_some() {
            match args.rpe {
                Some(rpe) => engine.save_rpe(rpe),
                None => engine.submit_rpe_input(),
            }
        } else if state.is_preparation() {
            count_down(&mut engine, "Get ready", args.realtime).await;
        } else if state.is_resting() {
            count_down(&mut engine, "Rest", args.realtime).await;
        } else {
            if let Some(exercise) = routine.exercises.get(state.current_exercise_index()) {
                println!(
                    "  {} - set {}/{}",
                    exercise.name,
                    state.current_series_index() + 1,
                    exercise.series.len()
                );
            }
            engine.complete_current_series();
        }
    }

    if let Some(Err(error)) = engine.wait_for_persistence().await {
        eprintln!("warning: {}", error.user_message());
        if let Some(suggestion) = error.suggestion() {
            eprintln!("  {suggestion}");
        }
    }
    Ok(engine.summary().cloned())
}

/// Run the armed countdown out, one tick per second with `realtime`.
async fn count_down(engine: &mut SessionEngine, label: &str, realtime: bool) {
    let total = u64::from(countdown_remaining(engine));

    let bar = if realtime {
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::with_template("{msg:>10} [{bar:30}] {pos}/{len}s") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(label.to_string());
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately.
    interval.tick().await;
    while let Some(token) = engine.timer_token() {
        if realtime {
            interval.tick().await;
        }
        engine.tick_with(token);
        bar.set_position(total.saturating_sub(u64::from(countdown_remaining(engine))));
    }
    bar.finish_and_clear();

    // Nothing armed but still counting down: end it explicitly.
    if engine.is_resting() {
        engine.complete_rest();
    } else if engine.is_preparation() {
        engine.skip_preparation();
    }
}

fn countdown_remaining(engine: &SessionEngine) -> u32 {
    engine
        .state()
        .map_or(0, |state| state.rest_time().max(state.preparation_remaining()))
}
