//! Terminal tables for routines, validation reports and sessions.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use repset_core::{estimated_duration_seconds, total_series_count, working_series_count};
use repset_model::{Routine, RoutineSession, Series, SessionTotals, UnitType};
use repset_normalization::format_numeric;
use repset_validate::DraftReport;

/// Seconds as `m:ss`, or `h:mm:ss` from one hour up.
pub fn format_duration(seconds: u64) -> String {
    let (hours, minutes, secs) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Short human form of a series, e.g. `80 kg x 8`.
pub fn describe_series(series: &Series) -> String {
    let load = (series.weight > 0.0).then(|| format!("{} kg", format_numeric(series.weight)));
    let measure = match series.unit_type {
        UnitType::RepsAndWeight | UnitType::Reps => {
            series.reps.map(|reps| format!("{reps} reps"))
        }
        UnitType::Time => series
            .duration
            .map(|d| format_duration(d.max(0.0).round() as u64)),
        UnitType::Distance => series
            .distance
            .map(|d| format!("{} m", format_numeric(d))),
    };
    match (load, measure) {
        (Some(load), Some(measure)) => format!("{load} x {measure}"),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => "-".to_string(),
    }
}

pub fn routines_table(routines: &[Routine]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Title"),
        header_cell("Exercises"),
        header_cell("Series"),
        header_cell("Est. duration"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for routine in routines {
        let total = total_series_count(&routine.exercises);
        let working = working_series_count(&routine.exercises);
        table.add_row(vec![
            dim_cell(&routine.id),
            Cell::new(&routine.title).add_attribute(Attribute::Bold),
            Cell::new(routine.exercises.len()),
            Cell::new(format!("{working}/{total}")),
            Cell::new(format_duration(estimated_duration_seconds(routine))),
        ]);
    }
    table
}

pub fn validation_table(reports: &[DraftReport]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Exercise"),
        header_cell("Valid"),
        header_cell("Invalid"),
        header_cell("Status"),
        header_cell("Issues"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for report in reports {
        let issues: Vec<String> = report
            .issues()
            .map(|(index, reason)| format!("#{}: {reason}", index + 1))
            .collect();
        let status = if report.can_save() {
            Cell::new("ok").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            Cell::new("blocked")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            Cell::new(&report.exercise_name),
            Cell::new(report.valid_count()),
            count_cell(report.invalid_count(), Color::Yellow),
            status,
            if issues.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(issues.join("\n"))
            },
        ]);
    }
    table
}

/// Exercises and series of a finished session.
pub fn session_table(session: &RoutineSession) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Exercise"),
        header_cell("Set"),
        header_cell("Performed"),
        header_cell("RPE"),
        header_cell("Note"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for exercise in &session.exercises {
        for (index, series) in exercise.series.iter().enumerate() {
            let name = if index == 0 {
                Cell::new(&exercise.name)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            };
            let set = if series.is_warm_up() {
                dim_cell("W")
            } else {
                Cell::new(index + 1)
            };
            table.add_row(vec![
                name,
                set,
                Cell::new(describe_series(series)),
                if series.is_warm_up() {
                    dim_cell("-")
                } else {
                    Cell::new(series.rpe)
                },
                if series.note.is_empty() {
                    dim_cell("-")
                } else {
                    Cell::new(&series.note)
                },
            ]);
        }
    }
    table
}

pub fn totals_table(totals: &SessionTotals) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Time"), header_cell("Duration")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows = [
        ("Preparation", totals.prep_seconds),
        ("Rest between series", totals.rest_series_seconds),
        ("Rest between exercises", totals.rest_between_exercises_seconds),
        ("Work (estimated)", totals.work_seconds),
    ];
    for (label, seconds) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(format_duration(seconds))]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format_duration(totals.total_seconds)).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn history_table(sessions: &[RoutineSession]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Date"),
        header_cell("Routine"),
        header_cell("Exercises"),
        header_cell("Series"),
        header_cell("Volume"),
        header_cell("Duration"),
    ]);
    apply_table_style(&mut table);
    for index in 2..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for session in sessions {
        let volume = session.volume();
        table.add_row(vec![
            Cell::new(session.date.format("%Y-%m-%d %H:%M")),
            Cell::new(&session.routine_title),
            Cell::new(session.exercise_count),
            Cell::new(session.series_count),
            if volume > 0.0 {
                Cell::new(format!("{} kg", format_numeric(volume)))
            } else {
                dim_cell("-")
            },
            Cell::new(format_duration(session.totals.total_seconds)),
        ]);
    }
    table
}

pub fn print_session_summary(session: &RoutineSession) {
    println!(
        "Session: {} ({})",
        session.routine_title,
        session.date.format("%Y-%m-%d %H:%M")
    );
    println!("{}", session_table(session));
    println!("{}", totals_table(&session.totals));
    if !session.muscles.is_empty() {
        println!("Muscles: {}", session.muscles.join(", "));
    }
    if !session.notes.is_empty() {
        println!("Notes:");
        for note in &session.notes {
            println!("- {note}");
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
