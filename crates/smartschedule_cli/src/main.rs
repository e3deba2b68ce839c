//! Command-line front-end for the SmartSchedule planner.
//!
//! # Responsibility
//! - Map one invocation to one planner session request.
//! - Render the day view as plain text.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use smartschedule_core::config::{parse_daily_target, DAILY_TARGET_ENV};
use smartschedule_core::db::open_db;
use smartschedule_core::{
    category_label, core_version, default_log_level, format_day, format_hours, init_logging,
    parse_day, parse_duration, progress_label, DailySummary, KvStore, PlannerConfig,
    PlannerSession, SqliteKvStore, SystemClock, ThemeChoice, ThemeService,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "smartschedule")]
#[command(
    about = "Plan your day: record tasks and track hours against a daily target",
    long_about = None
)]
#[command(version = core_version())]
struct Cli {
    /// SQLite database file
    #[arg(
        long,
        global = true,
        env = "SMARTSCHEDULE_DB_PATH",
        default_value = "smartschedule.sqlite3"
    )]
    db: PathBuf,

    /// Day to operate on (YYYY-MM-DD); defaults to today
    #[arg(long, global = true, value_parser = parse_day_arg)]
    date: Option<NaiveDate>,

    /// Days to move from the selected date (e.g. -1 for the previous day)
    #[arg(long, global = true, default_value_t = 0, allow_hyphen_values = true)]
    offset: i64,

    /// Hours that count as a fully planned day
    #[arg(long, global = true, env = DAILY_TARGET_ENV, value_parser = parse_daily_target)]
    target: Option<f64>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show tasks, totals and progress for the day (default)
    Show,

    /// Add a task to the day
    Add {
        /// Task name
        name: String,

        /// Planned hours
        duration: String,

        /// Optional category
        #[arg(short, long, default_value = "")]
        category: String,
    },

    /// Remove one task by id
    Remove {
        /// Task id as printed by `show`
        id: String,
    },

    /// Remove every task of the day
    Clear,

    /// Show or change the theme
    Theme {
        /// dark, light, system or toggle; prints the effective theme when omitted
        choice: Option<String>,

        /// Whether the system currently prefers a dark color scheme
        #[arg(long)]
        system_dark: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let conn = open_db(&cli.db).map_err(|err| format!("cannot open {}: {err}", cli.db.display()))?;
    let storage = SqliteKvStore::new(&conn);

    let mut config = PlannerConfig::default();
    if let Some(target) = cli.target {
        config.daily_target_hours = target;
    }

    let command = match cli.command.unwrap_or(Commands::Show) {
        Commands::Theme {
            choice,
            system_dark,
        } => {
            let themes = ThemeService::new(&storage, config.theme_key.as_str());
            return run_theme(&themes, choice.as_deref(), system_dark);
        }
        other => other,
    };

    let mut session = PlannerSession::start(&storage, SystemClock, &config);
    if let Some(date) = cli.date {
        session.jump_to(date);
    }
    session.shift_days(cli.offset);

    match command {
        Commands::Show | Commands::Theme { .. } => {}
        Commands::Add {
            name,
            duration,
            category,
        } => {
            let hours = parse_duration(&duration).map_err(|err| err.to_string())?;
            let task = session
                .add_task(&name, &category, hours)
                .map_err(|err| err.to_string())?;
            println!("added {}", task.id);
        }
        Commands::Remove { id } => {
            if session.remove_task(&id) {
                println!("removed {id}");
            } else {
                println!("no task with id {id}");
            }
        }
        Commands::Clear => {
            let removed = session.clear_selected_day();
            println!("removed {removed} task(s)");
        }
    }

    print_summary(&session.summary());
    Ok(())
}

fn run_theme<S: KvStore>(
    themes: &ThemeService<S>,
    choice: Option<&str>,
    system_dark: bool,
) -> Result<(), String> {
    match choice.map(str::trim) {
        None => {}
        Some(value) if value.eq_ignore_ascii_case("toggle") => {
            themes.toggle(system_dark).map_err(|err| err.to_string())?;
        }
        Some(value) if value.eq_ignore_ascii_case("system") => {
            themes.clear_choice().map_err(|err| err.to_string())?;
        }
        Some(value) => {
            let parsed = value.parse::<ThemeChoice>().map_err(|err| err.to_string())?;
            themes.set_choice(parsed).map_err(|err| err.to_string())?;
        }
    }
    println!("{}", themes.resolve(system_dark).as_str());
    Ok(())
}

fn print_summary(summary: &DailySummary) {
    println!("{}", format_day(summary.date));
    if summary.tasks.is_empty() {
        println!("  (no tasks)");
    }
    for task in &summary.tasks {
        println!(
            "  {:<24} {:<16} {:>6}h  {}",
            task.name,
            category_label(&task.category),
            format_hours(task.duration),
            task.id
        );
    }
    println!(
        "total: {}h of {}h",
        format_hours(summary.total_hours),
        format_hours(summary.target_hours)
    );
    println!("{}", progress_label(summary.progress_percent));
    for category in &summary.categories {
        println!("  {:<16} {} h", category.label, format_hours(category.hours));
    }
}

fn parse_day_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_day(raw).ok_or_else(|| format!("`{raw}` is not a YYYY-MM-DD date"))
}
