//! Puolingo CLI
//!
//! Usage:
//!   puolingo serve                                  # HTTP API server
//!   puolingo streak 2024-01-01 2024-01-02           # Replay activity dates
//!   puolingo streak --frozen --seed seed.json ...   # ...with a freeze and quest awards
//!   puolingo tree --completed 1,2                   # Annotated content tree
//!   puolingo tree --completed 1,2 --json            # JSON output
//!   puolingo seed seed.json --out sorted.json       # Validate and normalize a seed

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;

use puolingo::config::ServerConfig;
use puolingo::core::{load_seed, run_server, save_seed, ProgressEngine, ProgressionUnlocker, Seed};
use puolingo::types::{CourseView, LessonId, QuestId, StreakTransition, UserStreakState};
use puolingo::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "puolingo",
    version = VERSION,
    about = "Puolingo - streaks, quests and course unlocking for a language-learning backend"
)]
struct Cli {
    /// Log filter when RUST_LOG is unset
    #[arg(long, global = true, env = "PUOLINGO_LOG", default_value = "info")]
    log_level: String,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server
    Serve(ServerConfig),

    /// Replay activity dates through the streak tracker
    Streak {
        /// Activity dates (YYYY-MM-DD), in the order they happen
        #[arg(required = true)]
        dates: Vec<NaiveDate>,

        /// Start with the streak freeze armed
        #[arg(long)]
        frozen: bool,

        /// Seed file whose quests are evaluated after each day
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Print the content tree with lock/completion flags
    Tree {
        /// Seed file with the content tree
        #[arg(long, default_value = "seed/curriculum.json")]
        seed: PathBuf,

        /// Completed lesson ids
        #[arg(long, value_delimiter = ',')]
        completed: Vec<LessonId>,
    },

    /// Validate a seed file, optionally writing it back in display order
    Seed {
        /// Seed file to check
        path: PathBuf,

        /// Write the sorted seed here
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match &cli.command {
        Command::Serve(config) => run_server(config).await,
        Command::Streak { dates, frozen, seed } => run_streak(dates, *frozen, seed.as_ref(), cli.json),
        Command::Tree { seed, completed } => run_tree(seed, completed, cli.json),
        Command::Seed { path, out } => run_seed(path, out.as_ref(), cli.json),
    }
}

/// One replayed day
#[derive(serde::Serialize)]
struct StreakStep {
    date: NaiveDate,
    transition: StreakTransition,
    state: UserStreakState,
    quests_awarded: Vec<QuestId>,
    quest_points: i64,
}

fn run_streak(dates: &[NaiveDate], frozen: bool, seed: Option<&PathBuf>, json: bool) -> anyhow::Result<()> {
    let seed = match seed {
        Some(path) => load_seed(path).with_context(|| format!("loading {}", path.display()))?,
        None => Seed::default(),
    };
    let engine = ProgressEngine::new();

    let mut state = UserStreakState::new(0);
    state.streak_frozen = frozen;
    let mut awarded: HashSet<QuestId> = HashSet::new();
    let mut steps = Vec::with_capacity(dates.len());

    for &date in dates {
        let delta = engine.record_activity(&state, date, &seed.quests, &awarded, 0);
        let quests: Vec<QuestId> = delta.awards.iter().map(|a| a.quest_id).collect();
        awarded.extend(quests.iter().copied());
        state = delta.streak;
        steps.push(StreakStep {
            date,
            transition: delta.transition,
            state: state.clone(),
            quests_awarded: quests,
            quest_points: delta.quest_points,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }

    for step in &steps {
        let code = step.transition.code();
        let code = match step.transition {
            t if t.is_noop() => code.dimmed(),
            StreakTransition::FreezeConsumed => code.cyan(),
            StreakTransition::Reset => code.red(),
            _ => code.green(),
        };
        print!(
            "{} {:<16} streak={} longest={} frozen={}",
            step.date, code, step.state.streak_count, step.state.longest_streak, step.state.streak_frozen
        );
        if !step.quests_awarded.is_empty() {
            print!("  {}", format!("quests={:?} +{}", step.quests_awarded, step.quest_points).yellow());
        }
        println!();
    }
    Ok(())
}

fn run_tree(seed: &PathBuf, completed: &[LessonId], json: bool) -> anyhow::Result<()> {
    let seed = load_seed(seed).with_context(|| format!("loading {}", seed.display()))?;
    let completed: HashSet<LessonId> = completed.iter().copied().collect();
    let tree = ProgressionUnlocker::new().compute_tree(&seed.courses, &completed);

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    for course in &tree {
        println!("{} {}", badge(course.locked, course.completed), course.title.bold());
        print_units(course);
    }
    Ok(())
}

/// Seed check summary
#[derive(serde::Serialize)]
struct SeedSummary {
    courses: usize,
    lessons: usize,
    challenges: usize,
    quests: usize,
    written: Option<PathBuf>,
}

fn run_seed(path: &PathBuf, out: Option<&PathBuf>, json: bool) -> anyhow::Result<()> {
    let mut seed = load_seed(path).with_context(|| format!("loading {}", path.display()))?;

    if let Some(out) = out {
        seed.sort();
        save_seed(&seed, out).with_context(|| format!("writing {}", out.display()))?;
    }

    let summary = SeedSummary {
        courses: seed.courses.len(),
        lessons: seed.lesson_count(),
        challenges: seed
            .courses
            .iter()
            .flat_map(|c| c.units.iter())
            .flat_map(|u| u.lessons.iter())
            .map(|l| l.challenges.len())
            .sum(),
        quests: seed.quests.len(),
        written: out.cloned(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {}: {} courses, {} lessons, {} challenges, {} quests",
        "[OK]".green(),
        path.display(),
        summary.courses,
        summary.lessons,
        summary.challenges,
        summary.quests
    );
    if let Some(out) = &summary.written {
        println!("     sorted copy written to {}", out.display());
    }
    Ok(())
}

fn print_units(course: &CourseView) {
    for unit in &course.units {
        println!("  {} {}", badge(unit.locked, unit.completed), unit.title);
        for lesson in &unit.lessons {
            let mark = if lesson.completed { "x".green() } else { " ".normal() };
            println!("      [{}] {} ({})", mark, lesson.title, lesson.id);
        }
    }
}

fn badge(locked: bool, completed: bool) -> colored::ColoredString {
    match (locked, completed) {
        (true, _) => "[LOCKED]".red(),
        (false, true) => "[DONE]  ".green(),
        (false, false) => "[OPEN]  ".yellow(),
    }
}
