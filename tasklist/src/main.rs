//! Task-list status and navigation CLI.
//!
//! Reads a form definition and the answers submitted so far from a project
//! directory (`tasklist.toml`), then reports task statuses, the next path to
//! visit, and whether the final review step may be entered.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use tasklist::core::types::Status;
use tasklist::exit_codes;
use tasklist::io::config::OutputFormat;
use tasklist::io::init::{InitOptions, init_project};
use tasklist::logging;
use tasklist::project::Project;
use tasklist::report::{render_task_list, task_list, title_for};
use tasklist::review::{cya_open, review_sections};
use tasklist::route::{RouteKind, resolve_route};
use tasklist::validate::validate_project;

#[derive(Parser)]
#[command(
    name = "tasklist",
    version,
    about = "Task-list status and navigation for multi-page forms"
)]
struct Cli {
    /// Project root containing `tasklist.toml`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `tasklist.toml`, an example form and an empty answers file if missing.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Check config, form (schema + invariants) and answers.
    Validate,
    /// Print status, title and link for every task plus the review step.
    Status {
        /// Output format; defaults to `output.format` from config.
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Answers file to use instead of the configured one.
        #[arg(long)]
        answers: Option<PathBuf>,
    },
    /// Print the entry path for a task (its review page once complete).
    Start {
        task: String,
        #[arg(long)]
        answers: Option<PathBuf>,
    },
    /// Print the first page of a task that still needs an answer.
    Next {
        task: String,
        #[arg(long)]
        answers: Option<PathBuf>,
    },
    /// Print the resolved title of a task.
    Title {
        task: String,
        #[arg(long)]
        answers: Option<PathBuf>,
    },
    /// List tasks shown on the consolidated review page.
    Sections {
        /// Task key to leave out (repeatable); merged with config.
        #[arg(long = "exclude")]
        exclude: Vec<String>,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        #[arg(long)]
        answers: Option<PathBuf>,
    },
    /// Report whether the final review step may be entered.
    Cya {
        #[arg(long)]
        answers: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let root = cli.root;
    match cli.command {
        Command::Init { force } => {
            init_project(&root, &InitOptions { force })?;
            Ok(exit_codes::OK)
        }
        Command::Validate => cmd_validate(&root),
        Command::Status { format, answers } => {
            let project = Project::load(&root, answers.as_deref())?;
            let format = format.unwrap_or(project.config.output.format);
            print!("{}", render_task_list(&task_list(&project), format)?);
            Ok(exit_codes::OK)
        }
        Command::Start { task, answers } => cmd_route(&root, &task, RouteKind::Start, answers),
        Command::Next { task, answers } => cmd_route(&root, &task, RouteKind::Next, answers),
        Command::Title { task, answers } => {
            let project = Project::load(&root, answers.as_deref())?;
            println!("{}", title_for(&project, &task)?);
            Ok(exit_codes::OK)
        }
        Command::Sections {
            exclude,
            format,
            answers,
        } => {
            let project = Project::load(&root, answers.as_deref())?;
            let sections = review_sections(&project, &exclude);
            match format.unwrap_or(project.config.output.format) {
                OutputFormat::Json => {
                    let buf =
                        serde_json::to_string_pretty(&sections).context("serialize sections")?;
                    println!("{buf}");
                }
                OutputFormat::Text => {
                    for section in &sections {
                        println!("{}\t{}", section.key, section.summary_path);
                    }
                }
            }
            Ok(exit_codes::OK)
        }
        Command::Cya { answers } => {
            let project = Project::load(&root, answers.as_deref())?;
            if cya_open(&project) {
                println!("cya: open");
                Ok(exit_codes::OK)
            } else {
                println!("cya: cannot-start");
                Ok(exit_codes::CANNOT_START)
            }
        }
    }
}

fn cmd_validate(root: &Path) -> Result<i32> {
    let outcome = validate_project(root)?;
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    println!(
        "validate: ok tasks={} pages={} answers={}",
        outcome.tasks, outcome.pages, outcome.answers
    );
    Ok(exit_codes::OK)
}

fn cmd_route(
    root: &Path,
    task: &str,
    kind: RouteKind,
    answers: Option<PathBuf>,
) -> Result<i32> {
    let project = Project::load(root, answers.as_deref())?;
    let route = resolve_route(&project, task, kind)?;
    println!("{}", route.path);
    debug!(task, status = %route.status, "route printed");
    if route.status == Status::CannotStart {
        return Ok(exit_codes::CANNOT_START);
    }
    Ok(exit_codes::OK)
}
