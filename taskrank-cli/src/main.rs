use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use taskrank_core::{RankError, rank, time};
use taskrank_ingest::{load_tasks, pending};

mod config;
mod logging;
mod report;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "taskrank",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TASKRANK_BUILD_SHA"), ")"),
    about = "Rank pending tasks by priority, difficulty and deadline (TOPSIS)"
)]
struct Cli {
    /// Log engine decisions to stderr (overridden by TASKRANK_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank the open tasks in a CSV or markdown snapshot
    Rank(RankArgs),

    /// Manage ~/.taskrank/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config (never overwrites)
    Init,

    /// Print the effective config
    Show,
}

#[derive(Args, Debug)]
struct RankArgs {
    /// Task snapshot (.csv or .md)
    #[arg(long)]
    tasks: PathBuf,

    /// Criterion weights: priority,difficulty,deadline (e.g. "0.2,0.2,0.6")
    #[arg(long)]
    weights: Option<String>,

    /// Criterion directions (e.g. "max,max,min")
    #[arg(long)]
    directions: Option<String>,

    /// Reference time instead of the clock ("YYYY-MM-DD HH:MM")
    #[arg(long)]
    now: Option<String>,

    /// IANA timezone for the clock (defaults to config)
    #[arg(long)]
    tz: Option<String>,

    /// Limit number of tasks printed
    #[arg(long)]
    limit: Option<usize>,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Rank completed tasks too
    #[arg(long)]
    include_completed: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            // Bad parameters or task data.
            if err.downcast_ref::<RankError>().is_some() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Rank(args) => rank_tasks(args),

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => config::show_config(),
        },
    }
}

fn rank_tasks(args: RankArgs) -> Result<()> {
    let cfg = config::load_config()?;

    // Validate parameters before touching the snapshot.
    let params = cfg
        .ranking
        .rank_params(args.weights.as_deref(), args.directions.as_deref())?;

    let now = match &args.now {
        Some(s) => time::parse_wall_clock(s)?,
        None => {
            let tz = args.tz.as_deref().unwrap_or(&cfg.clock.timezone);
            time::now_in_zone(tz)?
        }
    };

    let all = load_tasks(&args.tasks)
        .with_context(|| format!("loading {}", args.tasks.display()))?;
    let total = all.len();
    let tasks = if args.include_completed { all } else { pending(all) };
    tracing::debug!(total, eligible = tasks.len(), %now, "snapshot ready");

    let ranking = rank(&tasks, &params, now);

    if args.json {
        println!("{}", report::render_json(&ranking, args.limit)?);
    } else {
        print!("{}", report::render_text(&ranking, now, args.limit));
    }

    Ok(())
}
