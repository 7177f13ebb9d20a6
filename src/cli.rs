use crate::config::Config;
use crate::heat::build_grid;
use crate::model::CommitSummary;
use crate::pipeline::{commits, Pipeline, RunOptions, Stage};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Prepare portfolio data: CSV to JSON, git activity and a commit heatmap")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Project root (defaults to the current directory)")]
    pub root: Option<PathBuf>,

    #[arg(long, help = "Path to folio.toml")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Hide the scan spinner", default_value_t = false)]
    pub no_progress: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every stage in order
    Run {
        #[arg(long, help = "Render the heatmap without reveal animation")]
        reduced_motion: bool,
    },
    /// Run a single stage
    Stage {
        #[arg(value_enum)]
        stage: Stage,
    },
    /// Render commits.json as an SVG heatmap
    Heatmap {
        #[arg(long, help = "Output file (defaults to paths.heatmap)")]
        out: Option<PathBuf>,

        #[arg(long, help = "Render without reveal animation")]
        reduced_motion: bool,
    },
    /// Show what commits.json holds
    Summary {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        let root = match &self.common.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        let config = Config::load(&root, self.common.config.as_deref())
            .context("Failed to load configuration")?;
        let progress = !self.common.no_progress;

        match self.command {
            Commands::Run { reduced_motion } => {
                let options = RunOptions {
                    progress,
                    reduced_motion,
                    heatmap_out: None,
                };
                let done = Pipeline::new(&config, options).run_all()?;
                println!("\n{} {} stages", style("Done!").green().bold(), done.len());
                Ok(())
            }
            Commands::Stage { stage } => {
                let options = RunOptions {
                    progress,
                    ..RunOptions::default()
                };
                Pipeline::new(&config, options).run_stage(stage)?;
                Ok(())
            }
            Commands::Heatmap { out, reduced_motion } => {
                let options = RunOptions {
                    progress,
                    reduced_motion,
                    heatmap_out: out,
                };
                Pipeline::new(&config, options).run_stage(Stage::Heatmap)?;
                Ok(())
            }
            Commands::Summary { json } => {
                let summary = commits::load_summary(&config).context("Failed to read commits.json")?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                    Ok(())
                } else {
                    output_summary(&summary)
                }
            }
        }
    }
}

fn output_summary(summary: &CommitSummary) -> Result<()> {
    println!("{}", style("Commit Activity").bold());
    println!("{}", "─".repeat(50));

    println!("Total commits: {}", style(summary.commits_count).cyan());
    println!("Repositories: {}", style(summary.repositories_count).yellow());
    println!("Active days: {}", style(summary.days_count.len()).green());
    println!("Active months: {}", style(summary.months_count.len()).green());

    let grid = build_grid(summary).context("Failed to build calendar grid")?;
    if let (Some(first), Some(last)) = (grid.first_date(), grid.last_date()) {
        println!(
            "Date range: {} to {} ({} weeks)",
            style(first.format("%Y-%m-%d")).dim(),
            style(last.format("%Y-%m-%d")).dim(),
            grid.weeks.len()
        );
    }

    if let Some((day, count)) = summary.days_count.iter().max_by_key(|entry| *entry.1) {
        println!("Busiest day: {} ({} commits)", style(day).magenta(), count);
    }
    Ok(())
}
