//! Sequential data-preparation stages.
//!
//! Stages run strictly one after the other; the first failure aborts the run.

pub mod commits;
pub mod content;
pub mod io;
pub mod swatch;

use crate::config::Config;
use anyhow::Context;
use clap::ValueEnum;
use console::style;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Stage {
    Trainings,
    CollectCommits,
    CountCommits,
    Investigations,
    Projects,
    Awards,
    Sizes,
    Colors,
    Heatmap,
}

impl Stage {
    pub const ALL: [Stage; 9] = [
        Stage::Trainings,
        Stage::CollectCommits,
        Stage::CountCommits,
        Stage::Investigations,
        Stage::Projects,
        Stage::Awards,
        Stage::Sizes,
        Stage::Colors,
        Stage::Heatmap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Trainings => "trainings",
            Stage::CollectCommits => "collect-commits",
            Stage::CountCommits => "count-commits",
            Stage::Investigations => "investigations",
            Stage::Projects => "projects",
            Stage::Awards => "awards",
            Stage::Sizes => "sizes",
            Stage::Colors => "colors",
            Stage::Heatmap => "heatmap",
        }
    }

    fn unit(self) -> &'static str {
        match self {
            Stage::CollectCommits | Stage::CountCommits => "commits",
            Stage::Sizes | Stage::Colors => "images",
            Stage::Heatmap => "weeks",
            Stage::Awards => "awards",
            _ => "rows",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub progress: bool,
    pub reduced_motion: bool,
    /// Overrides `paths.heatmap`.
    pub heatmap_out: Option<PathBuf>,
}

pub struct Pipeline<'a> {
    config: &'a Config,
    options: RunOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, options: RunOptions) -> Self {
        Self { config, options }
    }

    pub fn heatmap_path(&self) -> PathBuf {
        self.options
            .heatmap_out
            .clone()
            .unwrap_or_else(|| self.config.resolve(&self.config.paths.heatmap))
    }

    /// Run one stage, returning how many items it produced.
    pub fn run_stage(&self, stage: Stage) -> anyhow::Result<usize> {
        let started = Instant::now();
        println!("{} {}...", style("▸").cyan(), style(stage.name()).bold());

        let config = self.config;
        let count = match stage {
            Stage::Trainings => content::trainings(config),
            Stage::CollectCommits => commits::collect(config, self.options.progress),
            Stage::CountCommits => commits::count(config),
            Stage::Investigations => content::investigations(config),
            Stage::Projects => content::projects(config),
            Stage::Awards => content::awards(config),
            Stage::Sizes => content::sizes(config),
            Stage::Colors => content::colors(config),
            Stage::Heatmap => commits::heatmap(config, &self.heatmap_path(), self.options.reduced_motion),
        }
        .with_context(|| format!("Stage '{}' failed", stage.name()))?;

        info!(
            stage = stage.name(),
            count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "stage complete"
        );
        println!("  {} {} {}", style("✓").green(), style(count).cyan(), stage.unit());
        Ok(count)
    }

    pub fn run_all(&self) -> anyhow::Result<Vec<(Stage, usize)>> {
        let mut done = Vec::with_capacity(Stage::ALL.len());
        for stage in Stage::ALL {
            let count = self.run_stage(stage)?;
            done.push((stage, count));
        }
        Ok(done)
    }
}
