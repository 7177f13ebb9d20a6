pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod heat;
pub mod model;
pub mod pipeline;
pub mod util;
