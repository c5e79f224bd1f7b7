//! Configuration and CLI argument handling

use std::{path::PathBuf, sync::Arc};

use clap::Parser;

use crate::{
    state::{
        preferences::{DEFAULT_BREAK_MINUTES, DEFAULT_FOCUS_MINUTES},
        TimerPreferences,
    },
    storage::{FileStore, KeyValueStore, MemoryStore},
};

fn parse_minutes(value: &str) -> Result<u64, String> {
    let minutes: u64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a whole number of minutes", value))?;
    if crate::state::preferences::MINUTES_RANGE.contains(&minutes) {
        Ok(minutes)
    } else {
        Err(format!("{} minutes is outside 1..=240", minutes))
    }
}

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "mindease")]
#[command(about = "Focus and break timers for the MindEase task manager")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Focus session length in minutes
    #[arg(long, default_value_t = DEFAULT_FOCUS_MINUTES, value_parser = parse_minutes)]
    pub focus_minutes: u64,

    /// Break length in minutes
    #[arg(long, default_value_t = DEFAULT_BREAK_MINUTES, value_parser = parse_minutes)]
    pub break_minutes: u64,

    /// Directory holding persisted timer snapshots
    #[arg(long, default_value = ".mindease")]
    pub data_dir: PathBuf,

    /// Keep timer snapshots in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Initial timer durations
    pub fn preferences(&self) -> TimerPreferences {
        TimerPreferences {
            focus_duration_minutes: self.focus_minutes,
            break_duration_minutes: self.break_minutes,
        }
    }

    /// Storage backend for timer snapshots
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        if self.ephemeral {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(FileStore::new(&self.data_dir))
        }
    }
}
