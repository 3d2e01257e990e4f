//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use anyhow::bail;
use clap::{Args, Parser, Subcommand};

use crate::{
    bridge::{TimerUpdate, DEFAULT_DRIFT_TOLERANCE_SECS},
    widget::DEFAULT_FALLBACK_REFRESH_SECS,
};

pub const DEFAULT_APP_GROUP: &str = "group.pomodoro.widget";
pub const DEFAULT_WIDGET_KIND: &str = "PomodoroWidget";

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomodoro-widget")]
#[command(about = "Shared-state bridge and countdown widget host for a Pomodoro timer")]
#[command(version)]
pub struct Config {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Shared namespace linking the writer and the widget
    #[arg(long, global = true, default_value = DEFAULT_APP_GROUP)]
    pub app_group: String,

    /// Directory holding group containers
    #[arg(long, global = true, default_value = "group-containers")]
    pub container_root: PathBuf,

    /// Seconds of target jitter ignored while a timer keeps running
    #[arg(long, global = true, default_value_t = DEFAULT_DRIFT_TOLERANCE_SECS)]
    pub drift_tolerance: f64,

    /// Seconds before the widget re-renders without a refresh signal
    #[arg(long, global = true, default_value_t = DEFAULT_FALLBACK_REFRESH_SECS)]
    pub fallback_refresh: u64,

    /// Widget kind targeted by refresh signals
    #[arg(long, global = true, default_value = DEFAULT_WIDGET_KIND)]
    pub widget_kind: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP bridge together with an in-process widget host
    Serve(ServeArgs),
    /// Create the group container shared by writer and widget
    Link,
    /// Write one timer update into the shared store
    Update(UpdateArgs),
    /// Print the current effective timer state as JSON
    Query,
    /// Render the widget once from the shared store
    Render,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            port: 20554,
            host: "127.0.0.1".to_string(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    #[arg(long)]
    pub seconds_remaining: u64,

    #[arg(long)]
    pub total_seconds: u64,

    #[arg(long, default_value = "Work")]
    pub mode: String,

    /// Mark the timer as ticking
    #[arg(long)]
    pub running: bool,
}

impl From<UpdateArgs> for TimerUpdate {
    fn from(args: UpdateArgs) -> Self {
        Self {
            seconds_remaining: args.seconds_remaining,
            total_seconds: args.total_seconds,
            mode: args.mode,
            is_running: args.running,
        }
    }
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Subcommand to run, `serve` when none was given
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    }

    pub fn fallback_refresh(&self) -> Duration {
        Duration::from_secs(self.fallback_refresh)
    }

    /// Reject values the reconciliation and scheduling cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.drift_tolerance.is_finite() || self.drift_tolerance < 0.0 {
            bail!(
                "drift tolerance must be a non-negative number of seconds, got {}",
                self.drift_tolerance
            );
        }
        if self.fallback_refresh == 0 {
            bail!("fallback refresh interval must be at least one second");
        }
        if self.app_group.trim().is_empty() {
            bail!("app group must not be empty");
        }
        Ok(())
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

impl ServeArgs {
    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
