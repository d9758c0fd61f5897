#[cfg(feature = "cli")]
pub mod cli;
pub mod messages;
pub mod settings;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "push-invoker")]
#[command(about = "Send a task notification to many devices through FCM")]
pub struct CliConfig {
    /// Settings file (TOML). Environment variables are used when omitted
    #[arg(short, long)]
    pub config: Option<String>,

    /// JSON request file with tokens, task_id, task_type and color; `-` reads stdin
    #[arg(long, conflicts_with_all = ["tokens", "task_id", "task_type"])]
    pub request: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub tokens: Vec<String>,

    #[arg(long)]
    pub task_id: Option<String>,

    #[arg(long)]
    pub task_type: Option<String>,

    /// Icon color, e.g. `#FF8800`
    #[arg(long)]
    pub color: Option<String>,

    /// Messages file overriding the built-in templates
    #[arg(long)]
    pub messages: Option<String>,

    /// Log the notification instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
