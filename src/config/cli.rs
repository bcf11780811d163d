use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "design-settings")]
#[command(about = "Manage a site's navigation and themes")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "design-settings.toml")]
    pub config: PathBuf,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Navigation menu
    #[command(subcommand)]
    Nav(NavCommand),

    /// Installed themes
    #[command(subcommand)]
    Theme(ThemeCommand),

    /// Print the normalized blog url
    BlogUrl,
}

#[derive(Debug, Clone, Subcommand)]
pub enum NavCommand {
    /// Validate and save the navigation read from a JSON file of {label, url} entries
    Save {
        file: PathBuf,

        /// Label of an extra entry appended on save
        #[arg(long)]
        add_label: Option<String>,

        /// Url of the extra entry, defaults to the site root
        #[arg(long)]
        add_url: Option<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ThemeCommand {
    List,
    Activate { name: String },
    Delete {
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    Download { name: String },
}
