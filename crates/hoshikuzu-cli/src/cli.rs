//! Command-line interface definition.
//!
//! - `hoshikuzu dev [ROOT]` - serve a directory with live reload and plugin hooks

use clap::{Args, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// Hoshikuzu - development server with live reload and activity notifications
#[derive(Parser, Debug)]
#[command(
    name = "hoshikuzu",
    version,
    about = "Development server with live reload and activity notifications"
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the development server
    ///
    /// Serves ROOT over HTTP, watches it for changes and pushes reloads to
    /// connected browsers. With --notify-url, server start and source changes
    /// are also reported to an external listener.
    Dev(DevArgs),
}

/// Arguments for the dev command
#[derive(Args, Debug, Clone, Default)]
pub struct DevArgs {
    /// Directory to serve and watch (defaults to the current directory)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Address to bind, e.g. 127.0.0.1, 0.0.0.0 or ::
    #[arg(long, value_name = "HOST")]
    pub host: Option<IpAddr>,

    /// Port to listen on; the next free port is used if it is taken, 0 picks any
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Base URL of a listener receiving /online and /update notifications
    ///
    /// Example: --notify-url http://localhost:9000
    #[arg(long, value_name = "URL")]
    pub notify_url: Option<String>,

    /// Config file (defaults to ROOT/hoshikuzu.config.json when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
