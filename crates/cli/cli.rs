use std::net::SocketAddr;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Posts open pull requests of the latest release branches to Slack")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Print debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, strum::Display, Debug, Clone)]
pub enum Commands {
    /// Listen for the Slack slash command on `POST /get-all`
    Serve {
        /// Overrides `RELNOTIFY_BIND`
        #[arg(long, short)]
        bind: Option<SocketAddr>,
    },
    /// Run once and print the release records as JSON
    Report {
        /// Repositories to inspect, e.g. `tower` or `awx:devel`
        repositories: Vec<String>,
    },
}
