use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Render USGS earthquake events on an interactive Leaflet map.")]
pub struct Cli {
    /// Config file (defaults to quakemap.ini next to the binary)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the interactive map over HTTP
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch once and write a self-contained HTML page
    Render {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the earthquake feed query URL
    Url,
    /// Write the effective settings to the config file
    InitConfig,
}
