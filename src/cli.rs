//! CLI definitions for PrintPreview.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// PrintPreview CLI.
#[derive(Parser)]
#[command(name = "printpreview")]
#[command(about = "Destination selection and print ticket engine")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to the per-user config file)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Printer fixture describing the available printers
    #[arg(short, long, default_value = "printers.json", global = true)]
    pub printers: PathBuf,

    /// Enterprise policy document (JSON)
    #[arg(long, global = true)]
    pub policies: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Discover printers and list every known destination
    List {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Select a destination, apply settings and print the resulting ticket (default)
    Ticket {
        /// Destination id to use instead of the automatic choice
        #[arg(short, long)]
        destination: Option<String>,

        /// Setting assignments, e.g. `--set copies=2 --set layout=true`
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        settings: Vec<String>,

        /// Ask for the PDF to be opened in a viewer (macOS only)
        #[arg(long)]
        open_pdf_in_preview: bool,

        /// Print through the system dialog
        #[arg(long)]
        system_dialog: bool,

        /// Do not write the sticky settings file
        #[arg(long)]
        no_save: bool,
    },
}
