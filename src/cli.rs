use clap::{Parser, Subcommand};

use crate::config::{Config, DateHintMode, TranslatorMode};

/// arxiv-scout - search arXiv papers with Russian or English queries
#[derive(Parser, Debug)]
#[command(name = "arxiv-scout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Query translation strategy (overrides ARXIV_SCOUT_TRANSLATOR)
    #[arg(long, global = true, value_enum)]
    pub translator: Option<TranslatorMode>,

    /// How date windows are sent to the provider (overrides ARXIV_SCOUT_DATE_HINTS)
    #[arg(long, global = true, value_enum)]
    pub date_hints: Option<DateHintMode>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a single search and print the response
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,

        /// Page number (default: 1)
        #[arg(short, long)]
        page: Option<String>,

        /// Only papers published on or after this date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,

        /// Only papers published on or before this date (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,

        /// Print a Markdown list instead of JSON
        #[arg(long)]
        markdown: bool,

        /// Print every result in the date window instead of one page
        #[arg(long, conflicts_with = "page")]
        export: bool,
    },

    /// Answer newline-delimited JSON requests on stdin until EOF
    Serve,
}

impl Cli {
    pub fn apply(&self, config: &mut Config) {
        if let Some(mode) = self.translator {
            config.translator = mode;
        }
        if let Some(mode) = self.date_hints {
            config.date_hints = mode;
        }
    }
}
