mod arxiv;
mod cli;
mod config;
mod error;
mod markdown;
mod search;
mod tavily;
mod tools;
mod translation;

pub const USER_AGENT: &str = concat!("arxiv-scout/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use tokio::io::{BufReader, stdin, stdout};
use tracing::info;

use cli::{Cli, Command};
use config::Config;
use tools::{ExportFormat, ExportParams, Response, Scout, SearchParams};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("arxiv_scout=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    cli.apply(&mut config);
    info!(translator = ?config.translator, date_hints = ?config.date_hints, "starting arxiv-scout");

    let scout = Scout::from_config(&config)?;

    match cli.command {
        Command::Search {
            query,
            page,
            start_date,
            end_date,
            markdown,
            export,
        } => {
            let params = SearchParams {
                query: query.join(" "),
                page: page.map(tools::PageParam::Text),
                start_date,
                end_date,
            };
            let mut response = scout.search(&params).await;
            if export && let Response::Success(body) = &response {
                let format = if markdown {
                    ExportFormat::Markdown
                } else {
                    ExportFormat::Json
                };
                response = scout.export(&ExportParams {
                    cache_key: body.cache_key.clone(),
                    start_date: params.start_date.clone(),
                    end_date: params.end_date.clone(),
                    format,
                });
            }
            if markdown {
                print!("{}", markdown::format_response(&params.query, &response));
            } else {
                println!("{}", tools::to_json_line(&response));
            }
            if !response.is_success() {
                std::process::exit(1);
            }
        }
        Command::Serve => {
            scout.serve(BufReader::new(stdin()), stdout()).await?;
            info!("server stopped");
        }
    }

    Ok(())
}
