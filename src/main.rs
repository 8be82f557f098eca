// Resume Optimizer - tailor a resume to a job description
//
// Collects a resume URL and a job description, posts them to a remote
// generation service, and shows the returned markdown with copy and
// download actions.
//
// Architecture:
// - Form (form.rs): FormState and its submit/finish transitions
// - Generator (generator.rs): HTTP call and response extraction (reqwest)
// - Export (export.rs): clipboard copy and markdown file download
// - TUI (ratatui): the interactive form and rendered result
// - Headless (headless.rs): one submission from the command line

mod cli;
mod config;
mod export;
mod form;
mod generator;
mod headless;
mod logging;
mod tui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use generator::HttpGenerator;
use logging::{LogBuffer, LogOutput};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management exits early and never touches the network
    if let Some(Commands::Config {
        show,
        reset,
        edit,
        path,
    }) = cli.command
    {
        return cli::handle_config(show, reset, edit, path);
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::from_env();

    match cli.command {
        Some(Commands::Generate(args)) => {
            // Headless: logs on stderr so stdout carries only the result
            let guard = logging::init(&config.logging, LogOutput::Stderr);
            let generator = HttpGenerator::new(&config.endpoint, config.request_timeout())?;

            let succeeded = headless::run(&args, &generator, &mut std::io::stdout()).await?;
            if !succeeded {
                // Flush file logs before exiting
                drop(guard);
                std::process::exit(1);
            }
            Ok(())
        }
        _ => {
            // TUI: capture logs to the buffer (prevents garbling the display)
            let log_buffer = LogBuffer::new();
            let _guard = logging::init(&config.logging, LogOutput::Tui(log_buffer.clone()));
            let generator = HttpGenerator::new(&config.endpoint, config.request_timeout())?;

            tracing::debug!(
                "Config loaded: endpoint={}, download_dir={}",
                config.endpoint,
                config.download_dir.display()
            );

            tui::run_tui(config, log_buffer, generator).await
        }
    }
}
