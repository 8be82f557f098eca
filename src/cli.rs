// CLI module - command-line argument parsing and handlers
//
// Without a subcommand the TUI starts. Subcommands:
// - generate: One submission without the TUI, result on stdout
// - config --show: Display effective configuration
// - config --path: Show config file path
// - config --reset: Regenerate config file with defaults
// - config --edit: Open config file in $EDITOR

use crate::config::{Config, VERSION};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// Resume Optimizer - tailor a resume to a job description
#[derive(Parser)]
#[command(name = "resume-optimizer")]
#[command(version = VERSION)]
#[command(about = "Tailor a resume to a job description", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate one optimized resume and print it to stdout
    Generate(GenerateArgs),

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Link to the current resume
    #[arg(long, value_name = "URL")]
    pub resume_url: String,

    /// Job description text
    #[arg(long, value_name = "TEXT", conflicts_with = "job_file", required_unless_present = "job_file")]
    pub job_description: Option<String>,

    /// Read the job description from a file ("-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub job_file: Option<PathBuf>,

    /// Also save optimized-resume.md into this directory
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Also copy the result to the clipboard
    #[arg(long)]
    pub copy: bool,
}

impl GenerateArgs {
    /// The job description from the flag, the file, or stdin
    pub fn job_description(&self) -> Result<String> {
        if let Some(text) = &self.job_description {
            return Ok(text.clone());
        }
        match &self.job_file {
            Some(path) if path.as_os_str() == "-" => {
                std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")
            }
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display())),
            None => bail!("Either --job-description or --job-file is required"),
        }
    }
}

/// Handle `config` subcommand flags
pub fn handle_config(show: bool, reset: bool, edit: bool, path: bool) -> Result<()> {
    if path {
        handle_config_path()
    } else if show {
        handle_config_show();
        Ok(())
    } else if reset {
        handle_config_reset()
    } else if edit {
        handle_config_edit()
    } else {
        // No flag provided, show help
        println!("Usage: resume-optimizer config [--show|--path|--reset|--edit]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --path    Show config file path");
        println!("  --reset   Reset config file to defaults");
        println!("  --edit    Open config file in $EDITOR");
        Ok(())
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read confirmation")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

fn handle_config_edit() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            // Platform-specific fallback
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    let status = Command::new(&editor).arg(&path).status().with_context(|| {
        format!(
            "Failed to launch editor '{}'. Set $EDITOR to your preferred editor",
            editor
        )
    })?;

    if !status.success() {
        bail!("Editor exited with status: {}", status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_args() {
        let cli = Cli::try_parse_from([
            "resume-optimizer",
            "generate",
            "--resume-url",
            "https://a.dev/cv.pdf",
            "--job-description",
            "SRE",
            "--output",
            "out",
        ])
        .unwrap();

        let Some(Commands::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.resume_url, "https://a.dev/cv.pdf");
        assert_eq!(args.job_description().unwrap(), "SRE");
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert!(!args.copy);
    }

    #[test]
    fn test_generate_needs_a_job_description() {
        let missing = Cli::try_parse_from([
            "resume-optimizer",
            "generate",
            "--resume-url",
            "https://a.dev/cv.pdf",
        ]);
        assert!(missing.is_err());

        let both = Cli::try_parse_from([
            "resume-optimizer",
            "generate",
            "--resume-url",
            "https://a.dev/cv.pdf",
            "--job-description",
            "SRE",
            "--job-file",
            "jd.txt",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn test_job_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("jd.txt");
        std::fs::write(&file, "Staff engineer\nRust").unwrap();

        let args = GenerateArgs {
            resume_url: "https://a.dev/cv.pdf".to_string(),
            job_description: None,
            job_file: Some(file),
            output: None,
            copy: false,
        };
        assert_eq!(args.job_description().unwrap(), "Staff engineer\nRust");
    }
}
