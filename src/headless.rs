// Headless mode - one submission without the TUI
//
// stdout carries only the generated markdown; diagnostics go to stderr
// through the fmt log layer.

use crate::cli::GenerateArgs;
use crate::export::{self, SystemClipboard};
use crate::form::{self, FormState};
use crate::generator::HttpGenerator;
use anyhow::Result;
use std::io::Write;

/// Run one submission and write the result to `out`
///
/// Returns `false` when the submission was refused or the request failed.
/// The user-facing message has already been printed to stderr.
pub async fn run(args: &GenerateArgs, generator: &HttpGenerator, out: &mut impl Write) -> Result<bool> {
    let mut form = FormState::new(args.resume_url.clone(), args.job_description()?);

    if let Err(refusal) = form::submit(&mut form, generator).await {
        eprintln!("{}", refusal);
        return Ok(false);
    }
    if !form.error().is_empty() {
        eprintln!("{}", form.error());
        return Ok(false);
    }

    writeln!(out, "{}", form.result())?;

    if let Some(dir) = &args.output {
        let path = export::download(form.result(), dir)?;
        eprintln!("Saved {}", path.display());
    }
    if args.copy {
        export::copy(form.result(), &mut SystemClipboard);
    }

    Ok(true)
}
