use std::process::ExitCode;

use anyhow::Context;
use hoist::{App, Pipeline, console};

fn run() -> anyhow::Result<()> {
    Pipeline::new(App::chatwoot())
        .run()
        .context("installation stopped")?;
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            console::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
