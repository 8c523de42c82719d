//! Alfred workflow bundler - packages Alfred workflows and publishes releases.
//!
//! This binary builds `.alfredworkflow` packages from a workflow project,
//! opens them for installation, or publishes them as GitHub releases.

use alfred_workflow_bundler::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match alfred_workflow_bundler::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            // Printed even under --quiet
            if OutputManager::new(false, false).error(&e.to_string()).is_err() {
                eprintln!("error: {}", e);
            }
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
