//! TSM client installer CLI entrypoint.
//!
//! Downloads, verifies, and installs the backup-archive client packages.
//! Exits with status 1 and a message on stderr if any step fails.

use clap::Parser;
use std::io::Write;
use tsm_client_installer::acquisition::AcquisitionConfig;
use tsm_client_installer::artefact::release::ResolutionStrategy;
use tsm_client_installer::cli::Cli;
use tsm_client_installer::error::Result;
use tsm_client_installer::pipeline::install_client;
use tsm_container_common::write_stderr_line;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let config = AcquisitionConfig {
        work_dir: &cli.work_dir,
        strategy: ResolutionStrategy::DiscoveredLatest,
        quiet: cli.quiet,
    };
    install_client(&config, stderr)?;
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
