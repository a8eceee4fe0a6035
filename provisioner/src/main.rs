//! TSM client provisioner CLI entrypoint.
//!
//! Prepares the client, prints the readiness line and then blocks until the
//! process is terminated. Exits with status 1 and a message on stderr if
//! preparation fails.

use clap::Parser;
use std::io::Write;
use tsm_client_provisioner::cli::Cli;
use tsm_client_provisioner::error::Result;
use tsm_client_provisioner::lifecycle::Provisioner;
use tsm_client_provisioner::params::ProvisioningParameters;
use tsm_container_common::{SystemCommandExecutor, write_stderr_line};

fn main() {
    let cli = Cli::parse();
    let executor = SystemCommandExecutor;
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &executor, &mut std::io::stdout(), &mut stderr);
    match run_result {
        Ok(provisioner) => provisioner.wait(),
        Err(err) => std::process::exit(exit_code_for_error(&err, &mut stderr)),
    }
}

fn run<'a>(
    cli: &Cli,
    executor: &'a SystemCommandExecutor,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<Provisioner<'a>> {
    let params = ProvisioningParameters::from_env()?;
    let mut provisioner = Provisioner::new(cli.paths(), executor, cli.options());
    provisioner.provision(&params, stdout, stderr)?;
    Ok(provisioner)
}

fn exit_code_for_error(err: &dyn std::error::Error, stderr: &mut dyn Write) -> i32 {
    write_stderr_line(stderr, err);
    1
}
