//! Binary entrypoint for the native messaging host.

use std::io::{self, Write};
use std::process::ExitCode;

use keybridge::{EXIT_IO_FAILURE, run, telemetry};
use keybridge_config::{Config, split_config_arguments};
use ortho_config::OrthoConfig;

fn main() -> ExitCode {
    let split = split_config_arguments(std::env::args_os());
    let config = match Config::load_from_iter(split.config_arguments) {
        Ok(config) => config,
        Err(error) => {
            writeln!(io::stderr().lock(), "failed to load configuration: {error}").ok();
            return ExitCode::from(EXIT_IO_FAILURE);
        }
    };
    if let Err(error) = telemetry::initialise(&config) {
        writeln!(io::stderr().lock(), "{error}").ok();
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let code = run(
        &config,
        split.caller.as_deref(),
        &mut stdin.lock(),
        &mut stdout.lock(),
    );
    ExitCode::from(code)
}
