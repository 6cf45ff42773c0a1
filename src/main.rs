//! parse-nomad-config: print the configuration a set of Nomad agent
//! configuration files produces.

use std::process::ExitCode;

fn main() -> ExitCode {
    parse_nomad_config::cli::run(std::env::args_os())
}
