use std::process::ExitCode;

fn main() -> ExitCode {
    qcars_cli::run()
}
