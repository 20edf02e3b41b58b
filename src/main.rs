use std::process::ExitCode;

fn main() -> ExitCode {
    match ipca_expect::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
