use std::process::ExitCode;

fn main() -> ExitCode {
    match gopherdoc::run_server() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("gopherdoc: {error}");
            ExitCode::FAILURE
        }
    }
}
