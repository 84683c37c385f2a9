use std::process::ExitCode;

fn main() -> ExitCode {
    match log_splitter::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", log_splitter::fatal_message(&e));
            ExitCode::FAILURE
        }
    }
}
