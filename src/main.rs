use std::process::ExitCode;

fn main() -> ExitCode {
    match volley::entry::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            if err.is_invalid_config() {
                eprintln!("Use 'volley --help' for usage.");
            }
            ExitCode::FAILURE
        }
    }
}
