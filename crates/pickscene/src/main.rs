use std::process::ExitCode;

use pickscene::Options;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = match Options::from_env() {
        Ok(options) => options,
        Err(e) => {
            log::error!("failed to load options: {e}");
            return ExitCode::FAILURE;
        }
    };

    match pickscene::run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
