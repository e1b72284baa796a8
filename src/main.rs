use anyhow::Error;
use env_logger::Env;
use log::error;
use std::process::exit;

use absence_helper_lib::absence_cli_opts::{AbsenceCliOpts, ValidationError};

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let result = tokio::spawn(async move { AbsenceCliOpts::parse_opts().await }).await?;
    if let Err(e) = result {
        let code = ValidationError::exit_code(&e);
        // usage has already been printed for validation errors
        if code != 2 {
            error!("{e}");
        }
        exit(code);
    }
    Ok(())
}
