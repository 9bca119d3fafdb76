use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match nmwifi_cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
