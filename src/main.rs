use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    holdfast_cli::cli::app::run().await
}
