use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    plughost::app::startup::startup().await
}
