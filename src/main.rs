use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match cardiorisk_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Startup failed: {e}");
            ExitCode::FAILURE
        }
    }
}
