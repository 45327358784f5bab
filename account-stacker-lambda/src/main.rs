use account_stacker_core::StackerService;
use anyhow::Context;
use env_logger::Env;
use lambda_runtime::{run, service_fn, Error};

mod handler;
use handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Configuration and clients are built once per execution environment
    let service = StackerService::from_env()
        .await
        .context("Failed to initialize account stacker")?;

    run(service_fn(|event| function_handler(event, &service))).await
}
