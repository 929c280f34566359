mod batch;
mod cli;
mod infra;
mod routes;
mod server;

use role_classifier::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
