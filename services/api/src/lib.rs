mod check;
mod cli;
mod infra;
mod routes;
mod server;

use lifestyle_checker::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
