mod cli;
mod demo;
mod evaluate;
mod infra;
mod render;
mod routes;
mod server;

use spendsense::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
