use load_distro::errors;
use load_distro::run;

#[tokio::main]
async fn main() -> Result<(), errors::AppError> {
    run().await
}
