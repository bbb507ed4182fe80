use payment_service::SERVICE;
use service_core::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    service_core::startup::run(SERVICE).await
}
