#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    calibration_docs_server::run().await
}
