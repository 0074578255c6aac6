#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dialect_review_backend::run().await
}
