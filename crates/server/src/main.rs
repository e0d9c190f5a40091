#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wellness_server::run().await
}
