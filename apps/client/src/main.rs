#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vocab_client::run().await
}
