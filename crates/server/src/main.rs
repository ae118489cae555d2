#[tokio::main]
async fn main() -> anyhow::Result<()> {
    technews_server::start().await
}
