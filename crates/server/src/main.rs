#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pallas_server::start().await
}
