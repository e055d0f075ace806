#[tokio::main]
async fn main() -> anyhow::Result<()> {
    interaction_recorder::run().await
}
