#[tokio::main]
async fn main() -> anyhow::Result<()> {
    quizbox_backend::run().await
}
