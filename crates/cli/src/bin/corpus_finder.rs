use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    corpus_cli::main_entry().await
}
