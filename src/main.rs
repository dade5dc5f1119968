#[tokio::main]
async fn main() -> anyhow::Result<()> {
    node_debug_api::node::run_cli().await
}
