#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = todo_server::config::Config::from_env()?;
    todo_server::web::start_web_server(config).await
}
