#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = timesheet_server::config::Config::from_env()?;
    timesheet_server::web::start_web_server(config).await
}
