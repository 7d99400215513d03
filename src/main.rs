mod app;
mod cli;
mod config;
mod logging;
mod s3;

use clap::Parser as _;

use cli::Args;
use config::Environment;
use s3::Session;

#[::tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init()?;

    let outcome = app::run(
        Environment::from_env(),
        Args::parse,
        |resolver| async move { Session::new(resolver).await.map(Session::into_client) },
        &mut std::io::stdout(),
    )
    .await?;
    tracing::debug!(?outcome, "done");
    Ok(())
}
