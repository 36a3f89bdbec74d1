mod app;
mod geo;
mod logging;
mod screen;

use anyhow::Result;

use app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let log_path = logging::init_logging()?;
    tracing::info!(log = %log_path.display(), "fivey starting");

    let settings = fivey_auth::Settings::new()?;
    let session = fivey_auth::authenticate(&settings).await?;

    let mut app = App::start(session, &settings).await?;
    app.run().await
}
