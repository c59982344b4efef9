use anyhow::{Context, Result};
use incident_tui::api::IncidentsClient;
use incident_tui::app::App;
use incident_tui::config::Config;
use incident_tui::event::EventHandler;
use incident_tui::{logging, tui};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("failed to load config")?;
    logging::init(&config.log_file).context("failed to initialize logging")?;
    info!(base_url = %config.api.base_url, "starting incident_tui");

    let client = IncidentsClient::new(config.api.clone()).context("failed to create API client")?;

    let mut terminal = tui::init()?;
    tui::install_panic_hook();

    let mut events = EventHandler::new(config.tick_rate);
    let mut app = App::new(client, events.sender(), &config);

    let res = app.run(&mut terminal, &mut events).await;

    tui::restore()?;

    if let Err(err) = res {
        error!(error = ?err, "exited with error");
        eprintln!("{err:?}");
    }
    Ok(())
}
