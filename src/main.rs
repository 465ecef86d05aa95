use std::io::BufRead;
use std::sync::mpsc::TryRecvError;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use skycast_core::{AppError, Config};
use skycast_screen::{DisplayState, ScreenModel};
use skycast_weather::{
    Coordinates, FixedLocationSource, LocationResolver, LocationSource, ResolveOptions,
    SourcePermissionGate, SystemLocationSource, WeatherClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    skycast_core::init()?;

    let (config, _validation) = Config::load_validated()?;

    tracing::info!("Skycast started");
    println!("Skycast - current conditions");
    println!("Config directory: {}", config.config_dir.display());

    let source: Arc<dyn LocationSource> = match config.location.pinned_coordinates() {
        Some((lat, lon)) => Arc::new(FixedLocationSource::new(Coordinates::new(lat, lon))),
        None => Arc::new(SystemLocationSource),
    };
    let gate = Arc::new(SourcePermissionGate::new(source.clone()));
    let resolver = Arc::new(LocationResolver::new(
        source,
        ResolveOptions {
            high_accuracy: config.location.high_accuracy,
            timeout: Duration::from_millis(config.location.timeout_ms),
            max_age: Duration::from_millis(config.location.max_age_ms),
        },
    ));
    let client = match WeatherClient::new(
        &config.weather.endpoint,
        &config.weather.api_key,
        Duration::from_secs(config.weather.timeout_secs),
    ) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            let err = AppError::Weather(e.to_string());
            eprintln!("{}", err.user_message());
            return Err(err.into());
        }
    };

    let mut model = ScreenModel::new(tokio::runtime::Handle::current(), gate, resolver, client);
    model.on_mount();

    // Read commands on a blocking thread; the foreground loop stays free to
    // pump completion messages.
    let (cmd_tx, cmd_rx) = std::sync::mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines().map_while(|l| l.ok()) {
            if cmd_tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("Type a city name to search; /refresh, /retry, /quit");

    loop {
        if model.pump() > 0 {
            render(&model);
        }

        match cmd_rx.try_recv() {
            Ok(line) => {
                let line = line.trim();
                match line {
                    "" => {}
                    "/quit" => break,
                    "/refresh" => model.on_refresh(),
                    "/retry" => model.on_retry_location(),
                    _ => {
                        model.on_search_text_changed(line);
                        model.on_search_submit();
                    }
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    tracing::info!("Skycast exiting");
    Ok(())
}

fn render(model: &ScreenModel) {
    let display = model.display();
    match display {
        DisplayState::Loading => println!("Loading..."),
        DisplayState::Ready => {
            if let Some(snapshot) = &model.state().snapshot {
                println!(
                    "{}  {:.1}°C  {}",
                    snapshot.region_name, snapshot.temperature_c, snapshot.condition_text
                );
            }
        }
        DisplayState::LocationDenied | DisplayState::NotFound => {
            if let Some(text) = display.status_text() {
                println!("{}", text);
            }
        }
    }
}
