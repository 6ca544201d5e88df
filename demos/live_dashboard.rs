use weatherdeck::{reading_metrics, WeatherDeck, WeatherDeckError};

#[tokio::main]
async fn main() -> Result<(), WeatherDeckError> {
    // Reads STATION_URL / STORE_URL / STORE_API_KEY from the environment.
    let deck = WeatherDeck::new().await?;
    deck.config().log_summary();

    let poller = deck.poller();
    let mut updates = poller.subscribe();

    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow().clone();

        if snapshot.is_loading() {
            println!("loading...");
            continue;
        }
        if let Some(error) = &snapshot.last_error {
            println!("poll failed ({error}), showing last known reading");
        }
        if let Some(reading) = &snapshot.reading {
            println!("--- {} (poll #{})", reading.time, snapshot.polls);
            for metric in reading_metrics(reading) {
                println!("  {metric}");
            }
        }
    }

    Ok(())
}
