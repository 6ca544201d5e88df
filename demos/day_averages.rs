use chrono::{Duration, Utc};
use weatherdeck::{aggregate_metrics, SortOrder, WeatherDeck, WeatherDeckError};

#[tokio::main]
async fn main() -> Result<(), WeatherDeckError> {
    let deck = WeatherDeck::new().await?;

    // Yesterday at the station, widened to full day bounds.
    let yesterday = (Utc::now() - Duration::days(1)).date_naive();

    let rows = deck
        .select_range(yesterday)
        .order(SortOrder::Ascending)
        .call()
        .await?;
    println!("{} readings stored on {}", rows.len(), yesterday);

    let averages = deck.averages(yesterday).await?;
    println!("Averages over {} samples:", averages.sample_count);
    for metric in aggregate_metrics(&averages) {
        println!("  {metric}");
    }

    Ok(())
}
