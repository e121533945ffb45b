use futures::StreamExt;
use reminder_notifier::notification::ConsoleSurface;
use reminder_notifier::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reminder_notifier=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Using data directory {}", config.data_dir.display());

    let state = AppState::build(config, Arc::new(ConsoleSurface));

    let stats = state.reminder_service.stats()?;
    tracing::info!(
        "{} active reminders ({} today, {} this week)",
        stats.active_total,
        stats.today,
        stats.this_week
    );
    for reminder in state.reminder_service.upcoming(5)? {
        tracing::info!("Upcoming: {} at {}", reminder.title, reminder.date_time);
    }

    // Log every fired reminder for anyone tailing the output
    let mut events = state.scheduler.event_stream();
    let listener = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            match event {
                Ok(triggered) => tracing::info!(
                    reminder_id = %triggered.reminder.id,
                    "Reminder triggered at {}",
                    triggered.triggered_at
                ),
                Err(e) => tracing::warn!("Missed reminder events: {}", e),
            }
        }
    });

    state.scheduler.start();

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    state.scheduler.stop();
    state.scheduler.dispatcher().close_all();
    listener.abort();

    Ok(())
}
