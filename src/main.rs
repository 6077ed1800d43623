use alex::kernel::context::KernelContext;
use alex::kernel::signal::SignalBus;
use alex::listen::console::ConsoleListener;
use alex::outputs::console::ConsoleSpeaker;
use alex::skills::SkillRegistry;
use alex::{EngagementConfig, EngagementController};
use anyhow::Context;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let config = match std::env::args().nth(1) {
        Some(path) => EngagementConfig::from_json_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => EngagementConfig::default(),
    };
    tracing::info!("Starting assistant as '{}'", config.wake_name);

    let ctx = KernelContext::new(SignalBus::with_tick(config.ringing_tick()));
    let (tx_lines, rx_lines) = mpsc::channel(100);
    let listener = Arc::new(ConsoleListener::new(rx_lines, config.wake_name.clone()));
    let speaker = Arc::new(ConsoleSpeaker::new(config.wake_name.to_uppercase()));

    // Console input: `report <category>: <text>` stands in for a background
    // producer, anything else is heard by the recognizer.
    let input_ctx = ctx.clone();
    tokio::spawn(async move {
        let reader = BufReader::new(tokio::io::stdin());
        let mut lines = reader.lines();

        println!("Say 'hey alex' to start. Commands use 'intent: key=value, ...'.");

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix("report ") {
                let (category, message) = rest.split_once(':').unwrap_or(("news", rest));
                input_ctx.report(message.trim(), category.trim()).await;
                continue;
            }

            if let Err(e) = tx_lines.send(line.to_string()).await {
                tracing::error!("Failed to send input: {}", e);
                break;
            }
        }
        input_ctx.bus.request_termination();
    });

    let signal_bus = Arc::clone(&ctx.bus);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_bus.request_termination();
        }
    });

    let mut controller = EngagementController::new(config, ctx, listener, speaker, SkillRegistry::with_defaults());
    controller.run().await;

    let snapshot = controller.telemetry().snapshot();
    tracing::info!("Session summary: {}", serde_json::to_string(&snapshot)?);
    Ok(())
}
