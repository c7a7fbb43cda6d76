use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use shared::domain::Placement;
use tracing_subscriber::EnvFilter;
use widget_core::{
    controls::slider::{SliderPatch, SliderState},
    load_session_config,
    push::spawn_push_feed,
    CommandDispatcher, CommandOutcome, EditorSession, GridContainers, Phase, PushChannel,
    SessionConfig, StaticTemplates, WidgetServices,
};

#[derive(Parser, Debug)]
struct Cli {
    /// Overrides `server_url` from dashboard.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Posts one command to the server.
    Send { addr: String, value: String },
    /// Prints push updates, optionally asking for the latest status first.
    Watch { addrs: Vec<String> },
    /// Presses a slider at `x` on a track `width` wide and dispatches the result.
    DragSlider {
        #[arg(long)]
        x: f64,
        #[arg(long)]
        width: f64,
        #[arg(long, default_value_t = 0.0)]
        min: f64,
        #[arg(long, default_value_t = 100.0)]
        max: f64,
        #[arg(long)]
        addr: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();

    let mut config = load_session_config();
    if let Some(server_url) = cli.server_url {
        config.server_url = server_url;
    }

    match cli.command {
        Command::Send { addr, value } => {
            let dispatcher = CommandDispatcher::http(config.command_url());
            let outcome = dispatcher.send(&addr, value).await;
            report(&outcome)?;
        }
        Command::Watch { addrs } => watch(&config, &addrs).await?,
        Command::DragSlider {
            x,
            width,
            min,
            max,
            addr,
        } => {
            let session = headless_session(&config);
            let slider = session.place_typed::<SliderState>(
                &SliderPatch {
                    command_id: addr,
                    min: Some(min),
                    max: Some(max),
                    ..SliderPatch::default()
                },
                Placement::default(),
            );
            if slider.settled().await != Phase::Interactive {
                bail!("slider view failed to mount");
            }
            let outcome = slider.pointer_down(x, width).await;
            slider.pointer_up();
            println!("value={}", slider.state().props.value);
            match outcome {
                Some(outcome) => report(&outcome)?,
                None => println!("value unchanged, nothing dispatched"),
            }
            session.shutdown();
        }
    }

    Ok(())
}

/// Session that dispatches over HTTP but renders from built-in templates.
fn headless_session(config: &SessionConfig) -> EditorSession {
    let mut services = WidgetServices::new(
        Arc::new(CommandDispatcher::http(config.command_url())),
        Arc::new(GridContainers::new()),
        Arc::new(StaticTemplates::builtin()),
    );
    services.default_address = config.default_address.clone();
    EditorSession::new(services)
}

async fn watch(config: &SessionConfig, addrs: &[String]) -> Result<()> {
    let channel = PushChannel::new(config.push_capacity);
    let mut updates = channel.subscribe();
    let mut feed = spawn_push_feed(&config.push_url()?, channel, addrs).await?;

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(update) => {
                    if addrs.is_empty() || addrs.contains(&update.command_id) {
                        println!(
                            "{} = {}",
                            update.command_id,
                            update.display_text().unwrap_or_default()
                        );
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "watch fell behind");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
            _ = &mut feed => {
                println!("push feed closed");
                break;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    feed.abort();
    Ok(())
}

fn report(outcome: &CommandOutcome) -> Result<()> {
    if !outcome.ok {
        bail!(
            "command failed: {}",
            outcome.error.as_deref().unwrap_or("rejected")
        );
    }
    if let Some(raw) = &outcome.raw {
        println!("reply: {raw}");
    } else {
        println!("ok");
    }
    Ok(())
}
