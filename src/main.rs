use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::Duration;

use candleview::CandleviewError;
use candleview::chart::zoom::WHEEL_DEBOUNCE;
use candleview::config::{AppConfig, fetch_config};
use candleview::rest::ApiClient;
use candleview::tui::event::{spawn_event_reader, spawn_tick_timer, update};
use candleview::tui::{
    Action, App, Message, Tui, install_panic_hook, render, restore_terminal, setup_terminal,
};
use candleview::websocket::TickerClient;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

/// How long to wait for the ticker task to close its socket on exit.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

const USAGE: &str = "usage: candleview [tui | articles | post <content>]";

#[tokio::main]
async fn main() -> Result<(), CandleviewError> {
    let app_config = fetch_config()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None | Some("tui") => run_tui(app_config).await,
        Some("articles") => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .init();
            list_articles(&app_config).await
        }
        Some("post") => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .init();
            post_article(&app_config, &args[1..].join(" ")).await
        }
        Some(other) => Err(CandleviewError::Config(format!(
            "unknown command {other:?}; {USAGE}"
        ))),
    }
}

/// Runs the interactive chart and ticker view until the user quits.
async fn run_tui(app_config: AppConfig) -> Result<(), CandleviewError> {
    // The TUI owns stdout, so logs go to a file.
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&app_config.log_file)
        .map_err(|e| {
            CandleviewError::Io(format!("failed to open {}: {e}", app_config.log_file))
        })?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    install_panic_hook();

    let api = ApiClient::new(&app_config.exchange.api_url, &app_config.articles_url)?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let ticker = TickerClient::new(
        app_config.exchange.websocket_url.clone(),
        app_config.exchange.pair.clone(),
        app_config.exchange.reconnect,
        tx.clone(),
        shutdown_rx,
    );
    let ticker_task = tokio::spawn(ticker.run());

    let mut app = App::from_config(&app_config);
    let mut terminal = setup_terminal()?;
    spawn_event_reader(tx.clone());
    // A debounced wheel zoom fires at most one tick late.
    spawn_tick_timer(tx.clone(), WHEEL_DEBOUNCE);

    info!(pair = %app.pair, interval = app.interval.as_str(), "Starting viewer");
    let initial = app.request_chart();
    perform(Action::FetchChart(initial), &api, &tx);

    let result = run_loop(&mut terminal, &mut app, &mut rx, &api, &tx).await;

    let _ = shutdown_tx.send(true);
    restore_terminal(&mut terminal)?;
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, ticker_task)
        .await
        .is_err()
    {
        warn!("Ticker task did not stop in time");
    }

    result
}

/// Draws, waits for the next message, applies it, repeats.
async fn run_loop(
    terminal: &mut Tui,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<Message>,
    api: &ApiClient,
    tx: &mpsc::UnboundedSender<Message>,
) -> Result<(), CandleviewError> {
    while !app.should_quit {
        terminal
            .draw(|frame| render(frame, app))
            .map_err(|e| CandleviewError::Io(e.to_string()))?;

        let Some(message) = rx.recv().await else {
            break;
        };
        if let Some(action) = update(app, message) {
            perform(action, api, tx);
        }

        // Apply everything already queued before the next redraw.
        while let Ok(message) = rx.try_recv() {
            if let Some(action) = update(app, message) {
                perform(action, api, tx);
            }
        }
    }

    info!("Viewer closed");
    Ok(())
}

/// Executes a side effect requested by the reducer.
fn perform(action: Action, api: &ApiClient, tx: &mpsc::UnboundedSender<Message>) {
    match action {
        Action::FetchChart(request) => {
            let api = api.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = api
                    .fetch_chart(&request.pair, request.interval, request.size)
                    .await
                    .map_err(|e| e.to_string());
                let _ = tx.send(Message::ChartLoaded {
                    token: request.token,
                    result,
                });
            });
        }
    }
}

async fn list_articles(app_config: &AppConfig) -> Result<(), CandleviewError> {
    let api = ApiClient::new(&app_config.exchange.api_url, &app_config.articles_url)?;
    let articles = api.list_articles().await?;

    if articles.is_empty() {
        println!("No articles.");
    }
    for article in articles {
        println!("[{}] {}", article.id, article.created_at);
        println!("{}", article.content);
        println!();
    }

    Ok(())
}

async fn post_article(app_config: &AppConfig, content: &str) -> Result<(), CandleviewError> {
    let api = ApiClient::new(&app_config.exchange.api_url, &app_config.articles_url)?;
    match api.create_article(content).await {
        Ok(()) => {
            println!("Article published.");
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to publish article: {e}");
            Err(e)
        }
    }
}
