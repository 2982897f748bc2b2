// ============================================================================
// LazyForex - Cotations forex dans le terminal
// ============================================================================
// Affiche la paire sélectionnée, son prix, sa variation et un graphique des
// closes pour la période choisie. Les données viennent de l'API Massive.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Async dans sync : les opérations du store sont lancées sur un runtime
//    tokio, l'event loop reste synchrone
// 4. Arc : le store est partagé entre l'event loop et les tâches async
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};

use lazyforex::api::MassiveClient;
use lazyforex::app::App;
use lazyforex::config::Config;
use lazyforex::models::Timeframe;
use lazyforex::store::{MarketDataStore, MarketState};
use lazyforex::ui::events::{
    is_clear_error_event, is_down_event, is_enter_event, is_escape_event, is_next_timeframe_event,
    is_picker_event, is_previous_timeframe_event, is_quit_event, is_refresh_event, is_up_event,
    Event, EventHandler,
};
use lazyforex::ui::render;

// ============================================================================
// StoreCommand : opérations async lancées depuis l'event loop
// ============================================================================
// CONCEPT RUST : Command pattern
// - L'event loop décrit ce qu'il veut faire
// - dispatch() lance l'opération sur le runtime sans bloquer l'UI
// - Le résultat arrive dans le store ; l'UI le voit au prochain rendu
// ============================================================================

#[derive(Debug, Clone)]
enum StoreCommand {
    /// Charger le catalogue des paires
    LoadPairs,

    /// Recharger la série de la sélection courante
    Refresh,

    /// Changer de paire
    SelectPair { base: String, quote: String },
}

/// Lance une commande sur le runtime tokio
///
/// Plusieurs fetchs peuvent se chevaucher : le store ne garde que la réponse
/// du plus récent.
fn dispatch(runtime: &Runtime, store: &Arc<MarketDataStore>, command: StoreCommand) {
    debug!(?command, "Dispatching store command");
    let store = Arc::clone(store);

    runtime.spawn(async move {
        match command {
            StoreCommand::LoadPairs => store.fetch_available_pairs().await,
            StoreCommand::Refresh => store.fetch_historical_data(None, None).await,
            StoreCommand::SelectPair { base, quote } => store.set_selected_pair(&base, &quote).await,
        }
    });
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier, rotation quotidienne
// ============================================================================

/// Répertoire des logs
///
/// - Linux : ~/.local/share/lazyforex/logs
/// - macOS : ~/Library/Application Support/lazyforex/logs
/// - Sinon : ./logs
fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("lazyforex").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialise le système de logging vers fichier
///
/// ```bash
/// tail -f ~/.local/share/lazyforex/logs/lazyforex.log.*
/// RUST_LOG=lazyforex=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazyforex.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true) // Les fetchs tournent sur les workers tokio
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazyforex=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // .env optionnel : absent = configuration par variables d'environnement
    let dotenv = dotenvy::dotenv().ok();

    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(dotenv = ?dotenv, "LazyForex starting up");

    let config = Config::from_env();
    if config.api_key.is_none() {
        warn!("MASSIVE_API_KEY is not set, requests will be rejected");
    }

    let client = MassiveClient::new(config.clone()).context("Impossible de créer le client HTTP")?;
    let store = Arc::new(MarketDataStore::with_tickers_limit(
        Arc::new(client),
        config.tickers_limit,
    ));

    let runtime = Runtime::new().context("Impossible de créer le runtime tokio")?;

    // Chargement initial : catalogue + série de la paire par défaut
    dispatch(&runtime, &store, StoreCommand::LoadPairs);
    dispatch(&runtime, &store, StoreCommand::Refresh);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new();
    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &store, &runtime, &events);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    // Les fetchs encore en vol sont abandonnés
    runtime.shutdown_background();

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   1. Snapshot du store + rendu
//   2. Lecture d'un événement (ou Tick après 250ms)
//   3. Traitement de l'événement
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &Arc<MarketDataStore>,
    runtime: &Runtime,
    events: &EventHandler,
) -> Result<()> {
    while app.is_running() {
        let state = store.snapshot();

        terminal.draw(|frame| render(frame, app, &state))?;

        match events.next() {
            Ok(event) => handle_event(app, &state, event, store, runtime),
            Err(e) => warn!(error = %e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement : navigation locale ou commande vers le store
fn handle_event(
    app: &mut App,
    state: &MarketState,
    event: Event,
    store: &Arc<MarketDataStore>,
    runtime: &Runtime,
) {
    match event {
        Event::Key(_) if is_quit_event(&event) => {
            // Two-step confirmation pour éviter les quits accidentels
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        // ========================================
        // Sélecteur de paire
        // ========================================
        Event::Key(_) if is_escape_event(&event) && app.is_on_picker() => {
            app.cancel_quit();
            debug!("User closed pair picker");
            app.close_picker();
        }
        Event::Key(_) if is_up_event(&event) && app.is_on_picker() => {
            app.cancel_quit();
            app.picker_up();
        }
        Event::Key(_) if is_down_event(&event) && app.is_on_picker() => {
            app.cancel_quit();
            app.picker_down(state.unique_currencies().len());
        }
        Event::Key(_) if is_enter_event(&event) && app.is_on_picker() => {
            app.cancel_quit();
            if let Some((base, quote)) = app.confirm_picker(&state.unique_currencies()) {
                info!(base = %base, quote = %quote, "User selected pair");
                dispatch(runtime, store, StoreCommand::SelectPair { base, quote });
            }
        }

        // ========================================
        // Dashboard
        // ========================================
        Event::Key(_) if is_picker_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            info!("User opened pair picker");
            app.open_picker();
        }
        Event::Key(_) if is_next_timeframe_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            step_timeframe(store, runtime, Timeframe::next);
        }
        Event::Key(_) if is_previous_timeframe_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            step_timeframe(store, runtime, Timeframe::previous);
        }
        Event::Key(_) if is_refresh_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            info!("User requested refresh");
            dispatch(runtime, store, StoreCommand::Refresh);
            // Le catalogue a peut-être échoué au démarrage
            if state.available_pairs.is_empty() {
                dispatch(runtime, store, StoreCommand::LoadPairs);
            }
        }
        Event::Key(_) if is_clear_error_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            store.clear_error();
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation de quit
            app.cancel_quit();
        }

        Event::Tick => {}
    }
}

/// Change de période à partir de la sélection courante du store
///
/// La sélection est écrite avant le spawn : deux pressions rapides avancent
/// bien de deux crans, même si aucun fetch n'a encore démarré.
fn step_timeframe(store: &Arc<MarketDataStore>, runtime: &Runtime, step: fn(&Timeframe) -> Timeframe) {
    let timeframe = step(&store.snapshot().timeframe);
    debug!(timeframe = %timeframe, "User stepped timeframe");
    store.select_timeframe(timeframe);
    dispatch(runtime, store, StoreCommand::Refresh);
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
