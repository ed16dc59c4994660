use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod handlers;

use bankroll::config::ServerConfig;
use bankroll::{Ledger, LedgerStore};
use handlers::{calc, funds, health, stats, streams};

/// Application state shared across handlers
pub struct AppState {
    pub store: LedgerStore,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let config = ServerConfig::from_env();
    let addr = config.bind_addr();

    let store = match config.ledger_path {
        Some(ref path) => {
            info!("Opening ledger at {:?}", path);
            LedgerStore::open(path, &config.currency)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?
        }
        None => {
            warn!("LEDGER_PATH not set, ledger is kept in memory only");
            LedgerStore::in_memory(Ledger::seeded(config.currency.clone()))
        }
    };

    let app_state = Arc::new(AppState { store });

    info!("Starting bankroll API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(health::health_check))
            .route("/bankroll", web::get().to(funds::get_bankroll))
            .route("/bankroll/deposit", web::post().to(funds::deposit))
            .route("/bankroll/withdraw", web::post().to(funds::withdraw))
            .route("/streams", web::get().to(streams::list_streams))
            .route("/streams", web::post().to(streams::create_stream))
            .route("/streams/{id}", web::get().to(streams::get_stream))
            .route("/streams/{id}/bets", web::post().to(streams::place_bet))
            .route("/streams/{id}/cashout", web::post().to(streams::cash_out))
            .route("/streams/{id}/complete", web::post().to(streams::complete_stream))
            .route("/bets/{id}", web::get().to(streams::get_bet))
            .route("/bets/{id}/settle", web::post().to(streams::settle_bet))
            .route("/leagues", web::get().to(stats::list_leagues))
            .route("/market-types", web::get().to(stats::list_market_types))
            .route("/stats", web::get().to(stats::get_stats))
            .route("/calc/kelly", web::post().to(calc::kelly))
            .route("/calc/projection", web::post().to(calc::projection))
            .route("/calc/days-to-target", web::post().to(calc::days_to_target))
            .route("/calc/survival", web::post().to(calc::survival))
    })
    .bind(&addr)?
    .run()
    .await
}
