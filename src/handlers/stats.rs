use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::AppState;
use bankroll::analytics::build_report;
use bankroll::error::AppError;
use bankroll::models::{League, MarketType};

/// Leagues with their running hit rates
pub async fn list_leagues(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let leagues: Vec<League> = state
        .store
        .read(|l| l.leagues.values().cloned().collect())?;
    Ok(HttpResponse::Ok().json(leagues))
}

/// Market types with their running hit rates
pub async fn list_market_types(
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, AppError> {
    let market_types: Vec<MarketType> = state
        .store
        .read(|l| l.market_types.values().cloned().collect())?;
    Ok(HttpResponse::Ok().json(market_types))
}

/// Performance metrics and breakdowns
pub async fn get_stats(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let report = state.store.read(build_report)?;
    Ok(HttpResponse::Ok().json(report))
}
