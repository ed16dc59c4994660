use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

use super::run_transaction;
use crate::AppState;
use bankroll::error::AppError;
use bankroll::models::{
    AmountRequest, CreateStreamRequest, PlaceBetRequest, SettleBetRequest, Stream,
};

/// Default and maximum projection horizon of the stream page
const DEFAULT_PROJECTION_DAYS: u32 = 30;
const MAX_PROJECTION_DAYS: u32 = 365;

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub days: Option<u32>,
}

/// List all streams
pub async fn list_streams(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let streams: Vec<Stream> = state
        .store
        .read(|l| l.streams.values().cloned().collect())?;
    Ok(HttpResponse::Ok().json(streams))
}

/// Fund a new stream
pub async fn create_stream(
    state: web::Data<Arc<AppState>>,
    req: web::Json<CreateStreamRequest>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let stream = run_transaction(&state, move |l| l.create_stream(&req).cloned()).await?;
    Ok(HttpResponse::Created().json(stream))
}

/// Stream detail with bets, streaks and projection
pub async fn get_stream(
    state: web::Data<Arc<AppState>>,
    path: web::Path<u64>,
    query: web::Query<StreamQuery>,
) -> Result<HttpResponse, AppError> {
    let days = query
        .days
        .unwrap_or(DEFAULT_PROJECTION_DAYS)
        .min(MAX_PROJECTION_DAYS);
    let id = path.into_inner();

    let detail = state.store.read(|l| l.stream_detail(id, days))??;
    Ok(HttpResponse::Ok().json(detail))
}

/// Place a bet against a stream
pub async fn place_bet(
    state: web::Data<Arc<AppState>>,
    path: web::Path<u64>,
    req: web::Json<PlaceBetRequest>,
) -> Result<HttpResponse, AppError> {
    let stream_id = path.into_inner();
    let req = req.into_inner();
    let bet = run_transaction(&state, move |l| l.place_bet(stream_id, &req).cloned()).await?;
    Ok(HttpResponse::Created().json(bet))
}

/// Move part of a stream's balance back to the bankroll
pub async fn cash_out(
    state: web::Data<Arc<AppState>>,
    path: web::Path<u64>,
    req: web::Json<AmountRequest>,
) -> Result<HttpResponse, AppError> {
    let stream_id = path.into_inner();
    let amount = req.amount;
    let stream = run_transaction(&state, move |l| l.cash_out(stream_id, amount).cloned()).await?;
    Ok(HttpResponse::Ok().json(stream))
}

/// Close a stream and release its balance
pub async fn complete_stream(
    state: web::Data<Arc<AppState>>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let stream_id = path.into_inner();
    let stream = run_transaction(&state, move |l| l.complete_stream(stream_id).cloned()).await?;
    Ok(HttpResponse::Ok().json(stream))
}

/// Single bet
pub async fn get_bet(
    state: web::Data<Arc<AppState>>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let bet_id = path.into_inner();
    let bet = state.store.read(|l| l.bet(bet_id).cloned())??;
    Ok(HttpResponse::Ok().json(bet))
}

/// Settle a pending bet from per-selection outcomes
pub async fn settle_bet(
    state: web::Data<Arc<AppState>>,
    path: web::Path<u64>,
    req: web::Json<SettleBetRequest>,
) -> Result<HttpResponse, AppError> {
    let bet_id = path.into_inner();
    let outcomes = req.into_inner().outcomes;
    let report = run_transaction(&state, move |l| l.settle_bet(bet_id, &outcomes)).await?;
    Ok(HttpResponse::Ok().json(report))
}
