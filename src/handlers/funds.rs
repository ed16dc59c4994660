use actix_web::{web, HttpResponse};
use std::sync::Arc;

use super::run_transaction;
use crate::AppState;
use bankroll::error::AppError;
use bankroll::models::AmountRequest;

/// Current bankroll snapshot
pub async fn get_bankroll(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let bankroll = state.store.read(|l| l.bankroll.clone())?;
    Ok(HttpResponse::Ok().json(bankroll))
}

/// Add funds to available capital
pub async fn deposit(
    state: web::Data<Arc<AppState>>,
    req: web::Json<AmountRequest>,
) -> Result<HttpResponse, AppError> {
    let amount = req.amount;
    let bankroll = run_transaction(&state, move |l| l.deposit(amount).cloned()).await?;
    Ok(HttpResponse::Ok().json(bankroll))
}

/// Withdraw funds from available capital
pub async fn withdraw(
    state: web::Data<Arc<AppState>>,
    req: web::Json<AmountRequest>,
) -> Result<HttpResponse, AppError> {
    let amount = req.amount;
    let bankroll = run_transaction(&state, move |l| l.withdraw(amount).cloned()).await?;
    Ok(HttpResponse::Ok().json(bankroll))
}
