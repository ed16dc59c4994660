//! Stateless calculators

use actix_web::{web, HttpResponse};

use bankroll::core::compounding::{self, project_balance_over_time, MAX_PROJECTION_DAYS};
use bankroll::core::kelly::recommend_stake;
use bankroll::core::streak::survival_table;
use bankroll::error::{validate_amount, validate_odds, validate_reinvestment, AppError};
use bankroll::models::{
    DaysToTargetRequest, KellyRequest, ProjectionRequest, SurvivalRequest, SurvivalResponse,
};

const MAX_SURVIVAL_ROWS: usize = 100;

/// Kelly stake recommendation
///
/// Out-of-domain input is answered with a "not a value bet" recommendation.
pub async fn kelly(req: web::Json<KellyRequest>) -> HttpResponse {
    HttpResponse::Ok().json(recommend_stake(req.bankroll, req.odds, req.win_probability))
}

/// Best-case compounding projection
pub async fn projection(req: web::Json<ProjectionRequest>) -> Result<HttpResponse, AppError> {
    validate_amount("Stake", req.stake)?;
    validate_odds(req.odds)?;
    validate_reinvestment(req.reinvestment_fraction)?;
    if req.days > MAX_PROJECTION_DAYS {
        return Err(AppError::Validation(format!(
            "Projection is limited to {} days, got {}",
            MAX_PROJECTION_DAYS, req.days
        )));
    }

    let points = project_balance_over_time(req.stake, req.odds, req.reinvestment_fraction, req.days);
    Ok(HttpResponse::Ok().json(points))
}

/// Winning days needed to reach a target balance
pub async fn days_to_target(
    req: web::Json<DaysToTargetRequest>,
) -> Result<HttpResponse, AppError> {
    validate_amount("Current balance", req.current_balance)?;
    validate_amount("Target balance", req.target_balance)?;
    validate_odds(req.odds)?;
    validate_reinvestment(req.reinvestment_fraction)?;

    let result = compounding::days_to_target(
        req.current_balance,
        req.target_balance,
        req.odds,
        req.reinvestment_fraction,
    );
    Ok(HttpResponse::Ok().json(result))
}

/// Survival probability table
pub async fn survival(req: web::Json<SurvivalRequest>) -> Result<HttpResponse, AppError> {
    if !(0.0..=1.0).contains(&req.win_rate) {
        return Err(AppError::Validation(format!(
            "Win rate must be between 0 and 1, got {}",
            req.win_rate
        )));
    }
    if req.days.len() > MAX_SURVIVAL_ROWS {
        return Err(AppError::Validation(format!(
            "At most {} horizons per table",
            MAX_SURVIVAL_ROWS
        )));
    }

    Ok(HttpResponse::Ok().json(SurvivalResponse {
        win_rate: req.win_rate,
        rows: survival_table(req.win_rate, &req.days),
    }))
}
