//! The savings goal engine and its route handlers.
//!
//! This module is the only code path that changes a goal's saved amount.
//! Money can only move into a goal while the owner's available balance
//! covers it, and can only move out while the goal's saved amount covers
//! it. Both checks happen before any write, so a rejected operation never
//! leaves a partial change behind.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    auth::Claims,
    balance::calculate_balance,
    models::{DatabaseID, MAX_GOAL_NAME_LENGTH, SavingsGoal, UserID},
    state::AppState,
    stores::{SavingsGoalStore, TransactionStore},
};

/// The request body for creating a savings goal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoal {
    /// The name of the goal.
    pub name: String,
    /// The amount the user wants to save.
    pub goal_amount: Decimal,
}

/// The request body for moving money into or out of a savings goal.
#[derive(Debug, Deserialize)]
pub struct AmountChange {
    /// The amount to move. Must be strictly positive.
    pub amount: Decimal,
}

/// Create a new savings goal for `user_id` with nothing saved yet.
///
/// No balance check is needed since no money moves.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyGoalName] if `name` is empty or whitespace,
/// - [Error::GoalNameTooLong] if `name` is longer than [MAX_GOAL_NAME_LENGTH] characters,
/// - or [Error::NegativeAmount] if `goal_amount` is negative (zero is allowed).
pub fn create_goal<G>(
    savings_goals: &mut G,
    user_id: UserID,
    name: &str,
    goal_amount: Decimal,
) -> Result<SavingsGoal, Error>
where
    G: SavingsGoalStore,
{
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyGoalName);
    }

    if name.chars().count() > MAX_GOAL_NAME_LENGTH {
        return Err(Error::GoalNameTooLong);
    }

    if goal_amount < Decimal::ZERO {
        return Err(Error::NegativeAmount);
    }

    savings_goals.create(user_id, name, goal_amount)
}

/// Move `amount` into the savings goal `goal_id` owned by `user_id`.
///
/// The owner's available balance is recomputed from the current persisted
/// state immediately before the check, and the goal is only written after
/// the check passes. An amount exactly equal to the available balance is
/// allowed and drives the balance to zero. The goal amount is not a cap:
/// the saved amount may overshoot it.
///
/// Callers that can race with themselves must hold the owner's
/// [user lock](crate::state::UserLocks) across this call.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if `amount` is zero or negative,
/// - [Error::NotFound] if `goal_id` does not refer to a goal owned by `user_id`,
/// - or [Error::InsufficientBalance] if `amount` exceeds the available
///   balance; the goal is left untouched.
pub fn add_to_goal<T, G>(
    transactions: &T,
    savings_goals: &mut G,
    user_id: UserID,
    goal_id: DatabaseID,
    amount: Decimal,
) -> Result<SavingsGoal, Error>
where
    T: TransactionStore,
    G: SavingsGoalStore,
{
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount);
    }

    let mut goal = savings_goals.get(goal_id, user_id)?;

    let balance = calculate_balance(transactions, &*savings_goals, user_id)?;

    if amount > balance.available {
        return Err(Error::InsufficientBalance {
            available: balance.available,
        });
    }

    goal.current_amount += amount;
    savings_goals.save(&goal)?;

    Ok(goal)
}

/// Move `amount` out of the savings goal `goal_id` owned by `user_id`.
///
/// An amount exactly equal to the saved amount is allowed and drives the
/// goal to zero; the saved amount can never go negative.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if `amount` is zero or negative,
/// - [Error::NotFound] if `goal_id` does not refer to a goal owned by `user_id`,
/// - or [Error::InvalidWithdrawal] if `amount` exceeds the goal's saved
///   amount; the goal is left untouched.
pub fn remove_from_goal<G>(
    savings_goals: &mut G,
    user_id: UserID,
    goal_id: DatabaseID,
    amount: Decimal,
) -> Result<SavingsGoal, Error>
where
    G: SavingsGoalStore,
{
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount);
    }

    let mut goal = savings_goals.get(goal_id, user_id)?;

    if amount > goal.current_amount {
        return Err(Error::InvalidWithdrawal);
    }

    goal.current_amount -= amount;
    savings_goals.save(&goal)?;

    Ok(goal)
}

/// Delete the savings goal `goal_id` owned by `user_id`.
///
/// No balance recomputation is needed: dropping the goal implicitly frees
/// its saved amount for future operations, since the total saved shrinks.
///
/// # Errors
/// Returns an [Error::NotFound] if `goal_id` does not refer to a goal owned
/// by `user_id`.
pub fn delete_goal<G>(savings_goals: &mut G, user_id: UserID, goal_id: DatabaseID) -> Result<(), Error>
where
    G: SavingsGoalStore,
{
    savings_goals.delete(goal_id, user_id)
}

/// A route handler for listing the caller's savings goals.
pub async fn get_savings_goals(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Response, Error> {
    let goals = state.savings_goal_store.get_by_user(claims.sub)?;

    Ok(Json(goals).into_response())
}

/// A route handler for creating a new savings goal.
pub async fn create_savings_goal(
    State(mut state): State<AppState>,
    claims: Claims,
    Json(new_goal): Json<NewSavingsGoal>,
) -> Result<Response, Error> {
    let goal = create_goal(
        &mut state.savings_goal_store,
        claims.sub,
        &new_goal.name,
        new_goal.goal_amount,
    )?;

    Ok((StatusCode::CREATED, Json(goal)).into_response())
}

/// A route handler for moving money into a savings goal.
///
/// Holds the caller's user lock across the balance check and the write, so
/// two in-flight requests cannot both spend the same balance.
pub async fn add_to_savings_goal(
    State(mut state): State<AppState>,
    claims: Claims,
    Path(goal_id): Path<DatabaseID>,
    Json(change): Json<AmountChange>,
) -> Result<Response, Error> {
    let lock = state.user_locks.for_user(claims.sub);
    let _guard = lock.lock().await;

    let goal = add_to_goal(
        &state.transaction_store,
        &mut state.savings_goal_store,
        claims.sub,
        goal_id,
        change.amount,
    )?;

    Ok(Json(goal).into_response())
}

/// A route handler for moving money out of a savings goal.
pub async fn remove_from_savings_goal(
    State(mut state): State<AppState>,
    claims: Claims,
    Path(goal_id): Path<DatabaseID>,
    Json(change): Json<AmountChange>,
) -> Result<Response, Error> {
    let lock = state.user_locks.for_user(claims.sub);
    let _guard = lock.lock().await;

    let goal = remove_from_goal(
        &mut state.savings_goal_store,
        claims.sub,
        goal_id,
        change.amount,
    )?;

    Ok(Json(goal).into_response())
}

/// A route handler for deleting a savings goal.
pub async fn delete_savings_goal(
    State(mut state): State<AppState>,
    claims: Claims,
    Path(goal_id): Path<DatabaseID>,
) -> Result<Response, Error> {
    delete_goal(&mut state.savings_goal_store, claims.sub, goal_id)?;

    Ok(Json(json!({ "message": "Savings goal deleted" })).into_response())
}
