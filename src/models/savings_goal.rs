//! This file defines the type `SavingsGoal`, a named pot of money a user is
//! saving towards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DatabaseID, UserID};

/// The maximum number of characters allowed in a savings goal name.
pub const MAX_GOAL_NAME_LENGTH: usize = 100;

/// A named savings target with the amount saved towards it so far.
///
/// `current_amount` starts at zero and is only ever changed by the savings
/// goal operations in [crate::savings], which check the owner's available
/// balance before money goes in and the saved amount before money comes out.
/// The goal amount is a target, not a cap: the saved amount may pass it as
/// long as the balance check holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    /// The ID of the savings goal.
    pub id: DatabaseID,
    /// The ID of the user that owns this savings goal.
    pub user_id: UserID,
    /// The name of the goal, e.g. "Holiday" or "New laptop".
    pub name: String,
    /// The amount the user wants to save. Set at creation and immutable.
    pub goal_amount: Decimal,
    /// The amount saved so far. Never negative.
    pub current_amount: Decimal,
}
