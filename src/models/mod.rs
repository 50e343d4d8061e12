//! This module defines the domain data types.

pub use password::{PasswordHash, ValidatedPassword};
pub use savings_goal::{MAX_GOAL_NAME_LENGTH, SavingsGoal};
pub use transaction::{
    MAX_COMMENT_LENGTH, ParseTransactionKindError, Transaction, TransactionBuilder,
    TransactionKind,
};
pub use user::{User, UserID, UserProfile};

mod password;
mod savings_goal;
mod transaction;
mod user;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
