//! Contains traits and implementations for objects that store the domain [models](crate::models).

mod savings_goal;
mod transaction;
mod user;

pub mod sqlite;

pub use savings_goal::SavingsGoalStore;
pub use transaction::{SortOrder, TransactionQuery, TransactionStore, month_date_range};
pub use user::UserStore;
