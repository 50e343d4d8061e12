//! SQLite backed implementations of the store traits.
//!
//! The stores share a single [Connection](rusqlite::Connection) behind an
//! `Arc<Mutex<...>>`. Monetary amounts are stored as decimal TEXT and parsed
//! back into [Decimal](rust_decimal::Decimal) so that sums and comparisons
//! never go through binary floating point.

mod savings_goal;
mod transaction;
mod user;

pub use savings_goal::SQLiteSavingsGoalStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

use rusqlite::types::Type;
use rust_decimal::Decimal;

/// Parse a TEXT column at `index` holding a decimal amount.
pub(crate) fn parse_decimal_column(value: String, index: usize) -> Result<Decimal, rusqlite::Error> {
    value.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}
