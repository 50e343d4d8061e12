//! Defines the transaction store trait and the query type used to fetch
//! transactions from it.

use std::ops::RangeInclusive;

use time::{Date, Month};

use crate::{
    Error,
    models::{DatabaseID, Transaction, TransactionBuilder, UserID},
};

/// Handles the creation and retrieval of transactions.
///
/// Every operation is scoped to the owning user: an ID that exists but
/// belongs to another user behaves exactly like an ID that does not exist.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    fn create_from_builder(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Retrieve a transaction owned by `user_id` from the store.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not refer to a transaction
    /// owned by `user_id`.
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<Transaction, Error>;

    /// Retrieve transactions from the store in the way defined by `query`.
    fn get_query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Persist the fields of an existing transaction.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if the transaction is not in the store
    /// or not owned by `transaction.user_id`.
    fn update(&mut self, transaction: &Transaction) -> Result<(), Error>;

    /// Delete a transaction owned by `user_id` from the store.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not refer to a transaction
    /// owned by `user_id`.
    fn delete(&mut self, id: DatabaseID, user_id: UserID) -> Result<(), Error>;
}

/// Defines how transactions should be fetched from [TransactionStore::get_query].
pub struct TransactionQuery {
    /// Only include transactions owned by this user.
    pub user_id: UserID,
    /// Include transactions within `date_range` (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
    /// Orders transactions by date in the order `sort_date`. None returns transactions in the
    /// order they are stored.
    pub sort_date: Option<SortOrder>,
}

impl TransactionQuery {
    /// A query that selects all of `user_id`'s transactions in storage order.
    pub fn for_user(user_id: UserID) -> Self {
        Self {
            user_id,
            date_range: None,
            sort_date: None,
        }
    }
}

/// The order to sort transactions in a [TransactionQuery].
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

/// The inclusive date range covering the calendar month `month` of `year`.
///
/// `month` is 1-based (January is 1).
///
/// # Errors
/// Returns an [Error::InvalidDate] if `month` is not in `1..=12` or `year`
/// is outside the supported calendar range.
pub fn month_date_range(year: i32, month: u8) -> Result<RangeInclusive<Date>, Error> {
    let month = Month::try_from(month).map_err(|error| Error::InvalidDate(error.to_string()))?;

    let start = Date::from_calendar_date(year, month, 1)
        .map_err(|error| Error::InvalidDate(error.to_string()))?;
    let end = Date::from_calendar_date(year, month, time::util::days_in_year_month(year, month))
        .map_err(|error| Error::InvalidDate(error.to_string()))?;

    Ok(start..=end)
}

#[cfg(test)]
mod month_date_range_tests {
    use time::macros::date;

    use crate::Error;

    use super::month_date_range;

    #[test]
    fn covers_whole_month() {
        let range = month_date_range(2026, 1).unwrap();

        assert_eq!(*range.start(), date!(2026 - 01 - 01));
        assert_eq!(*range.end(), date!(2026 - 01 - 31));
    }

    #[test]
    fn handles_leap_years() {
        let range = month_date_range(2024, 2).unwrap();

        assert_eq!(*range.end(), date!(2024 - 02 - 29));
    }

    #[test]
    fn rejects_month_zero() {
        assert!(matches!(
            month_date_range(2026, 0),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn rejects_month_thirteen() {
        assert!(matches!(
            month_date_range(2026, 13),
            Err(Error::InvalidDate(_))
        ));
    }
}
