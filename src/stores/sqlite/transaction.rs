//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Type, types::Value};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Transaction, TransactionBuilder, TransactionKind, UserID},
    stores::{
        TransactionStore,
        transaction::{SortOrder, TransactionQuery},
    },
};

use super::parse_decimal_column;

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction belongs to a [User](crate::models::User),
/// the user table must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn create_from_builder(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO \"transaction\" (user_id, date, amount, kind, comment)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                builder.user_id.as_i64(),
                &builder.date,
                builder.amount.to_string(),
                builder.kind.to_string(),
                &builder.comment,
            ),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Transaction {
            id,
            user_id: builder.user_id,
            date: builder.date,
            amount: builder.amount,
            kind: builder.kind,
            comment: builder.comment,
        })
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, date, amount, kind, comment FROM \"transaction\"
                 WHERE id = :id AND user_id = :user_id",
            )?
            .query_row(
                &[(":id", &id), (":user_id", &user_id.as_i64())],
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Query for transactions in the database.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get_query(&self, filter: TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let mut query_string_parts = vec![
            "SELECT id, user_id, date, amount, kind, comment FROM \"transaction\" \
             WHERE user_id = ?1"
                .to_string(),
        ];
        let mut query_parameters = vec![Value::Integer(filter.user_id.as_i64())];

        if let Some(date_range) = filter.date_range {
            query_string_parts.push(format!(
                "AND date BETWEEN ?{} AND ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Text(date_range.start().to_string()));
            query_parameters.push(Value::Text(date_range.end().to_string()));
        }

        match filter.sort_date {
            Some(SortOrder::Ascending) => query_string_parts.push("ORDER BY date ASC".to_string()),
            Some(SortOrder::Descending) => {
                query_string_parts.push("ORDER BY date DESC".to_string())
            }
            None => {}
        }

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params, Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Persist the fields of an existing transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if the transaction is not in the database or not owned by `transaction.user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, transaction: &Transaction) -> Result<(), Error> {
        let rows_updated = self.connection.lock().unwrap().execute(
            "UPDATE \"transaction\" SET date = ?1, amount = ?2, kind = ?3, comment = ?4
             WHERE id = ?5 AND user_id = ?6",
            (
                &transaction.date,
                transaction.amount.to_string(),
                transaction.kind.to_string(),
                &transaction.comment,
                transaction.id,
                transaction.user_id.as_i64(),
            ),
        )?;

        if rows_updated == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Delete a transaction owned by `user_id` from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID, user_id: UserID) -> Result<(), Error> {
        let rows_deleted = self.connection.lock().unwrap().execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )?;

        if rows_deleted == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    date TEXT NOT NULL,
                    amount TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    comment TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let user_id = UserID::new(row.get(offset + 1)?);
        let date = row.get(offset + 2)?;

        let raw_amount: String = row.get(offset + 3)?;
        let amount = parse_decimal_column(raw_amount, offset + 3)?;

        let raw_kind: String = row.get(offset + 4)?;
        let kind = raw_kind.parse::<TransactionKind>().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 4, Type::Text, Box::new(error))
        })?;

        let comment = row.get(offset + 5)?;

        Ok(Transaction {
            id,
            user_id,
            date,
            amount,
            kind,
            comment,
        })
    }
}
