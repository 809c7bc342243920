use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Text, Timestamp};
use std::sync::Arc;

use super::rates_model::{
    AggregationOption, CurrencyDB, CurrencyPair, ObservationDB, ObservationRow, QuoteSymbolDB,
};
use super::rates_traits::ObservationRepositoryTrait;
use crate::db::{get_connection, DbPool, DbTransactionExecutor};
use crate::errors::{DatabaseError, Result};
use crate::schema::{currencies, observations, quote_symbols};

pub struct ObservationRepository {
    pool: Arc<DbPool>,
}

impl ObservationRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Builds the windowed query for one aggregation option. This is the only
    /// place the option is dispatched; the enum being closed means a new
    /// variant fails to compile here instead of silently falling back.
    fn window_sql(option: AggregationOption, single_currency: bool) -> String {
        let currency_filter = if single_currency {
            "AND base_symbol = ?"
        } else {
            ""
        };

        match option {
            AggregationOption::Last => format!(
                "WITH ranked AS (
                     SELECT base_symbol, quote_symbol, amount, observed_at,
                            ROW_NUMBER() OVER (
                                PARTITION BY base_symbol, quote_symbol
                                ORDER BY observed_at DESC, amount DESC
                            ) AS rn
                     FROM observations
                     WHERE observed_at >= ? AND observed_at < ? {currency_filter}
                 )
                 SELECT base_symbol, quote_symbol, amount, observed_at
                 FROM ranked
                 WHERE rn = 1
                 ORDER BY base_symbol, quote_symbol"
            ),
            AggregationOption::Average | AggregationOption::Minimum | AggregationOption::Maximum => {
                let agg = match option {
                    AggregationOption::Average => "AVG",
                    AggregationOption::Minimum => "MIN",
                    _ => "MAX",
                };
                format!(
                    "SELECT base_symbol, quote_symbol,
                            {agg}(amount) AS amount,
                            MAX(observed_at) AS observed_at
                     FROM observations
                     WHERE observed_at >= ? AND observed_at < ? {currency_filter}
                     GROUP BY base_symbol, quote_symbol
                     ORDER BY base_symbol, quote_symbol"
                )
            }
        }
    }
}

impl ObservationRepositoryTrait for ObservationRepository {
    fn exists_pair(&self, symbol: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;

        let count: i64 = currencies::table
            .filter(currencies::symbol.eq(symbol))
            .count()
            .get_result(&mut conn)
            .map_err(DatabaseError::QueryFailed)?;

        Ok(count > 0)
    }

    fn register_pair(&self, symbol: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        diesel::insert_into(currencies::table)
            .values(&CurrencyDB {
                symbol: symbol.to_string(),
                added_at: Utc::now().naive_utc(),
            })
            .on_conflict(currencies::symbol)
            .do_nothing()
            .execute(&mut conn)
            .map_err(DatabaseError::QueryFailed)?;

        Ok(())
    }

    fn list_tracked_pairs(&self) -> Result<Vec<CurrencyPair>> {
        let mut conn = get_connection(&self.pool)?;

        let bases: Vec<String> = currencies::table
            .select(currencies::symbol)
            .order(currencies::symbol.asc())
            .load(&mut conn)
            .map_err(DatabaseError::QueryFailed)?;

        let quotes: Vec<String> = quote_symbols::table
            .select(quote_symbols::symbol)
            .order(quote_symbols::symbol.asc())
            .load(&mut conn)
            .map_err(DatabaseError::QueryFailed)?;

        Ok(bases
            .into_iter()
            .map(|base| CurrencyPair {
                base,
                quotes: quotes.clone(),
            })
            .collect())
    }

    fn list_quote_symbols(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;

        quote_symbols::table
            .select(quote_symbols::symbol)
            .order(quote_symbols::symbol.asc())
            .load(&mut conn)
            .map_err(|e| DatabaseError::QueryFailed(e).into())
    }

    fn register_quote_symbol(&self, symbol: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        diesel::insert_into(quote_symbols::table)
            .values(&QuoteSymbolDB {
                symbol: symbol.to_string(),
            })
            .on_conflict(quote_symbols::symbol)
            .do_nothing()
            .execute(&mut conn)
            .map_err(DatabaseError::QueryFailed)?;

        Ok(())
    }

    fn upsert_observations(
        &self,
        base: &str,
        prices: &[(String, f64)],
        observed_at: NaiveDateTime,
    ) -> Result<()> {
        // One transaction per currency: a cancelled batch can drop a whole
        // currency but never leave a timestamp with partial quote rows.
        self.pool.execute(|tx| {
            for (quote_symbol, amount) in prices {
                let row = ObservationDB {
                    base_symbol: base.to_string(),
                    quote_symbol: quote_symbol.clone(),
                    amount: *amount,
                    observed_at,
                };
                diesel::insert_into(observations::table)
                    .values(&row)
                    .on_conflict((
                        observations::base_symbol,
                        observations::quote_symbol,
                        observations::observed_at,
                    ))
                    .do_update()
                    .set(observations::amount.eq(row.amount))
                    .execute(tx)?;
            }
            Ok(())
        })
    }

    fn query_window(
        &self,
        currency: Option<&str>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        option: AggregationOption,
    ) -> Result<Vec<ObservationRow>> {
        let mut conn = get_connection(&self.pool)?;
        let sql = Self::window_sql(option, currency.is_some());

        let rows = match currency {
            Some(symbol) => diesel::sql_query(sql)
                .bind::<Timestamp, _>(start)
                .bind::<Timestamp, _>(end)
                .bind::<Text, _>(symbol)
                .load::<ObservationRow>(&mut conn),
            None => diesel::sql_query(sql)
                .bind::<Timestamp, _>(start)
                .bind::<Timestamp, _>(end)
                .load::<ObservationRow>(&mut conn),
        }
        .map_err(DatabaseError::QueryFailed)?;

        Ok(rows)
    }
}
