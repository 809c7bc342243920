use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A tracked base symbol together with the quote symbols it is priced against.
/// Identity is the base symbol; the quote set may grow but never shrinks
/// implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: String,
    pub quotes: Vec<String>,
}

/// How a day window of observations is reduced to a single value per
/// (base, quote) pair. Wire spellings match the public query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AggregationOption {
    #[default]
    #[serde(rename = "last")]
    Last,
    #[serde(rename = "avg")]
    Average,
    #[serde(rename = "min")]
    Minimum,
    #[serde(rename = "max")]
    Maximum,
}

impl AggregationOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationOption::Last => "last",
            AggregationOption::Average => "avg",
            AggregationOption::Minimum => "min",
            AggregationOption::Maximum => "max",
        }
    }
}

impl std::fmt::Display for AggregationOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One priced quote symbol inside a rate view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePrice {
    pub symbol: String,
    pub amount: f64,
}

/// Query result for one base currency: its in-window prices ordered by quote
/// symbol. `as_of` is the latest contributing observation in the window, even
/// when the reduced amount is not any single observation's raw value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateView {
    pub title: String,
    pub values: Vec<QuotePrice>,
    pub as_of: NaiveDateTime,
}

/// Row shape returned by the windowed aggregation queries, one per
/// (base, quote) pair, ordered by base then quote symbol.
#[derive(QueryableByName, Debug, Clone, PartialEq)]
pub struct ObservationRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub base_symbol: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub quote_symbol: String,
    #[diesel(sql_type = diesel::sql_types::Double)]
    pub amount: f64,
    #[diesel(sql_type = diesel::sql_types::Timestamp)]
    pub observed_at: NaiveDateTime,
}

/// Database model for a stored observation
#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::observations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ObservationDB {
    pub base_symbol: String,
    pub quote_symbol: String,
    pub amount: f64,
    pub observed_at: NaiveDateTime,
}

#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::currencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CurrencyDB {
    pub symbol: String,
    pub added_at: NaiveDateTime,
}

#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::quote_symbols)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuoteSymbolDB {
    pub symbol: String,
}
