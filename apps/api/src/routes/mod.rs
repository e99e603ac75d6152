//! Route handlers, one module per resource.
//!
//! Every module exposes `router()`; [`crate::app_router`] nests them under
//! `/api`.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

pub mod budgets;
pub mod categories;
pub mod chat;
pub mod coach;
pub mod goals;
pub mod health;
pub mod profile;
pub mod summary;
pub mod transactions;

/// `?date=YYYY-MM-DD` picking the month to report on.
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

impl DateQuery {
    /// The requested date, or today in UTC.
    ///
    /// This is the only place the API reads the wall clock for reporting.
    pub fn reference_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Utc::now().date_naive())
    }
}
