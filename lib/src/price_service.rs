use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::{automock};

#[derive(Debug, PartialEq, Clone, Deserialize, Serialize)]
pub struct Observation {
    pub date : NaiveDate,
    pub price : f64
}

pub type Series = Vec<Observation>;

#[derive(Debug, PartialEq, Clone, Deserialize, Serialize)]
pub struct SeriesMetadata {
    pub symbol : String,
    pub from_date : NaiveDate,
    pub to_date : NaiveDate
}

/// Source of daily closing prices. Ranges are half-open: `[from_date, to_date)`.
#[cfg_attr(test, automock)]
pub trait PriceHistoryService {
    fn get_price_history(&mut self, symbol : &str, from_date : &NaiveDate, to_date : &NaiveDate) -> anyhow::Result<Series>;
    fn max_days_per_call(&mut self) -> anyhow::Result<u32>;
}
