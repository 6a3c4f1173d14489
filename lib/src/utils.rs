use chrono::NaiveDate;

use crate::price_service::*;
use crate::forecaster::ForecastPoint;

/// Orders observations by date. Observations sharing a date keep their relative order.
pub fn normalize_series(mut series : Series) -> Series {
    series.sort_by_key(|o| o.date);
    series
}

pub fn find_price_range(series : &[Observation], forecast : &[ForecastPoint]) -> (f64, f64) {
    let mut min_price = f64::INFINITY;
    let mut max_price = f64::NEG_INFINITY;
    let prices = series.iter().map(|o| o.price).chain(forecast.iter().map(|p| p.price));
    for price in prices {
        min_price = min_price.min(price);
        max_price = max_price.max(price);
    }

    (min_price, max_price)
}

pub fn history_entry_name(symbol : &str, from_date : &NaiveDate, to_date : &NaiveDate) -> String {
    format!("{}_{}_{}",
        symbol.replace("/", "_").replace("^", "_"),
        from_date.format("%Y%m%d"),
        to_date.format("%Y%m%d"))
}
