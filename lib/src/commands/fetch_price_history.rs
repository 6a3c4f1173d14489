use chrono::{NaiveDate, Duration};
use std::ops::Add;
use anyhow::anyhow;
use tracing::{debug, info};

use crate::price_service::*;
use crate::storage::*;
use crate::utils;

/// Fetches `[since_date, to_date)` in as many requests as the service needs, concatenated in date order.
pub fn fetch_series(service : &mut impl PriceHistoryService,
                    symbol : &str,
                    since_date : &NaiveDate,
                    to_date : &NaiveDate) -> anyhow::Result<Series> {
    if to_date <= since_date {
        return Err(anyhow!("Empty date range for {}: {} .. {}", symbol, since_date, to_date));
    }

    let max_days_per_call = service.max_days_per_call()? as i64;
    if max_days_per_call == 0 {
        return Err(anyhow!("Price service does not allow any days per call"));
    }

    let days_needed = to_date.signed_duration_since(*since_date).num_days();
    let requests_needed = days_needed / max_days_per_call;

    let mut series = Vec::new();
    for i in 0..requests_needed {
        let request_from_date = since_date.add(Duration::days(i * max_days_per_call));
        let request_to_date = request_from_date.add(Duration::days(max_days_per_call));
        let mut observations = service.get_price_history(symbol, &request_from_date, &request_to_date)?;
        debug!("Received {} observations for {} .. {}", observations.len(), request_from_date, request_to_date);
        series.append(&mut observations);
    }

    let last_request_days = days_needed % max_days_per_call;
    if last_request_days > 0 {
        let request_from_date = since_date.add(Duration::days(requests_needed * max_days_per_call));
        let request_to_date = request_from_date.add(Duration::days(last_request_days));
        let mut observations = service.get_price_history(symbol, &request_from_date, &request_to_date)?;
        debug!("Received {} observations for {} .. {}", observations.len(), request_from_date, request_to_date);
        series.append(&mut observations);
    }

    Ok(series)
}

pub fn fetch_price_history(service : &mut impl PriceHistoryService,
                           storage : &mut impl Storage,
                           symbol : &str,
                           since_date : &NaiveDate,
                           to_date : &NaiveDate) -> anyhow::Result<String> {
    let series = utils::normalize_series(fetch_series(service, symbol, since_date, to_date)?);

    let entry_name = utils::history_entry_name(symbol, since_date, to_date);
    let metadata = SeriesMetadata { symbol : String::from(symbol), from_date : *since_date, to_date : *to_date };
    storage.save_price_history(&entry_name, &series, &metadata)?;

    info!("Stored {} observations of {} as '{}'", series.len(), symbol, entry_name);
    Ok(entry_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::*;
    use mockall::{predicate::*};

    #[test]
    fn fetch_history_fitting_in_one_request() -> anyhow::Result<()> {
        let mut service = MockPriceHistoryService::new();
        let mut storage = MockStorage::new();

        let max_days_per_call : u32 = 400;
        service.expect_max_days_per_call()
            .return_once(move || Ok(max_days_per_call));

        let since_date = ymd(2023, 1, 1);
        let to_date = ymd(2024, 1, 1);
        service.expect_get_price_history()
            .with(eq("AAPL"), eq(since_date), eq(to_date))
            .times(1)
            .return_once(move |_, _, _| Ok(build_linear_series(since_date, 365, 0)));

        let metadata = SeriesMetadata { symbol : String::from("AAPL"), from_date : since_date, to_date };
        let expected_series = build_linear_series(since_date, 365, 0);
        storage.expect_save_price_history()
            .withf(move |name, series, m| name == "AAPL_20230101_20240101" && series == &expected_series[..] && m == &metadata)
            .times(1)
            .return_once(|_, _, _| Ok(()));

        let name = fetch_price_history(&mut service, &mut storage, "AAPL", &since_date, &to_date)?;

        assert_eq!(name, "AAPL_20230101_20240101");
        Ok(())
    }

    #[test]
    fn fetch_history_not_fitting_in_one_request() -> anyhow::Result<()> {
        let mut service = MockPriceHistoryService::new();
        let mut storage = MockStorage::new();

        let max_days_per_call : u32 = 10;
        service.expect_max_days_per_call()
            .return_once(move || Ok(max_days_per_call));

        let since_date = ymd(2024, 2, 20);
        let to_date = since_date + Duration::days(25);
        service.expect_get_price_history()
            .with(eq("MSFT"), eq(since_date), eq(ymd(2024, 3, 1)))
            .times(1)
            .return_once(move |_, _, _| Ok(build_linear_series(since_date, 10, 0)));
        service.expect_get_price_history()
            .with(eq("MSFT"), eq(ymd(2024, 3, 1)), eq(ymd(2024, 3, 11)))
            .times(1)
            .return_once(move |_, _, _| Ok(build_linear_series(since_date, 10, 10)));
        service.expect_get_price_history()
            .with(eq("MSFT"), eq(ymd(2024, 3, 11)), eq(to_date))
            .times(1)
            .return_once(move |_, _, _| Ok(build_linear_series(since_date, 5, 20)));

        let expected_series = build_linear_series(since_date, 25, 0);
        storage.expect_save_price_history()
            .withf(move |name, series, _| name == "MSFT_20240220_20240316" && series == &expected_series[..])
            .times(1)
            .return_once(|_, _, _| Ok(()));

        fetch_price_history(&mut service, &mut storage, "MSFT", &since_date, &to_date)?;

        Ok(())
    }

    #[test]
    fn fetch_history_with_empty_range() {
        let mut service = MockPriceHistoryService::new();
        let mut storage = MockStorage::new();

        let date = ymd(2024, 1, 1);
        let result = fetch_price_history(&mut service, &mut storage, "AAPL", &date, &date);

        assert!(result.is_err());
    }

    #[test]
    fn fetch_history_from_service_allowing_no_days() {
        let mut service = MockPriceHistoryService::new();
        let mut storage = MockStorage::new();

        service.expect_max_days_per_call()
            .return_once(|| Ok(0));
        service.expect_get_price_history()
            .times(0);
        storage.expect_save_price_history()
            .times(0);

        let result = fetch_price_history(&mut service, &mut storage, "AAPL", &ymd(2024, 1, 1), &ymd(2024, 2, 1));

        assert!(result.is_err());
    }

    #[test]
    fn fetch_history_failure_is_not_stored() {
        let mut service = MockPriceHistoryService::new();
        let mut storage = MockStorage::new();

        service.expect_max_days_per_call()
            .return_once(|| Ok(100));
        service.expect_get_price_history()
            .times(1)
            .return_once(|_, _, _| Err(anyhow!("Symbol not found")));
        storage.expect_save_price_history()
            .times(0);

        let result = fetch_price_history(&mut service, &mut storage, "NOPE", &ymd(2024, 1, 1), &ymd(2024, 2, 1));

        assert!(result.is_err());
    }
}
