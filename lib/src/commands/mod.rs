pub mod fetch_price_history;
pub mod forecast_prices;
