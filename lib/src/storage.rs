use crate::price_service::*;

#[cfg(test)]
use mockall::{automock};

#[cfg_attr(test, automock)]
pub trait Storage {
    fn save_price_history(&mut self, name : &str, series : &[Observation], metadata : &SeriesMetadata) -> anyhow::Result<()>;
    fn load_price_history(&mut self, name : &str) -> anyhow::Result<(Series, SeriesMetadata)>;
}
