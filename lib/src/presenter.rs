use strum::EnumString;

use crate::price_service::Observation;
use crate::forecaster::ForecastResult;

#[cfg(test)]
use mockall::{automock};

#[derive(Debug, PartialEq, Clone, Copy, EnumString)]
pub enum ChartStyle {
    #[strum(serialize = "static")]
    Static,
    #[strum(serialize = "animated")]
    Animated,
    #[strum(serialize = "table")]
    Table
}

#[cfg_attr(test, automock)]
pub trait ForecastPresenter {
    fn render(&mut self, symbol : &str, series : &[Observation], result : &ForecastResult) -> anyhow::Result<()>;
}
