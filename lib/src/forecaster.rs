use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ForecastError;
use crate::price_service::Observation;

/// Day count since 0001-01-01 (day 1) in the proleptic Gregorian calendar.
pub fn date_to_ordinal(date : &NaiveDate) -> i64 {
    date.num_days_from_ce() as i64
}

pub fn ordinal_to_date(ordinal : i64) -> Option<NaiveDate> {
    if ordinal < i32::MIN as i64 || ordinal > i32::MAX as i64 {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(ordinal as i32)
}

/// Least-squares line `price = slope * ordinal + intercept`.
#[derive(Debug, PartialEq, Clone, Copy, Deserialize, Serialize)]
pub struct TrendLine {
    pub slope : f64,
    pub intercept : f64
}

impl TrendLine {
    pub fn fit(series : &[Observation]) -> Result<TrendLine, ForecastError> {
        if series.len() < 2 {
            return Err(ForecastError::InsufficientData { observations : series.len() });
        }

        let n = series.len() as f64;
        let x_mean = series.iter().map(|o| date_to_ordinal(&o.date) as f64).sum::<f64>() / n;
        let y_mean = series.iter().map(|o| o.price).sum::<f64>() / n;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for o in series {
            let dx = date_to_ordinal(&o.date) as f64 - x_mean;
            sxx += dx * dx;
            sxy += dx * (o.price - y_mean);
        }

        // All observations on one date: flat line through the mean price.
        let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
        let intercept = y_mean - slope * x_mean;

        Ok(TrendLine { slope, intercept })
    }

    pub fn predict(&self, date : &NaiveDate) -> f64 {
        self.slope * date_to_ordinal(date) as f64 + self.intercept
    }
}

#[derive(Debug)]
pub struct ForecastRequest<'a> {
    series : &'a [Observation],
    horizon : u32
}

impl<'a> ForecastRequest<'a> {
    pub fn new(series : &'a [Observation], horizon : u32) -> Result<ForecastRequest<'a>, ForecastError> {
        if horizon < 1 {
            return Err(ForecastError::InvalidHorizon { horizon });
        }
        if series.len() < 2 {
            return Err(ForecastError::InsufficientData { observations : series.len() });
        }

        Ok(ForecastRequest { series, horizon })
    }

    pub fn series(&self) -> &[Observation] {
        self.series
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    pub fn forecast(&self) -> Result<ForecastResult, ForecastError> {
        let trend = TrendLine::fit(self.series)?;
        let last_date = self.series.last()
            .map(|o| o.date)
            .ok_or(ForecastError::InsufficientData { observations : 0 })?;

        // The last projected date bounds every earlier one.
        last_date.checked_add_signed(Duration::days(self.horizon as i64))
            .ok_or(ForecastError::DateOutOfRange { date : last_date, days : self.horizon })?;

        let mut points = Vec::with_capacity(self.horizon as usize);
        for day in 1..=self.horizon {
            let date = last_date.checked_add_signed(Duration::days(day as i64))
                .ok_or(ForecastError::DateOutOfRange { date : last_date, days : day })?;
            points.push(ForecastPoint { date, price : trend.predict(&date) });
        }

        debug!("Fitted trend slope {} intercept {} over {} observations, projected {} days",
            trend.slope, trend.intercept, self.series.len(), self.horizon);
        Ok(ForecastResult { points, trend })
    }
}

#[derive(Debug, PartialEq, Clone, Deserialize, Serialize)]
pub struct ForecastPoint {
    pub date : NaiveDate,
    pub price : f64
}

#[derive(Debug, PartialEq, Clone, Deserialize, Serialize)]
pub struct ForecastResult {
    pub points : Vec<ForecastPoint>,
    pub trend : TrendLine
}

pub fn forecast(series : &[Observation], horizon : u32) -> Result<ForecastResult, ForecastError> {
    ForecastRequest::new(series, horizon)?.forecast()
}
