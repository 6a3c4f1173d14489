use std::io::Write;
use forecast_lib::{ForecastResult, Observation};

pub struct TablePresenter<W : Write> {
    out : W
}

impl<W : Write> TablePresenter<W> {
    pub fn new(out : W) -> TablePresenter<W> {
        TablePresenter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W : Write> forecast_lib::ForecastPresenter for TablePresenter<W> {
    fn render(&mut self, symbol : &str, series : &[Observation], result : &ForecastResult) -> anyhow::Result<()> {
        writeln!(self.out, "{} linear trend over {} observations: {:+.4} per day",
            symbol, series.len(), result.trend.slope)?;
        writeln!(self.out, "{:<12}{:>14}", "Date", "Predicted")?;
        for p in &result.points {
            writeln!(self.out, "{:<12}{:>14.2}", p.date.format("%Y-%m-%d").to_string(), p.price)?;
        }
        self.out.flush()?;
        Ok(())
    }
}
