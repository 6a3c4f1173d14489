use std::path::{Path, PathBuf};
use anyhow::anyhow;
use plotters::prelude::*;
use plotters::coord::Shift;
use tracing::info;
use forecast_lib::{ForecastResult, Observation};

const CHART_SIZE : (u32, u32) = (1280, 720);

/// Writes `<output_dir>/<symbol>_forecast.png`.
pub struct PlottersChartPresenter {
    output_dir : PathBuf
}

impl PlottersChartPresenter {
    pub fn create(output_dir : &Path) -> PlottersChartPresenter {
        PlottersChartPresenter { output_dir : output_dir.to_path_buf() }
    }
}

impl forecast_lib::ForecastPresenter for PlottersChartPresenter {
    fn render(&mut self, symbol : &str, series : &[Observation], result : &ForecastResult) -> anyhow::Result<()> {
        let png_path = self.output_dir.join(format!("{}_forecast.png", file_stem(symbol)));
        let root_area = BitMapBackend::new(&png_path, CHART_SIZE).into_drawing_area();

        draw_forecast(&root_area, symbol, series, result, result.points.len())?;
        root_area.present()?;

        info!("Wrote chart {}", png_path.display());
        Ok(())
    }
}

/// Writes `<output_dir>/<symbol>_forecast.gif`, revealing one forecast day per frame.
pub struct AnimatedChartPresenter {
    output_dir : PathBuf,
    frame_delay_ms : u32
}

impl AnimatedChartPresenter {
    pub fn create(output_dir : &Path, frame_delay_ms : u32) -> AnimatedChartPresenter {
        AnimatedChartPresenter { output_dir : output_dir.to_path_buf(), frame_delay_ms }
    }
}

impl forecast_lib::ForecastPresenter for AnimatedChartPresenter {
    fn render(&mut self, symbol : &str, series : &[Observation], result : &ForecastResult) -> anyhow::Result<()> {
        let gif_path = self.output_dir.join(format!("{}_forecast.gif", file_stem(symbol)));
        let root_area = BitMapBackend::gif(&gif_path, CHART_SIZE, self.frame_delay_ms)?.into_drawing_area();

        for shown in 1..=result.points.len() {
            draw_forecast(&root_area, symbol, series, result, shown)?;
            root_area.present()?;
        }

        info!("Wrote {} frame animation {}", result.points.len(), gif_path.display());
        Ok(())
    }
}

fn file_stem(symbol : &str) -> String {
    symbol.replace(|c : char| !c.is_ascii_alphanumeric() && c != '-' && c != '.', "_")
}

fn format_ordinal(x : &f64) -> String {
    forecast_lib::ordinal_to_date(x.round() as i64)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn draw_forecast<DB>(root_area : &DrawingArea<DB, Shift>,
                     symbol : &str,
                     series : &[Observation],
                     result : &ForecastResult,
                     shown_points : usize) -> anyhow::Result<()>
    where DB : DrawingBackend, DB::ErrorType : 'static {
    let first = series.first().ok_or_else(|| anyhow!("Cannot chart an empty series"))?;
    let last = series.last().ok_or_else(|| anyhow!("Cannot chart an empty series"))?;
    let last_forecast = result.points.last().ok_or_else(|| anyhow!("Cannot chart an empty forecast"))?;

    root_area.fill(&WHITE)?;
    let root_area = root_area.titled(&format!("{} linear trend forecast", symbol), ("sans-serif", 24))?;

    let min_x = forecast_lib::date_to_ordinal(&first.date) as f64;
    let max_x = forecast_lib::date_to_ordinal(&last_forecast.date) as f64;
    let (min_y, max_y) = forecast_lib::utils::find_price_range(series, &result.points);
    let padding = if max_y > min_y { (max_y - min_y) * 0.05 } else { 1.0 };

    let mut cc = ChartBuilder::on(&root_area)
        .margin(10)
        .set_all_label_area_size(60)
        .build_cartesian_2d(min_x..max_x, (min_y - padding)..(max_y + padding))?;

    cc.configure_mesh()
        .x_labels(10)
        .y_labels(10)
        .x_label_formatter(&format_ordinal)
        .y_label_formatter(&|y| format!("{:.2}", y))
        .draw()?;

    let history = series.iter().map(|o| (forecast_lib::date_to_ordinal(&o.date) as f64, o.price));
    cc.draw_series(LineSeries::new(history, &BLUE))?
        .label("History")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    // The forecast line starts at the last observation so both lines connect.
    let forecast = std::iter::once((forecast_lib::date_to_ordinal(&last.date) as f64, last.price))
        .chain(result.points.iter().take(shown_points)
            .map(|p| (forecast_lib::date_to_ordinal(&p.date) as f64, p.price)));
    cc.draw_series(LineSeries::new(forecast, &RED))?
        .label("Forecast")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    cc.draw_series(result.points.iter().take(shown_points)
        .map(|p| Circle::new((forecast_lib::date_to_ordinal(&p.date) as f64, p.price), 3, RED.filled())))?;

    cc.configure_series_labels().background_style(&WHITE).border_style(&BLACK).draw()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use forecast_lib::ForecastPresenter;

    fn three_day_series() -> Vec<Observation> {
        let date = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        vec!(
            Observation { date : date(1), price : 100.0 },
            Observation { date : date(2), price : 103.0 },
            Observation { date : date(3), price : 102.0 })
    }

    #[test]
    fn render_static_chart() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let series = three_day_series();
        let result = forecast_lib::forecast(&series, 2)?;

        PlottersChartPresenter::create(dir.path()).render("AAPL", &series, &result)?;

        assert!(dir.path().join("AAPL_forecast.png").exists());
        Ok(())
    }

    #[test]
    fn render_animated_chart() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let series = three_day_series();
        let result = forecast_lib::forecast(&series, 2)?;

        AnimatedChartPresenter::create(dir.path(), 10).render("^GSPC", &series, &result)?;

        assert!(dir.path().join("_GSPC_forecast.gif").exists());
        Ok(())
    }

    #[test]
    fn symbols_become_file_names() {
        assert_eq!(file_stem("^GSPC"), "_GSPC");
        assert_eq!(file_stem("BRK-B"), "BRK-B");
        assert_eq!(file_stem("EUR/USD"), "EUR_USD");
    }

    #[test]
    fn ordinal_labels_are_dates() {
        assert_eq!(format_ordinal(&738_886.0), "2024-01-01");
        assert_eq!(format_ordinal(&738_886.4), "2024-01-01");
    }
}
