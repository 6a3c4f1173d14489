use std::path::{Path, PathBuf};
use chrono::{NaiveDate, Duration, Utc};
use structopt::StructOpt;
use tracing::error;
use tracing_subscriber::EnvFilter;
use forecast_lib::{ChartStyle, ForecastError, ForecastPresenter};
use forecast_lib::commands::fetch_price_history::fetch_price_history;
use forecast_lib::commands::forecast_prices::{forecast_prices, forecast_stored_prices, ForecastOptions};

mod yahoo;
mod file_storage;
mod plotters_presenter;
mod table_presenter;

use file_storage::FileStorage;
use plotters_presenter::{AnimatedChartPresenter, PlottersChartPresenter};
use table_presenter::TablePresenter;
use yahoo::service::YahooPriceService;

#[derive(Debug, StructOpt)]
#[structopt(name = "price-forecast", about = "Fits a linear trend to daily closes and projects it forward")]
struct Opt {
    /// Host serving the /v8/finance/chart API
    #[structopt(long, env = "PRICE_FORECAST_API_HOST", default_value = "query1.finance.yahoo.com")]
    api_host : String,

    /// Directory holding fetched price histories
    #[structopt(long, env = "PRICE_FORECAST_DATA_DIR", default_value = "data", parse(from_os_str))]
    data_dir : PathBuf,

    #[structopt(long, env = "PRICE_FORECAST_TIMEOUT_SECS", default_value = "30")]
    timeout_secs : u64,

    #[structopt(subcommand)]
    command : Command
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Fetches daily closes for [from, to) and stores them for offline forecasts
    FetchHistory {
        #[structopt(long)]
        symbol : String,
        #[structopt(long)]
        from : NaiveDate,
        #[structopt(long)]
        to : NaiveDate
    },
    /// Forecasts future closes and renders them
    Forecast {
        #[structopt(long, default_value = "AAPL")]
        symbol : String,
        /// Defaults to one year before --to
        #[structopt(long)]
        from : Option<NaiveDate>,
        /// Defaults to today (UTC)
        #[structopt(long)]
        to : Option<NaiveDate>,
        /// Stored history to forecast from instead of fetching
        #[structopt(long)]
        input : Option<String>,
        #[structopt(long, default_value = "30")]
        horizon : u32,
        /// static, animated or table; may be repeated
        #[structopt(long = "style")]
        styles : Vec<ChartStyle>,
        /// Directory receiving chart files
        #[structopt(long = "output", default_value = ".", parse(from_os_str))]
        output_dir : PathBuf,
        /// Delay between animated chart frames
        #[structopt(long, default_value = "200")]
        frame_delay_ms : u32
    }
}

fn build_presenters(styles : &[ChartStyle], output_dir : &Path, frame_delay_ms : u32) -> Vec<Box<dyn ForecastPresenter>> {
    let default_styles = [ChartStyle::Static, ChartStyle::Table];
    let styles = if styles.is_empty() { &default_styles[..] } else { styles };

    styles.iter().map(|style| -> Box<dyn ForecastPresenter> {
        match style {
            ChartStyle::Static => Box::new(PlottersChartPresenter::create(output_dir)),
            ChartStyle::Animated => Box::new(AnimatedChartPresenter::create(output_dir, frame_delay_ms)),
            ChartStyle::Table => Box::new(TablePresenter::new(std::io::stdout()))
        }
    }).collect()
}

fn forecast_options(symbol : String, from : Option<NaiveDate>, to : Option<NaiveDate>, horizon : u32) -> ForecastOptions {
    let to_date = to.unwrap_or_else(|| Utc::now().naive_utc().date());
    let from_date = from.unwrap_or_else(|| to_date - Duration::days(365));

    let mut options = ForecastOptions::default();
    options.set_symbol(symbol)
        .set_from_date(from_date)
        .set_to_date(to_date)
        .set_horizon(horizon);
    options
}

/// User-facing text for failures the user can fix by changing the request.
fn describe_error(err : &anyhow::Error) -> Option<String> {
    match err.downcast_ref::<ForecastError>()? {
        ForecastError::InsufficientData { observations } =>
            Some(format!("Not enough price history to fit a trend ({} observation(s)); try a wider date range or another symbol", observations)),
        ForecastError::InvalidHorizon { .. } =>
            Some(String::from("The forecast horizon must be at least 1 day")),
        ForecastError::DateOutOfRange { .. } =>
            Some(format!("{}", err))
    }
}

fn create_service(opt : &Opt) -> anyhow::Result<YahooPriceService> {
    YahooPriceService::create(&opt.api_host, std::time::Duration::from_secs(opt.timeout_secs))
}

fn run(opt : Opt) -> anyhow::Result<()> {
    match &opt.command {
        Command::FetchHistory { symbol, from, to } => {
            let mut service = create_service(&opt)?;
            let mut storage = FileStorage::create(&opt.data_dir);
            let entry_name = fetch_price_history(&mut service, &mut storage, symbol, from, to)?;
            println!("{}", entry_name);
        },
        Command::Forecast { symbol, from, to, input, horizon, styles, output_dir, frame_delay_ms } => {
            let mut presenters = build_presenters(styles, output_dir, *frame_delay_ms);
            match input {
                Some(input_name) => {
                    let mut storage = FileStorage::create(&opt.data_dir);
                    forecast_stored_prices(&mut storage, &mut presenters, input_name, *horizon)?;
                },
                None => {
                    let mut service = create_service(&opt)?;
                    let options = forecast_options(symbol.clone(), *from, *to, *horizon);
                    forecast_prices(&mut service, &mut presenters, &options)?;
                }
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let opt = Opt::from_args();
    match run(opt) {
        Ok(()) => Ok(()),
        Err(err) => match describe_error(&err) {
            Some(message) => {
                error!("{:#}", err);
                eprintln!("{}", message);
                std::process::exit(2);
            },
            None => Err(err)
        }
    }
}
