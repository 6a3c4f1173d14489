use serde_json::Value;
use anyhow::{anyhow, Context};
use chrono::{NaiveDate, TimeZone, Utc};
use forecast_lib::{Observation, Series};

pub fn http_get_json(client : &reqwest::blocking::Client, host : &str, path : &[&str], param_map : &[(&str, String)]) -> anyhow::Result<serde_json::Value> {
    let http_resp = http_get(client, host, path, param_map).context("Failed to send HTTP GET")?;

    http_response_to_json(http_resp).context("Failed to parse HTTP response")
}

fn http_get(client : &reqwest::blocking::Client, host : &str, path : &[&str], param_map : &[(&str, String)]) -> anyhow::Result<reqwest::blocking::Response> {
    let url = build_url(host, path, param_map)?;

    let resp = client
        .get(url)
        .header("Accept", "application/json")
        .header("User-Agent", "Mozilla/5.0 (compatible; price-forecast)")
        .header("Connection", "close")
        .send()?;
    Ok(resp)
}

pub fn build_url(host : &str, path : &[&str], param_map : &[(&str, String)]) -> anyhow::Result<url::Url> {
    let mut url = url::Url::parse(&format!("https://{}/", host))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Host '{}' cannot carry a path", host))?
        .pop_if_empty()
        .extend(path);
    {
        let mut query = url.query_pairs_mut();
        for (k, v) in param_map {
            query.append_pair(k, v);
        }
    }

    Ok(url)
}

fn http_response_to_json(response : reqwest::blocking::Response) -> anyhow::Result<serde_json::Value> {
    if response.status() != http::StatusCode::OK {
        return Err(anyhow!("Erroneous HTTP status returned: {}", response.status()));
    }

    let response_body = response.text()?;
    let json_root : Value = serde_json::from_str(&response_body)?;

    Ok(json_root)
}

pub fn date_to_timestamp(date : &NaiveDate) -> anyhow::Result<i64> {
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| anyhow!("Invalid midnight for {}", date))?;
    Ok(Utc.from_utc_datetime(&midnight).timestamp())
}

pub fn timestamp_to_date(timestamp : i64) -> anyhow::Result<NaiveDate> {
    Utc.timestamp_opt(timestamp, 0).single()
        .map(|d| d.naive_utc().date())
        .ok_or_else(|| anyhow!("Timestamp {} is out of range", timestamp))
}

/// Daily closes from a `/v8/finance/chart` response. Days without a close are skipped.
pub fn parse_chart_response(json_root : &Value) -> anyhow::Result<Series> {
    let chart = &json_root["chart"];
    if !chart["error"].is_null() {
        return Err(anyhow!("Chart request failed: {}", chart["error"]));
    }

    let result = chart["result"].as_array().and_then(|a| a.first())
        .ok_or_else(|| anyhow!("No 'chart/result' found in response {}", json_root))?;

    // Ranges without trading days come back without timestamps.
    let timestamps = match result["timestamp"].as_array() {
        Some(timestamps) => timestamps,
        None => return Ok(Vec::new())
    };
    let closes = result["indicators"]["quote"][0]["close"].as_array()
        .ok_or_else(|| anyhow!("No 'indicators/quote/close' array found in response {}", result))?;
    if timestamps.len() != closes.len() {
        return Err(anyhow!("Got {} timestamps but {} closes", timestamps.len(), closes.len()));
    }

    let mut series = Vec::with_capacity(closes.len());
    for (timestamp, close) in timestamps.iter().zip(closes) {
        let price = match close.as_f64() {
            Some(price) => price,
            None => continue
        };
        let timestamp = timestamp.as_i64().ok_or_else(|| anyhow!("Invalid timestamp {}", timestamp))?;
        series.push(Observation { date : timestamp_to_date(timestamp)?, price });
    }

    Ok(series)
}
