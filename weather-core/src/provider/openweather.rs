//! OpenWeather geocoding (`geo/1.0/zip`) and One Call (`data/3.0/onecall`)
//! request shapes, plus validation of their JSON payloads into domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Condition, CurrentConditions, DayForecast, GeoResult, NonEmpty, WeatherResult};

pub const DEFAULT_GEOCODING_URL: &str = "https://api.openweathermap.org/geo/1.0/zip";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

/// Only US zip codes are looked up.
pub const COUNTRY_CODE: &str = "US";

const EXCLUDED_SECTIONS: &str = "minutely,hourly,alerts";
const UNITS: &str = "imperial";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub geocoding_url: String,
    pub weather_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
        }
    }
}

pub(crate) fn geocoding_query(postal_code: &str, credential: &str) -> Vec<(&'static str, String)> {
    vec![
        ("zip", format!("{postal_code},{COUNTRY_CODE}")),
        ("appid", credential.to_string()),
    ]
}

pub(crate) fn weather_query(geo: &GeoResult, credential: &str) -> Vec<(&'static str, String)> {
    vec![
        ("lat", geo.latitude.to_string()),
        ("lon", geo.longitude.to_string()),
        ("exclude", EXCLUDED_SECTIONS.to_string()),
        ("units", UNITS.to_string()),
        ("appid", credential.to_string()),
    ]
}

/// The upstream `message` field when there is one, otherwise the raw body.
pub(crate) fn upstream_message(payload: &Value, raw: &str) -> String {
    payload
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| raw.to_owned())
}

#[derive(Debug, Deserialize)]
struct OwZip {
    lat: Option<f64>,
    lon: Option<f64>,
    name: Option<String>,
    country: Option<String>,
}

/// `None` when the payload lacks numeric coordinates or a place name.
pub(crate) fn parse_geo(payload: &Value) -> Option<GeoResult> {
    // serde would also accept a JSON array here; only objects carry named fields
    if !payload.is_object() {
        return None;
    }
    let zip = OwZip::deserialize(payload).ok()?;

    Some(GeoResult {
        latitude: zip.lat?,
        longitude: zip.lon?,
        place_name: zip.name?,
        country_code: zip.country?,
    })
}

/// Whether the payload carries both forecast sections at all.
pub(crate) fn has_forecast_sections(payload: &Value) -> bool {
    let present = |key: &str| payload.get(key).is_some_and(|v| !v.is_null());
    present("current") && present("daily")
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    dt: i64,
    temp: f64,
    feels_like: f64,
    pressure: f64,
    humidity: f64,
    wind_speed: f64,
    sunrise: i64,
    sunset: i64,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwDailyTemp {
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct OwDaily {
    dt: i64,
    temp: OwDailyTemp,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwOneCall {
    #[serde(default)]
    timezone_offset: i32,
    current: OwCurrent,
    daily: Vec<OwDaily>,
}

/// Validate a One Call payload into a [`WeatherResult`]. The error is a
/// human-readable description of what was wrong with the payload.
pub(crate) fn parse_weather(payload: &Value, location: String) -> Result<WeatherResult, String> {
    if !payload.is_object() {
        return Err("Forecast payload is not a JSON object".to_string());
    }
    let one_call =
        OwOneCall::deserialize(payload).map_err(|e| format!("Unexpected forecast payload: {e}"))?;

    let current = one_call.current;
    let current = CurrentConditions {
        observed_at: unix_to_utc(current.dt)?,
        temperature: current.temp,
        feels_like: current.feels_like,
        pressure: current.pressure,
        humidity: current.humidity,
        wind_speed: current.wind_speed,
        conditions: conditions(current.weather)
            .ok_or("Forecast payload has no current conditions")?,
        sunrise: unix_to_utc(current.sunrise)?,
        sunset: unix_to_utc(current.sunset)?,
    };

    let days = one_call
        .daily
        .into_iter()
        .map(|day| -> Result<DayForecast, String> {
            Ok(DayForecast {
                date: unix_to_utc(day.dt)?,
                temp_min: day.temp.min,
                temp_max: day.temp.max,
                conditions: conditions(day.weather)
                    .ok_or("Forecast payload has a day without conditions")?,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    let daily = NonEmpty::from_vec(days).ok_or("Forecast payload has no daily entries")?;

    Ok(WeatherResult {
        location,
        timezone_offset: one_call.timezone_offset,
        current,
        daily,
    })
}

fn conditions(weather: Vec<OwWeather>) -> Option<NonEmpty<Condition>> {
    NonEmpty::from_vec(
        weather
            .into_iter()
            .map(|w| Condition {
                description: w.description,
                icon_id: w.icon,
            })
            .collect(),
    )
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, String> {
    DateTime::from_timestamp(ts, 0).ok_or_else(|| format!("Timestamp out of range: {ts}"))
}
