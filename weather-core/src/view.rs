//! View controller: owns the zip code draft and the "extra info" toggle, and
//! turns the latest lookup outcome into a render tree.
//!
//! Rendering priority: a fetch in flight wins over everything, then a
//! failure, then the weather screen.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use url::form_urlencoded;

use crate::model::{CurrentConditions, DayForecast, LookupRequest, ResolutionOutcome, WeatherResult};

/// The single recognized navigation parameter.
pub const ZIP_CODE_PARAM: &str = "zipCode";

pub const MAX_FORECAST_CARDS: usize = 7;

/// Navigable state, as carried by a query string like `zipCode=90210`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    zip_code: Option<String>,
}

impl Route {
    /// Parse a query string. Unknown parameters are ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let zip_code = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == ZIP_CODE_PARAM)
            .map(|(_, value)| value.into_owned());

        Self { zip_code }
    }

    pub fn with_zip_code(zip_code: impl Into<String>) -> Self {
        Self {
            zip_code: Some(zip_code.into()),
        }
    }

    pub fn zip_code(&self) -> Option<&str> {
        self.zip_code.as_deref()
    }

    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(zip_code) = &self.zip_code {
            query.append_pair(ZIP_CODE_PARAM, zip_code);
        }
        query.finish()
    }

    /// The lookup this route asks for; absent or empty zip codes use `fallback`.
    pub fn lookup(&self, fallback: &str) -> LookupRequest {
        LookupRequest::from_param(self.zip_code(), fallback)
    }
}

/// A navigation request emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub reset_scroll: bool,
}

impl Navigation {
    pub fn query(&self) -> String {
        self.route.to_query()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Loading,
    Failure { message: String },
    Weather(WeatherScreen),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherScreen {
    pub form: InputForm,
    pub current: CurrentPanel,
    pub forecast: Vec<ForecastCard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputForm {
    pub draft_zip_code: String,
}

/// Temperatures are whole °F.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentPanel {
    pub location: String,
    pub description: String,
    pub icon_url: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub high: i64,
    pub low: i64,
    pub extra: Option<ExtraInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtraInfo {
    /// mph
    pub wind_speed: f64,
    /// percent
    pub humidity: f64,
    /// hPa
    pub pressure: f64,
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastCard {
    pub label: String,
    pub icon_url: String,
    pub description: String,
    pub high: i64,
    pub low: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewController {
    draft_zip_code: String,
    extra_info_visible: bool,
}

impl ViewController {
    /// Start with the draft set to the zip code currently being looked up.
    pub fn new(active: &LookupRequest) -> Self {
        Self {
            draft_zip_code: active.postal_code.clone(),
            extra_info_visible: false,
        }
    }

    pub fn draft_zip_code(&self) -> &str {
        &self.draft_zip_code
    }

    pub fn set_draft_zip_code(&mut self, value: impl Into<String>) {
        self.draft_zip_code = value.into();
    }

    pub fn extra_info_visible(&self) -> bool {
        self.extra_info_visible
    }

    /// Publish the draft as the only navigation parameter. The fetch itself
    /// is up to whoever performs the navigation.
    pub fn on_submit(&self) -> Navigation {
        Navigation {
            route: Route::with_zip_code(self.draft_zip_code.clone()),
            reset_scroll: false,
        }
    }

    pub fn toggle_extra_info(&mut self) {
        self.extra_info_visible = !self.extra_info_visible;
    }

    /// Render state for the latest outcome. `None` means no outcome has
    /// arrived yet, which renders as loading.
    pub fn render(&self, outcome: Option<&ResolutionOutcome>, is_fetching: bool) -> Screen {
        if is_fetching {
            return Screen::Loading;
        }

        match outcome {
            None => Screen::Loading,
            Some(Err(failure)) => Screen::Failure {
                message: failure.message().to_string(),
            },
            Some(Ok(weather)) => Screen::Weather(self.weather_screen(weather)),
        }
    }

    fn weather_screen(&self, weather: &WeatherResult) -> WeatherScreen {
        let offset = location_offset(weather.timezone_offset);

        WeatherScreen {
            form: InputForm {
                draft_zip_code: self.draft_zip_code.clone(),
            },
            current: self.current_panel(weather, offset),
            forecast: weather
                .daily
                .iter()
                .take(MAX_FORECAST_CARDS)
                .enumerate()
                .map(|(index, day)| forecast_card(index, day, offset))
                .collect(),
        }
    }

    fn current_panel(&self, weather: &WeatherResult, offset: FixedOffset) -> CurrentPanel {
        let current = &weather.current;
        let primary = current.conditions.first();
        let today = weather.today();

        CurrentPanel {
            location: weather.location.clone(),
            description: primary.description.clone(),
            icon_url: primary.icon_url(),
            temperature: round_degrees(current.temperature),
            feels_like: round_degrees(current.feels_like),
            high: round_degrees(today.temp_max),
            low: round_degrees(today.temp_min),
            extra: self
                .extra_info_visible
                .then(|| extra_info(current, offset)),
        }
    }
}

fn extra_info(current: &CurrentConditions, offset: FixedOffset) -> ExtraInfo {
    ExtraInfo {
        wind_speed: current.wind_speed,
        humidity: current.humidity,
        pressure: current.pressure,
        sunrise: time_of_day(current.sunrise, offset),
        sunset: time_of_day(current.sunset, offset),
    }
}

fn forecast_card(index: usize, day: &DayForecast, offset: FixedOffset) -> ForecastCard {
    let primary = day.conditions.first();

    ForecastCard {
        label: day_label(index, day.date, offset),
        icon_url: primary.icon_url(),
        description: primary.description.clone(),
        high: round_degrees(day.temp_max),
        low: round_degrees(day.temp_min),
    }
}

/// Round half up, so `-2.5` becomes `-2` and `2.5` becomes `3`.
pub fn round_degrees(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Offsets outside ±24h fall back to UTC.
pub fn location_offset(seconds_east: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds_east).unwrap_or_else(|| Utc.fix())
}

/// `7:08 AM` style time of day at `offset`.
pub fn time_of_day(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%-I:%M %p").to_string()
}

/// "Today", "Tomorrow", then weekday and month/day (`Fri 10/23`).
pub fn day_label(index: usize, date: DateTime<Utc>, offset: FixedOffset) -> String {
    match index {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.with_timezone(&offset).format("%a %-m/%-d").to_string(),
    }
}
