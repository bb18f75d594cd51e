use chrono::{DateTime, Utc};

use crate::error::LookupError;

/// Zip code used when the navigation carries none.
pub const DEFAULT_ZIP_CODE: &str = "10001";

/// Outcome of one full lookup. This is the only value the resolver hands to the view.
pub type ResolutionOutcome = Result<WeatherResult, LookupError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub postal_code: String,
}

impl LookupRequest {
    pub fn new(postal_code: impl Into<String>) -> Self {
        Self {
            postal_code: postal_code.into(),
        }
    }

    /// Build a request from an optional navigation parameter.
    ///
    /// An absent or empty parameter falls back to `fallback`. The value is not
    /// checked for the 5-digit format; the geocoding service is the judge of that.
    pub fn from_param(param: Option<&str>, fallback: &str) -> Self {
        match param {
            Some(code) if !code.is_empty() => Self::new(code),
            _ => Self::new(fallback),
        }
    }
}

/// Coordinates and place name for a zip code. Never leaves the resolver.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GeoResult {
    pub latitude: f64,
    pub longitude: f64,
    pub place_name: String,
    pub country_code: String,
}

impl GeoResult {
    pub fn location(&self) -> String {
        format!("{}, {}", self.place_name, self.country_code)
    }
}

/// A sequence with at least one element.
#[derive(Debug, Clone, PartialEq)]
pub struct NonEmpty<T> {
    head: T,
    tail: Vec<T>,
}

#[allow(clippy::len_without_is_empty)]
impl<T> NonEmpty<T> {
    /// Returns `None` for an empty vector.
    pub fn from_vec(items: Vec<T>) -> Option<Self> {
        let mut items = items.into_iter();
        let head = items.next()?;
        Some(Self {
            head,
            tail: items.collect(),
        })
    }

    pub fn first(&self) -> &T {
        &self.head
    }

    pub fn len(&self) -> usize {
        1 + self.tail.len()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        match index {
            0 => Some(&self.head),
            n => self.tail.get(n - 1),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        std::iter::once(&self.head).chain(self.tail.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub description: String,
    pub icon_id: String,
}

impl Condition {
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon_id)
    }
}

/// Current conditions, imperial units (°F, mph, hPa, %).
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub observed_at: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub conditions: NonEmpty<Condition>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast {
    pub date: DateTime<Utc>,
    pub temp_min: f64,
    pub temp_max: f64,
    pub conditions: NonEmpty<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherResult {
    /// `"<place name>, <country code>"`.
    pub location: String,
    /// Seconds east of UTC at the looked-up location.
    pub timezone_offset: i32,
    pub current: CurrentConditions,
    /// Chronological, index 0 is today.
    pub daily: NonEmpty<DayForecast>,
}

impl WeatherResult {
    pub fn today(&self) -> &DayForecast {
        self.daily.first()
    }
}
