//! Two-stage zip code lookup: geocode the zip code, then fetch the forecast
//! for the resulting coordinates.
//!
//! Every failure on the way is folded into a [`LookupError`]; nothing escapes
//! [`Resolver::resolve`] as a panic or an untyped error.

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::LookupError,
    model::{GeoResult, ResolutionOutcome},
    provider::{
        HttpReply, HttpTransport, Transport,
        openweather::{self, Endpoints},
        truncate_body,
    },
};

#[derive(Debug)]
pub struct Resolver {
    transport: Box<dyn Transport>,
    endpoints: Endpoints,
}

impl Resolver {
    pub fn new(transport: Box<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Resolver talking to the real services over HTTP.
    pub fn http(endpoints: Endpoints) -> Self {
        Self::new(Box::new(HttpTransport::new()), endpoints)
    }

    /// Look up current conditions and the daily forecast for `postal_code`.
    ///
    /// Exactly one attempt per stage, no retries.
    #[instrument(skip(self, credential))]
    pub async fn resolve(&self, postal_code: &str, credential: &str) -> ResolutionOutcome {
        let geo = self.geocode(postal_code, credential).await?;
        debug!(lat = geo.latitude, lon = geo.longitude, place = %geo.place_name, "geocoded");

        let location = geo.location();
        let (reply, payload) = self
            .fetch(
                &self.endpoints.weather_url,
                &openweather::weather_query(&geo, credential),
            )
            .await?;

        if !reply.is_success() || !openweather::has_forecast_sections(&payload) {
            warn!(status = reply.status, body = %truncate_body(&reply.body), "forecast rejected");
            return Err(LookupError::weather(openweather::upstream_message(
                &payload,
                &reply.body,
            )));
        }

        let result = openweather::parse_weather(&payload, location).map_err(|message| {
            warn!(%message, "forecast payload failed validation");
            LookupError::weather(message)
        })?;

        info!(location = %result.location, days = result.daily.len(), "lookup complete");
        Ok(result)
    }

    async fn geocode(&self, postal_code: &str, credential: &str) -> Result<GeoResult, LookupError> {
        let (reply, payload) = self
            .fetch(
                &self.endpoints.geocoding_url,
                &openweather::geocoding_query(postal_code, credential),
            )
            .await?;

        let geo = reply
            .is_success()
            .then(|| openweather::parse_geo(&payload))
            .flatten();

        geo.ok_or_else(|| {
            warn!(status = reply.status, body = %truncate_body(&reply.body), "geocoding rejected");
            LookupError::geo(
                postal_code,
                openweather::upstream_message(&payload, &reply.body),
            )
        })
    }

    /// One GET plus JSON decoding. A failed exchange is a transport failure, and
    /// so is an unparseable body on a successful reply. An unparseable body on a
    /// rejected reply decodes to `null`, leaving the raw body as the message.
    async fn fetch(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<(HttpReply, Value), LookupError> {
        let reply = self.transport.get(url, query).await.map_err(|e| {
            let message = format!("{e:#}");
            warn!(%url, error = %message, "request failed");
            LookupError::transport(message)
        })?;

        let payload = match serde_json::from_str::<Value>(&reply.body) {
            Ok(payload) => payload,
            Err(_) if !reply.is_success() => Value::Null,
            Err(e) => {
                warn!(%url, status = reply.status, body = %truncate_body(&reply.body), "malformed JSON");
                return Err(LookupError::transport(format!(
                    "Failed to parse response from {url}: {e}"
                )));
            }
        };

        Ok((reply, payload))
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::provider::{HttpReply, Transport};

    /// Scripted transport: answers by URL, records every request.
    #[derive(Debug, Default)]
    pub struct FakeTransport {
        routes: Vec<(String, std::result::Result<HttpReply, String>)>,
        pub calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl FakeTransport {
        pub fn reply(mut self, url: &str, status: u16, body: impl Into<String>) -> Self {
            self.routes
                .push((url.to_string(), Ok(HttpReply::new(status, body))));
            self
        }

        pub fn fail(mut self, url: &str, message: &str) -> Self {
            self.routes.push((url.to_string(), Err(message.to_string())));
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().map(|c| c.len()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpReply> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((
                    url.to_string(),
                    query
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.clone()))
                        .collect(),
                ));
            }

            match self.routes.iter().find(|(u, _)| u == url) {
                Some((_, Ok(reply))) => Ok(reply.clone()),
                Some((_, Err(message))) => Err(anyhow!("{message}")),
                None => Err(anyhow!("no route for {url}")),
            }
        }
    }
}
