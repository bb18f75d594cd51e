use tracing::debug;
use weather_core::{Config, Navigation, ResolutionOutcome, Resolver, Route, Screen, ViewController};

/// Plays the part of the router: holds the active route, runs the lookup on
/// every navigation and keeps only the latest outcome.
#[derive(Debug)]
pub struct Session {
    resolver: Resolver,
    credential: String,
    fallback_zip_code: String,
    route: Route,
    pub controller: ViewController,
    outcome: Option<ResolutionOutcome>,
}

impl Session {
    pub fn new(config: &Config, resolver: Resolver, route: Route) -> Self {
        let fallback_zip_code = config.default_zip_code().to_string();
        let controller = ViewController::new(&route.lookup(&fallback_zip_code));

        Self {
            resolver,
            credential: config.credential(),
            fallback_zip_code,
            route,
            controller,
            outcome: None,
        }
    }

    /// Follow a navigation. The route is rebuilt from the query string, the
    /// same way it would be read back from an address bar.
    pub fn navigate(&mut self, navigation: &Navigation) {
        let query = navigation.query();
        debug!(%query, reset_scroll = navigation.reset_scroll, "navigate");
        self.route = Route::from_query(&query);
    }

    /// Resolve the active route, replacing any previous outcome.
    pub async fn fetch(&mut self) {
        let request = self.route.lookup(&self.fallback_zip_code);
        let outcome = self
            .resolver
            .resolve(&request.postal_code, &self.credential)
            .await;
        if let Err(failure) = &outcome {
            debug!(kind = failure.kind(), zip_code = %request.postal_code, "lookup failed");
        }
        self.outcome = Some(outcome);
    }

    pub fn screen(&self, is_fetching: bool) -> Screen {
        self.controller.render(self.outcome.as_ref(), is_fetching)
    }

    pub fn has_failed(&self) -> bool {
        matches!(self.outcome, Some(Err(_)))
    }
}
