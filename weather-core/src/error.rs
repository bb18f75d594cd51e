use thiserror::Error;

/// Classified failure of a single zip code lookup.
///
/// Every variant is terminal for the lookup that produced it. The carried
/// message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The geocoding service rejected the zip code or answered with an unusable payload.
    #[error("{message}")]
    Geo { postal_code: String, message: String },

    /// The forecast service rejected the coordinates or answered with an unusable payload.
    #[error("{message}")]
    Weather { message: String },

    /// The request could not be completed at all (network failure, malformed JSON).
    #[error("{message}")]
    Transport { message: String },
}

impl LookupError {
    pub fn geo(postal_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Geo {
            postal_code: postal_code.into(),
            message: message.into(),
        }
    }

    pub fn weather(message: impl Into<String>) -> Self {
        Self::Weather {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LookupError::Geo { message, .. }
            | LookupError::Weather { message }
            | LookupError::Transport { message } => message,
        }
    }

    /// Short machine-friendly name of the failure class, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::Geo { .. } => "geo",
            LookupError::Weather { .. } => "weather",
            LookupError::Transport { .. } => "transport",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = LookupError::geo("00000", "not found");
        assert_eq!(err.to_string(), "not found");
        assert_eq!(err.message(), "not found");
        assert_eq!(err.kind(), "geo");
    }

    #[test]
    fn geo_error_keeps_postal_code() {
        match LookupError::geo("99999", "city not found") {
            LookupError::Geo { postal_code, .. } => assert_eq!(postal_code, "99999"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn transport_and_weather_kinds() {
        assert_eq!(LookupError::transport("boom").kind(), "transport");
        assert_eq!(LookupError::weather("nope").kind(), "weather");
    }
}
