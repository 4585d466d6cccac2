use http::HeaderName;
use http::header::InvalidHeaderValue;
use micro_negotiator::NegotiationError;
use thiserror::Error;

/// Errors raised while building a selector or a format registry.
///
/// A selector is only ever constructed from a valid configuration, so none of
/// these can surface while requests are being handled.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown format: {name}")]
    UnknownFormat { name: String },

    #[error("format `{name}` is defined more than once")]
    DuplicateFormat { name: String },

    #[error("format `{name}` has no mime type")]
    MissingMimeType { name: String },

    #[error("invalid mime type `{mime_type}` in format `{name}`: {source}")]
    InvalidMimeType {
        name: String,
        mime_type: String,
        #[source]
        source: mime::FromStrError,
    },

    #[error("format registry must contain at least one format")]
    EmptyRegistry,

    #[error("at least one charset must be configured")]
    EmptyCharsets,

    #[error("`{value}` can not be used as a header value: {source}")]
    InvalidHeaderValue {
        value: String,
        #[source]
        source: InvalidHeaderValue,
    },

    #[error("can not prepare media types for negotiation: {source}")]
    Negotiation {
        #[from]
        source: NegotiationError,
    },

    #[error("invalid format overrides: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn unknown_format<S: ToString>(name: S) -> Self {
        Self::UnknownFormat { name: name.to_string() }
    }

    pub fn duplicate_format<S: ToString>(name: S) -> Self {
        Self::DuplicateFormat { name: name.to_string() }
    }

    pub fn invalid_header_value<S: ToString>(value: S, source: InvalidHeaderValue) -> Self {
        Self::InvalidHeaderValue { value: value.to_string(), source }
    }
}

/// Errors raised by a selector while handling a request.
#[derive(Debug, Error)]
pub enum ConnegError {
    #[error("can not build {header} header from `{value}`: {source}")]
    InvalidHeaderValue {
        header: HeaderName,
        value: String,
        #[source]
        source: InvalidHeaderValue,
    },
}

impl ConnegError {
    pub fn invalid_header_value<S: ToString>(header: HeaderName, value: S, source: InvalidHeaderValue) -> Self {
        Self::InvalidHeaderValue { header, value: value.to_string(), source }
    }
}
