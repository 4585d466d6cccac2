use thiserror::Error;

/// Errors raised while parsing an `Accept*` header or a candidate value.
#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("header value is empty")]
    EmptyHeader,

    #[error("invalid quality value: {value}")]
    InvalidQuality { value: String },

    #[error("invalid header item: {reason}")]
    InvalidItem { reason: String },

    #[error("invalid media type `{value}`: {source}")]
    InvalidMediaType {
        value: String,
        #[source]
        source: mime::FromStrError,
    },
}

impl NegotiationError {
    pub fn invalid_quality<S: ToString>(value: S) -> Self {
        Self::InvalidQuality { value: value.to_string() }
    }

    pub fn invalid_item<S: ToString>(reason: S) -> Self {
        Self::InvalidItem { reason: reason.to_string() }
    }

    pub fn invalid_media_type<S: ToString>(value: S, source: mime::FromStrError) -> Self {
        Self::InvalidMediaType { value: value.to_string(), source }
    }
}
