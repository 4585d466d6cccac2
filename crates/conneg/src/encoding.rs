//! `Accept-Encoding` selection.
//!
//! [`ContentEncoding`] negotiates the request's `Accept-Encoding` against the
//! configured encodings and forwards exactly one encoding downstream, or none
//! at all when the client accepts none of them.

use crate::decorator::{HandlerDecorator, HandlerDecoratorExt};
use crate::handler::{BoxError, Handler};
use crate::negotiation::{header_line, negotiate_header, to_header_values};
use crate::ConfigError;
use async_trait::async_trait;
use http::header::ACCEPT_ENCODING;
use http::{HeaderMap, HeaderValue, Request, Response};
use micro_negotiator::{EncodingNegotiator, HeaderNegotiator};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

const DEFAULT_ENCODINGS: [&str; 2] = ["gzip", "deflate"];

/// Selects the transfer encoding of a request.
///
/// ```
/// use micro_conneg::ContentEncoding;
///
/// let encoding = ContentEncoding::builder().encodings(["br", "gzip"]).build().unwrap();
/// # let _ = encoding;
/// ```
#[derive(Debug, Clone)]
pub struct ContentEncoding {
    config: Arc<EncodingConfig>,
}

struct EncodingConfig {
    encodings: Vec<String>,
    values: Vec<HeaderValue>,
    negotiator: Arc<dyn HeaderNegotiator>,
}

impl fmt::Debug for EncodingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodingConfig").field("encodings", &self.encodings).finish_non_exhaustive()
    }
}

impl EncodingConfig {
    fn rewrite(&self, headers: &mut HeaderMap) {
        let Some(accept) = header_line(headers, &ACCEPT_ENCODING) else {
            trace!("no accept-encoding header, forward request unchanged");
            return;
        };

        match negotiate_header(&*self.negotiator, &accept, &self.encodings) {
            Some(index) => {
                debug!(encoding = %self.encodings[index], accept, "negotiated content encoding");
                headers.insert(ACCEPT_ENCODING, self.values[index].clone());
            }
            None => {
                debug!(accept, "no acceptable encoding, remove accept-encoding header");
                headers.remove(ACCEPT_ENCODING);
            }
        }
    }
}

impl ContentEncoding {
    pub fn builder() -> ContentEncodingBuilder {
        ContentEncodingBuilder::default()
    }

    /// The supported encodings, in preference order.
    pub fn encodings(&self) -> &[String] {
        &self.config.encodings
    }
}

pub struct ContentEncodingBuilder {
    encodings: Vec<String>,
    negotiator: Arc<dyn HeaderNegotiator>,
}

impl fmt::Debug for ContentEncodingBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentEncodingBuilder").field("encodings", &self.encodings).finish_non_exhaustive()
    }
}

impl Default for ContentEncodingBuilder {
    fn default() -> Self {
        Self { encodings: DEFAULT_ENCODINGS.iter().map(ToString::to_string).collect(), negotiator: Arc::new(EncodingNegotiator) }
    }
}

impl ContentEncodingBuilder {
    /// Replaces the supported encodings, `gzip` and `deflate` by default.
    #[must_use]
    pub fn encodings<I>(mut self, encodings: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.encodings = encodings.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn negotiator(mut self, negotiator: impl HeaderNegotiator + 'static) -> Self {
        self.negotiator = Arc::new(negotiator);
        self
    }

    pub fn build(self) -> Result<ContentEncoding, ConfigError> {
        let values = to_header_values(&self.encodings)?;
        let config = EncodingConfig { encodings: self.encodings, values, negotiator: self.negotiator };
        Ok(ContentEncoding { config: Arc::new(config) })
    }
}

impl<H> HandlerDecorator<H> for ContentEncoding {
    type Output = ContentEncodingHandler<H>;

    fn decorate(&self, handler: H) -> Self::Output {
        ContentEncodingHandler { config: Arc::clone(&self.config), handler }
    }
}

impl HandlerDecoratorExt for ContentEncoding {}

#[derive(Debug)]
pub struct ContentEncodingHandler<H> {
    config: Arc<EncodingConfig>,
    handler: H,
}

#[async_trait]
impl<H, ReqBody> Handler<ReqBody> for ContentEncodingHandler<H>
where
    H: Handler<ReqBody>,
    ReqBody: Send + 'static,
{
    type RespBody = H::RespBody;
    type Error = BoxError;

    async fn call(&self, mut req: Request<ReqBody>) -> Result<Response<Self::RespBody>, Self::Error> {
        self.config.rewrite(req.headers_mut());
        self.handler.call(req).await.map_err(Into::into)
    }
}
