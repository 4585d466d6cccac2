//! Format and charset selection.
//!
//! [`ContentType`] resolves the [`Format`] of a request from the file
//! extension of its path, or from `Accept` when the path has no registered
//! extension, and the charset from `Accept-Charset`. The request is forwarded
//! with both headers narrowed to the resolved values, and the response gets a
//! matching `Content-Type` unless the handler already set one.

use crate::decorator::{HandlerDecorator, HandlerDecoratorExt};
use crate::format::{Format, FormatRegistry};
use crate::handler::{BoxError, Handler};
use crate::negotiation::{header_line, negotiate_header, to_header_values};
use crate::request::RequestExt;
use crate::response::create_response;
use crate::{ConfigError, ConnegError};
use async_trait::async_trait;
use http::header::{ACCEPT, ACCEPT_CHARSET, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use http::{HeaderMap, HeaderValue, Request, Response, StatusCode};
use micro_negotiator::{CharsetNegotiator, HeaderNegotiator, MediaTypeNegotiator};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

const DEFAULT_CHARSET: &str = "UTF-8";

/// Selects the format and charset of a request.
///
/// ```
/// use micro_conneg::{ContentType, FormatRegistry};
///
/// let content_type = ContentType::builder()
///     .registry(FormatRegistry::from_overrides(["json", "html"]).unwrap())
///     .charsets(["UTF-8", "ISO-8859-1"])
///     .error_on_no_match(true)
///     .attribute("format")
///     .build()
///     .unwrap();
///
/// assert_eq!(content_type.default_format().name(), "json");
/// ```
#[derive(Debug, Clone)]
pub struct ContentType {
    config: Arc<TypeConfig>,
}

struct TypeConfig {
    registry: Arc<FormatRegistry>,
    default: Format,
    charsets: Vec<String>,
    charset_values: Vec<HeaderValue>,
    nosniff: bool,
    error_on_no_match: bool,
    attribute: Option<String>,
    negotiator: Arc<dyn HeaderNegotiator>,
    charset_negotiator: Arc<dyn HeaderNegotiator>,
}

impl fmt::Debug for TypeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeConfig")
            .field("formats", &self.registry.len())
            .field("default", &self.default.name())
            .field("charsets", &self.charsets)
            .field("nosniff", &self.nosniff)
            .field("error_on_no_match", &self.error_on_no_match)
            .field("attribute", &self.attribute)
            .finish_non_exhaustive()
    }
}

impl TypeConfig {
    fn detect_from_extension(&self, path: &str) -> Option<&Format> {
        let trimmed = path.trim_end_matches('/');
        let file_name = trimmed.rsplit_once('/').map_or(trimmed, |(_, name)| name);
        let (_, extension) = file_name.rsplit_once('.')?;
        if extension.is_empty() {
            return None;
        }

        self.registry.lookup_by_extension(extension)
    }

    fn detect_from_header(&self, headers: &HeaderMap) -> Option<&Format> {
        // a present but blank header is negotiated, and matches nothing
        let Some(accept) = header_line(headers, &ACCEPT) else {
            trace!("no accept header, use default format");
            return Some(&self.default);
        };

        let mime_types = self.registry.all_mime_types();
        let index = negotiate_header(&*self.negotiator, &accept, mime_types)?;
        self.registry.lookup_by_mime_type(&mime_types[index])
    }

    fn detect_charset(&self, headers: &HeaderMap) -> usize {
        let accept = header_line(headers, &ACCEPT_CHARSET).unwrap_or_default();
        negotiate_header(&*self.charset_negotiator, &accept, &self.charsets).unwrap_or(0)
    }
}

impl ContentType {
    pub fn builder() -> ContentTypeBuilder {
        ContentTypeBuilder::default()
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.config.registry
    }

    /// The format used when `Accept` is absent, or matches nothing and 406 is off.
    pub fn default_format(&self) -> &Format {
        &self.config.default
    }

    pub fn charsets(&self) -> &[String] {
        &self.config.charsets
    }
}

pub struct ContentTypeBuilder {
    registry: Arc<FormatRegistry>,
    default_format: Option<String>,
    charsets: Vec<String>,
    nosniff: bool,
    error_on_no_match: bool,
    attribute: Option<String>,
    negotiator: Option<Arc<dyn HeaderNegotiator>>,
    charset_negotiator: Arc<dyn HeaderNegotiator>,
}

impl fmt::Debug for ContentTypeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentTypeBuilder")
            .field("formats", &self.registry.len())
            .field("default_format", &self.default_format)
            .field("charsets", &self.charsets)
            .field("nosniff", &self.nosniff)
            .field("error_on_no_match", &self.error_on_no_match)
            .field("attribute", &self.attribute)
            .finish_non_exhaustive()
    }
}

impl Default for ContentTypeBuilder {
    fn default() -> Self {
        Self {
            registry: FormatRegistry::shared_builtin(),
            default_format: None,
            charsets: vec![DEFAULT_CHARSET.to_string()],
            nosniff: true,
            error_on_no_match: false,
            attribute: None,
            negotiator: None,
            charset_negotiator: Arc::new(CharsetNegotiator),
        }
    }
}

impl ContentTypeBuilder {
    /// Replaces the built-in formats.
    #[must_use]
    pub fn registry(mut self, registry: impl Into<Arc<FormatRegistry>>) -> Self {
        self.registry = registry.into();
        self
    }

    /// Names the format used when `Accept` is absent or matches nothing. The
    /// first format of the registry is used when unset.
    #[must_use]
    pub fn default_format(mut self, name: impl Into<String>) -> Self {
        self.default_format = Some(name.into());
        self
    }

    /// Replaces the supported charsets, `UTF-8` by default. The first one is
    /// used when `Accept-Charset` matches none.
    #[must_use]
    pub fn charsets<I>(mut self, charsets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.charsets = charsets.into_iter().map(Into::into).collect();
        self
    }

    /// Adds `X-Content-Type-Options: nosniff` to responses lacking it, on by default.
    #[must_use]
    pub fn nosniff(mut self, nosniff: bool) -> Self {
        self.nosniff = nosniff;
        self
    }

    /// Answers `406 Not Acceptable` instead of falling back to the default
    /// format when `Accept` matches no format.
    #[must_use]
    pub fn error_on_no_match(mut self, error_on_no_match: bool) -> Self {
        self.error_on_no_match = error_on_no_match;
        self
    }

    /// Stores the resolved format name as a request attribute named `name`.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attribute = Some(name.into());
        self
    }

    /// Replaces the `Accept` negotiator. By default a [`MediaTypeNegotiator`]
    /// prepared with the mime types of the registry is used.
    #[must_use]
    pub fn negotiator(mut self, negotiator: impl HeaderNegotiator + 'static) -> Self {
        self.negotiator = Some(Arc::new(negotiator));
        self
    }

    #[must_use]
    pub fn charset_negotiator(mut self, negotiator: impl HeaderNegotiator + 'static) -> Self {
        self.charset_negotiator = Arc::new(negotiator);
        self
    }

    pub fn build(self) -> Result<ContentType, ConfigError> {
        if self.charsets.is_empty() {
            return Err(ConfigError::EmptyCharsets);
        }

        let default = match &self.default_format {
            Some(name) => self.registry.get(name).ok_or_else(|| ConfigError::unknown_format(name))?.clone(),
            None => self.registry.default_format().clone(),
        };

        let negotiator: Arc<dyn HeaderNegotiator> = match self.negotiator {
            Some(negotiator) => negotiator,
            None => Arc::new(MediaTypeNegotiator::prepare(self.registry.all_mime_types())?),
        };

        let charset_values = to_header_values(&self.charsets)?;
        let config = TypeConfig {
            registry: self.registry,
            default,
            charsets: self.charsets,
            charset_values,
            nosniff: self.nosniff,
            error_on_no_match: self.error_on_no_match,
            attribute: self.attribute,
            negotiator,
            charset_negotiator: self.charset_negotiator,
        };
        Ok(ContentType { config: Arc::new(config) })
    }
}

impl<H> HandlerDecorator<H> for ContentType {
    type Output = ContentTypeHandler<H>;

    fn decorate(&self, handler: H) -> Self::Output {
        ContentTypeHandler { config: Arc::clone(&self.config), handler }
    }
}

impl HandlerDecoratorExt for ContentType {}

#[derive(Debug)]
pub struct ContentTypeHandler<H> {
    config: Arc<TypeConfig>,
    handler: H,
}

#[async_trait]
impl<H, ReqBody> Handler<ReqBody> for ContentTypeHandler<H>
where
    H: Handler<ReqBody>,
    H::RespBody: Default,
    ReqBody: Send + 'static,
{
    type RespBody = H::RespBody;
    type Error = BoxError;

    async fn call(&self, mut req: Request<ReqBody>) -> Result<Response<Self::RespBody>, Self::Error> {
        let config = &self.config;

        let detected = match config.detect_from_extension(req.uri().path()) {
            Some(format) => {
                debug!(format = format.name(), "detected format from extension");
                Some(format)
            }
            None => config.detect_from_header(req.headers()),
        };

        let format = match detected {
            Some(format) => format,
            None if config.error_on_no_match => {
                debug!("no acceptable format, respond 406");
                return Ok(create_response(StatusCode::NOT_ACCEPTABLE));
            }
            None => {
                trace!("no acceptable format, use default format");
                &config.default
            }
        };

        let charset = config.detect_charset(req.headers());
        debug!(format = format.name(), charset = %config.charsets[charset], "resolved content type");

        let headers = req.headers_mut();
        headers.insert(ACCEPT, format.accept_value().clone());
        headers.insert(ACCEPT_CHARSET, config.charset_values[charset].clone());
        if let Some(attribute) = &config.attribute {
            req.set_attribute(attribute.as_str(), format.name());
        }

        let mut resp = self.handler.call(req).await.map_err(Into::<BoxError>::into)?;

        if !resp.headers().contains_key(CONTENT_TYPE) {
            let content_type = format.content_type(&config.charsets[charset]);
            let value = HeaderValue::from_str(&content_type)
                .map_err(|e| ConnegError::invalid_header_value(CONTENT_TYPE, &content_type, e))?;
            resp.headers_mut().insert(CONTENT_TYPE, value);
        }

        if config.nosniff && !resp.headers().contains_key(X_CONTENT_TYPE_OPTIONS) {
            resp.headers_mut().insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        }

        Ok(resp)
    }
}
