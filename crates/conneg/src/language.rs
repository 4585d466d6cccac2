//! `Accept-Language` selection, optionally driven by the first path segment.

use crate::decorator::{HandlerDecorator, HandlerDecoratorExt};
use crate::handler::{BoxError, Handler};
use crate::negotiation::{header_line, negotiate_header, to_header_values};
use crate::response::create_response;
use crate::{ConfigError, ConnegError};
use async_trait::async_trait;
use http::header::{ACCEPT_LANGUAGE, CONTENT_LANGUAGE, LOCATION};
use http::{HeaderMap, HeaderValue, Request, Response, StatusCode, Uri};
use micro_negotiator::{HeaderNegotiator, LanguageNegotiator};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Selects the language of a request.
///
/// The language comes from the first path segment when path detection is on
/// and the segment names a configured language. Otherwise `Accept-Language` is
/// negotiated, falling back to the first configured language. With
/// [`redirect`](ContentLanguageBuilder::redirect) a request whose path carries
/// no language is answered with `302 Found` to the same path prefixed with the
/// resolved language.
///
/// The resolved language is forwarded as `Accept-Language` and stamped on the
/// response as `Content-Language` unless the handler set one.
#[derive(Debug, Clone)]
pub struct ContentLanguage {
    config: Arc<LanguageConfig>,
}

struct LanguageConfig {
    languages: Vec<String>,
    values: Vec<HeaderValue>,
    use_path: bool,
    redirect: bool,
    negotiator: Arc<dyn HeaderNegotiator>,
}

impl fmt::Debug for LanguageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageConfig")
            .field("languages", &self.languages)
            .field("use_path", &self.use_path)
            .field("redirect", &self.redirect)
            .finish_non_exhaustive()
    }
}

impl LanguageConfig {
    fn detect_from_path(&self, path: &str) -> Option<usize> {
        if !self.use_path {
            return None;
        }

        let trimmed = path.trim_start_matches('/');
        let first = trimmed.split_once('/').map_or(trimmed, |(first, _)| first).to_ascii_lowercase();
        if first.is_empty() {
            return None;
        }

        self.languages.iter().position(|language| *language == first)
    }

    /// `None` only when no language is configured.
    fn detect_from_header(&self, headers: &HeaderMap) -> Option<usize> {
        let accept = header_line(headers, &ACCEPT_LANGUAGE).unwrap_or_default();
        negotiate_header(&*self.negotiator, &accept, &self.languages).or_else(|| (!self.languages.is_empty()).then_some(0))
    }

    fn language(&self, index: Option<usize>) -> &str {
        index.map_or("", |index| self.languages[index].as_str())
    }

    fn header_value(&self, index: Option<usize>) -> HeaderValue {
        index.map_or_else(|| HeaderValue::from_static(""), |index| self.values[index].clone())
    }
}

/// Prefixes the path of `uri` with `language`, keeping scheme, authority and query.
fn redirect_location(uri: &Uri, language: &str) -> String {
    let mut path = format!("{language}/{}", uri.path()).replace("//", "/");
    if !path.starts_with('/') {
        path.insert(0, '/');
    }

    let mut location = String::with_capacity(path.len() + 16);
    if let Some(scheme) = uri.scheme_str()
        && let Some(authority) = uri.authority()
    {
        location.push_str(scheme);
        location.push_str("://");
        location.push_str(authority.as_str());
    }

    location.push_str(&path);
    if let Some(query) = uri.query() {
        location.push('?');
        location.push_str(query);
    }
    location
}

impl ContentLanguage {
    /// Starts a builder for the given languages, the first one being the default.
    pub fn builder<I>(languages: I) -> ContentLanguageBuilder
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        ContentLanguageBuilder {
            languages: languages.into_iter().map(Into::into).collect(),
            use_path: false,
            redirect: false,
            negotiator: Arc::new(LanguageNegotiator),
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.config.languages
    }
}

pub struct ContentLanguageBuilder {
    languages: Vec<String>,
    use_path: bool,
    redirect: bool,
    negotiator: Arc<dyn HeaderNegotiator>,
}

impl fmt::Debug for ContentLanguageBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentLanguageBuilder")
            .field("languages", &self.languages)
            .field("use_path", &self.use_path)
            .field("redirect", &self.redirect)
            .finish_non_exhaustive()
    }
}

impl ContentLanguageBuilder {
    /// Detects the language from the first path segment.
    #[must_use]
    pub fn use_path(mut self, use_path: bool) -> Self {
        self.use_path = use_path;
        self
    }

    /// Redirects requests whose path carries no language. Only has an effect
    /// together with [`use_path`](Self::use_path).
    #[must_use]
    pub fn redirect(mut self, redirect: bool) -> Self {
        self.redirect = redirect;
        self
    }

    #[must_use]
    pub fn negotiator(mut self, negotiator: impl HeaderNegotiator + 'static) -> Self {
        self.negotiator = Arc::new(negotiator);
        self
    }

    pub fn build(self) -> Result<ContentLanguage, ConfigError> {
        let values = to_header_values(&self.languages)?;
        let config = LanguageConfig {
            languages: self.languages,
            values,
            use_path: self.use_path,
            redirect: self.redirect,
            negotiator: self.negotiator,
        };
        Ok(ContentLanguage { config: Arc::new(config) })
    }
}

impl<H> HandlerDecorator<H> for ContentLanguage {
    type Output = ContentLanguageHandler<H>;

    fn decorate(&self, handler: H) -> Self::Output {
        ContentLanguageHandler { config: Arc::clone(&self.config), handler }
    }
}

impl HandlerDecoratorExt for ContentLanguage {}

#[derive(Debug)]
pub struct ContentLanguageHandler<H> {
    config: Arc<LanguageConfig>,
    handler: H,
}

#[async_trait]
impl<H, ReqBody> Handler<ReqBody> for ContentLanguageHandler<H>
where
    H: Handler<ReqBody>,
    H::RespBody: Default,
    ReqBody: Send + 'static,
{
    type RespBody = H::RespBody;
    type Error = BoxError;

    async fn call(&self, mut req: Request<ReqBody>) -> Result<Response<Self::RespBody>, Self::Error> {
        let config = &self.config;

        let index = if let Some(index) = config.detect_from_path(req.uri().path()) {
            debug!(language = config.language(Some(index)), "detected language from path");
            Some(index)
        } else {
            let index = config.detect_from_header(req.headers());

            if config.use_path && config.redirect {
                let location = redirect_location(req.uri(), config.language(index));
                debug!(location, "no language in path, redirect");

                let value =
                    HeaderValue::from_str(&location).map_err(|e| ConnegError::invalid_header_value(LOCATION, &location, e))?;
                let mut resp: Response<H::RespBody> = create_response(StatusCode::FOUND);
                resp.headers_mut().insert(LOCATION, value);
                return Ok(resp);
            }

            debug!(language = config.language(index), "negotiated language from header");
            index
        };

        let language = config.header_value(index);
        req.headers_mut().insert(ACCEPT_LANGUAGE, language.clone());

        let mut resp = self.handler.call(req).await.map_err(Into::<BoxError>::into)?;
        if !resp.headers().contains_key(CONTENT_LANGUAGE) {
            resp.headers_mut().insert(CONTENT_LANGUAGE, language);
        }
        Ok(resp)
    }
}
