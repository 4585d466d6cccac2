//! Content negotiation middleware
//!
//! Three selectors decide which representation of a resource a request gets,
//! each wrapping the next [`Handler`] of the chain:
//!
//! - [`ContentEncoding`] narrows `Accept-Encoding` to a single supported encoding
//! - [`ContentLanguage`] picks a language from the path or `Accept-Language`,
//!   optionally redirecting to a language prefixed path
//! - [`ContentType`] picks a [`Format`] from the file extension or `Accept` and a
//!   charset from `Accept-Charset`, then labels the response with `Content-Type`
//!
//! Selectors only label representations, they never transcode bodies.
//!
//! # Example
//!
//! ```
//! use http::{Request, Response};
//! use micro_conneg::{ContentEncoding, ContentLanguage, ContentType, Handler, HandlerDecorator, HandlerDecoratorExt, make_handler};
//! use std::convert::Infallible;
//!
//! # tokio_test_block_on(async {
//! let app = make_handler(|req: Request<()>| async move {
//!     let accept = req.headers()[http::header::ACCEPT].to_str().unwrap_or_default().to_string();
//!     Ok::<_, Infallible>(Response::new(accept))
//! });
//!
//! let handler = ContentType::builder()
//!     .build()
//!     .unwrap()
//!     .and_then(ContentLanguage::builder(["en", "es"]).build().unwrap())
//!     .and_then(ContentEncoding::builder().build().unwrap())
//!     .decorate(app);
//!
//! let req = Request::builder().uri("/report.json").body(()).unwrap();
//! let resp = handler.call(req).await.unwrap();
//!
//! assert_eq!(resp.body(), "application/json");
//! assert_eq!(resp.headers()[http::header::CONTENT_LANGUAGE], "en");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod content_type;
mod decorator;
mod encoding;
mod error;
mod handler;
mod language;
mod negotiation;
mod request;
mod response;

pub mod format;

#[cfg(test)]
mod test_util;

pub use content_type::{ContentType, ContentTypeBuilder, ContentTypeHandler};
pub use decorator::{HandlerDecorator, HandlerDecoratorComposer, HandlerDecoratorExt, IdentityHandlerDecorator};
pub use encoding::{ContentEncoding, ContentEncodingBuilder, ContentEncodingHandler};
pub use error::{ConfigError, ConnegError};
pub use format::{Format, FormatOverride, FormatRegistry};
pub use handler::{BoxError, Handler, HandlerFn, make_handler};
pub use language::{ContentLanguage, ContentLanguageBuilder, ContentLanguageHandler};
pub use request::{Attributes, RequestExt};
pub use response::create_response;

pub use micro_negotiator::HeaderNegotiator;
