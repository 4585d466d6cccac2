//! The next-handler contract every selector wraps.
//!
//! A [`Handler`] turns a request into a response. Selectors implement it
//! themselves and delegate to the handler they decorate, so any number of them
//! can be stacked in front of the application handler.

use async_trait::async_trait;
use http::{Request, Response};
use std::error::Error;
use std::fmt;
use std::future::Future;

/// The error type of every selector handler.
pub type BoxError = Box<dyn Error + Send + Sync>;

#[async_trait]
pub trait Handler<ReqBody>: Send + Sync {
    type RespBody;
    type Error: Into<BoxError>;

    async fn call(&self, req: Request<ReqBody>) -> Result<Response<Self::RespBody>, Self::Error>;
}

/// A [`Handler`] backed by an async function or closure.
pub struct HandlerFn<F> {
    f: F,
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

#[async_trait]
impl<ReqBody, RespBody, Err, F, Fut> Handler<ReqBody> for HandlerFn<F>
where
    ReqBody: Send + 'static,
    F: Fn(Request<ReqBody>) -> Fut + Send + Sync,
    Err: Into<BoxError>,
    Fut: Future<Output = Result<Response<RespBody>, Err>> + Send,
{
    type RespBody = RespBody;
    type Error = Err;

    async fn call(&self, req: Request<ReqBody>) -> Result<Response<Self::RespBody>, Self::Error> {
        (self.f)(req).await
    }
}

pub fn make_handler<F, ReqBody, RespBody, Err, Ret>(f: F) -> HandlerFn<F>
where
    Err: Into<BoxError>,
    Ret: Future<Output = Result<Response<RespBody>, Err>>,
    F: Fn(Request<ReqBody>) -> Ret,
{
    HandlerFn { f }
}
