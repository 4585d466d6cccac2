use crate::handler::Handler;
use crate::request::Attributes;
use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, Request, Response, StatusCode};
use micro_negotiator::{HeaderNegotiator, NegotiationError};
use mockall::mock;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

mock! {
    pub Negotiator {}

    impl HeaderNegotiator for Negotiator {
        fn negotiate(&self, header: &str, candidates: &[String]) -> Result<Option<usize>, NegotiationError>;
    }
}

/// What a [`RecordingHandler`] saw of a request.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub(crate) headers: HeaderMap,
    pub(crate) attributes: Option<Attributes>,
}

/// Records every request it receives and answers with a fixed set of headers.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingHandler {
    recorded: Arc<Mutex<Vec<Recorded>>>,
    response_headers: HeaderMap,
}

impl RecordingHandler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_response_header(mut self, name: HeaderName, value: &'static str) -> Self {
        self.response_headers.insert(name, HeaderValue::from_static(value));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    pub(crate) fn last(&self) -> Recorded {
        self.recorded.lock().unwrap().last().cloned().expect("handler was not invoked")
    }
}

#[async_trait]
impl<B: Send + 'static> Handler<B> for RecordingHandler {
    type RespBody = String;
    type Error = Infallible;

    async fn call(&self, req: Request<B>) -> Result<Response<Self::RespBody>, Self::Error> {
        let (parts, _body) = req.into_parts();
        self.recorded
            .lock()
            .unwrap()
            .push(Recorded { headers: parts.headers, attributes: parts.extensions.get::<Attributes>().cloned() });

        let mut resp = Response::new("ok".to_string());
        *resp.status_mut() = StatusCode::OK;
        *resp.headers_mut() = self.response_headers.clone();
        Ok(resp)
    }
}

pub(crate) fn request(uri: &str, headers: &[(HeaderName, &'static str)]) -> Request<()> {
    let mut req = Request::builder().uri(uri).body(()).unwrap();
    for (name, value) in headers {
        req.headers_mut().append(name.clone(), HeaderValue::from_static(*value));
    }
    req
}
