//! Responses the selectors produce themselves, without calling downstream.

use http::{Response, StatusCode};

/// Creates an empty response with the given status.
pub fn create_response<B: Default>(status: StatusCode) -> Response<B> {
    let mut resp = Response::new(B::default());
    *resp.status_mut() = status;
    resp
}
