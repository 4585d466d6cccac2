//! Glue between the selectors and a [`HeaderNegotiator`].

use crate::ConfigError;
use http::{HeaderMap, HeaderName, HeaderValue};
use micro_negotiator::HeaderNegotiator;
use tracing::trace;

/// Returns every value of header `name` joined with `", "`, or `None` if the
/// header is absent.
///
/// Values containing bytes other than visible ASCII are skipped.
pub(crate) fn header_line(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    if !headers.contains_key(name) {
        return None;
    }

    let values: Vec<&str> = headers.get_all(name).iter().filter_map(|value| value.to_str().ok()).collect();
    Some(values.join(", "))
}

/// Negotiates `accept` against `candidates`, returning the index of the best one.
///
/// A blank header, an empty candidate list, and a header the negotiator can't
/// parse all count as "no match".
pub(crate) fn negotiate_header(negotiator: &dyn HeaderNegotiator, accept: &str, candidates: &[String]) -> Option<usize> {
    if accept.trim().is_empty() || candidates.is_empty() {
        return None;
    }

    match negotiator.negotiate(accept, candidates) {
        Ok(index) => index.filter(|index| *index < candidates.len()),
        Err(e) => {
            trace!(cause = %e, accept, "failed to negotiate header, treat as no match");
            None
        }
    }
}

/// Converts configured values to header values, failing on the first invalid one.
pub(crate) fn to_header_values(values: &[String]) -> Result<Vec<HeaderValue>, ConfigError> {
    values
        .iter()
        .map(|value| HeaderValue::from_str(value).map_err(|e| ConfigError::invalid_header_value(value, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::MockNegotiator;
    use http::header::ACCEPT;
    use micro_negotiator::NegotiationError;

    fn candidates() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    #[test]
    fn test_header_line() {
        let mut headers = HeaderMap::new();
        assert_eq!(header_line(&headers, &ACCEPT), None);

        headers.append(ACCEPT, HeaderValue::from_static("text/html"));
        headers.append(ACCEPT, HeaderValue::from_static("application/json;q=0.5"));
        assert_eq!(header_line(&headers, &ACCEPT).as_deref(), Some("text/html, application/json;q=0.5"));
    }

    #[test]
    fn test_header_line_skips_opaque_values() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_bytes(b"caf\xe9").unwrap());
        assert_eq!(header_line(&headers, &ACCEPT).as_deref(), Some(""));
    }

    #[test]
    fn test_negotiate_header_returns_match() {
        let mut negotiator = MockNegotiator::new();
        negotiator.expect_negotiate().withf(|accept, _| accept == "b").times(1).returning(|_, _| Ok(Some(1)));

        assert_eq!(negotiate_header(&negotiator, "b", &candidates()), Some(1));
    }

    #[test]
    fn test_negotiate_header_skips_blank_header_and_empty_candidates() {
        let mut negotiator = MockNegotiator::new();
        negotiator.expect_negotiate().times(0);

        assert_eq!(negotiate_header(&negotiator, "  ", &candidates()), None);
        assert_eq!(negotiate_header(&negotiator, "a", &[]), None);
    }

    #[test]
    fn test_negotiate_header_absorbs_errors() {
        let mut negotiator = MockNegotiator::new();
        negotiator.expect_negotiate().returning(|_, _| Err(NegotiationError::invalid_quality("x")));

        assert_eq!(negotiate_header(&negotiator, "a;q=x", &candidates()), None);
    }

    #[test]
    fn test_negotiate_header_ignores_out_of_range_index() {
        let mut negotiator = MockNegotiator::new();
        negotiator.expect_negotiate().returning(|_, _| Ok(Some(7)));

        assert_eq!(negotiate_header(&negotiator, "a", &candidates()), None);
    }

    #[test]
    fn test_to_header_values() {
        assert_eq!(to_header_values(&candidates()).unwrap(), vec![HeaderValue::from_static("a"), HeaderValue::from_static("b")]);
        assert!(matches!(
            to_header_values(&["bad\nvalue".to_string()]),
            Err(ConfigError::InvalidHeaderValue { .. })
        ));
    }
}
