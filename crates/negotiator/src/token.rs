use crate::NegotiationError;
use crate::negotiator::{HeaderNegotiator, parse_items, select_best};

/// Negotiates `Accept-Encoding` against content codings such as `gzip` or `br`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EncodingNegotiator;

/// Negotiates `Accept-Charset` against charsets such as `UTF-8`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharsetNegotiator;

/// Case-insensitive token matching where `*` matches anything less specifically.
fn score(item: &&str, candidate: &String) -> Option<u32> {
    if item.eq_ignore_ascii_case(candidate) {
        Some(1)
    } else if *item == "*" {
        Some(0)
    } else {
        None
    }
}

fn negotiate_token(header: &str, candidates: &[String]) -> Result<Option<usize>, NegotiationError> {
    let items = parse_items(header, |item| Ok(item.value()))?;
    Ok(select_best(&items, candidates, score))
}

impl HeaderNegotiator for EncodingNegotiator {
    fn negotiate(&self, header: &str, candidates: &[String]) -> Result<Option<usize>, NegotiationError> {
        negotiate_token(header, candidates)
    }
}

impl HeaderNegotiator for CharsetNegotiator {
    fn negotiate(&self, header: &str, candidates: &[String]) -> Result<Option<usize>, NegotiationError> {
        negotiate_token(header, candidates)
    }
}
