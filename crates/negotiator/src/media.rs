use crate::NegotiationError;
use crate::header::{AcceptItem, parse_header};
use crate::negotiator::{HeaderNegotiator, select_best};
use mime::Mime;

/// Negotiates `Accept` media ranges against a list of media types.
///
/// A range matches a candidate when its type and subtype are equal or `*`, and
/// every parameter of the candidate appears in the range. Exact type and
/// subtype matches are more specific than wildcards, so `text/html;q=0` is not
/// overridden by a `*/*` in the same header.
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaTypeNegotiator;

struct MediaRange<'a> {
    mime: Mime,
    params: &'a [(&'a str, &'a str)],
}

impl<'a> MediaRange<'a> {
    fn parse(item: &'a AcceptItem<'a>) -> Result<Self, NegotiationError> {
        // a lone `*` is sent by some clients as a shorthand for `*/*`
        let essence = match item.value() {
            "*" => "*/*",
            value => value,
        };

        let mime = essence.parse::<Mime>().map_err(|e| NegotiationError::invalid_media_type(essence, e))?;
        Ok(Self { mime, params: item.params() })
    }

    fn score(&self, candidate: &Mime) -> Option<u32> {
        let type_equal = self.mime.type_() == candidate.type_();
        let subtype_equal = self.mime.subtype() == candidate.subtype();

        if !(type_equal || self.mime.type_() == mime::STAR) || !(subtype_equal || self.mime.subtype() == mime::STAR) {
            return None;
        }

        let mut shared = 0;
        for (name, value) in candidate.params() {
            let present = self
                .params
                .iter()
                .any(|(n, v)| n.eq_ignore_ascii_case(name.as_str()) && v.eq_ignore_ascii_case(value.as_str()));
            if !present {
                return None;
            }
            shared += 1;
        }

        Some(100 * u32::from(type_equal) + 10 * u32::from(subtype_equal) + shared)
    }
}

fn parse_candidates(candidates: &[String]) -> Result<Vec<Mime>, NegotiationError> {
    candidates
        .iter()
        .map(|candidate| candidate.parse::<Mime>().map_err(|e| NegotiationError::invalid_media_type(candidate, e)))
        .collect()
}

fn negotiate_parsed(header: &str, candidates: &[Mime]) -> Result<Option<usize>, NegotiationError> {
    let items = parse_header(header)?;
    let ranges = items
        .iter()
        .map(|item| Ok((MediaRange::parse(item)?, item.quality())))
        .collect::<Result<Vec<_>, NegotiationError>>()?;

    Ok(select_best(&ranges, candidates, |range, candidate| range.score(candidate)))
}

impl MediaTypeNegotiator {
    /// Parses `candidates` once, for negotiators that always see the same list.
    pub fn prepare(candidates: &[String]) -> Result<PreparedMediaTypeNegotiator, NegotiationError> {
        Ok(PreparedMediaTypeNegotiator { candidates: candidates.to_vec(), parsed: parse_candidates(candidates)? })
    }
}

impl HeaderNegotiator for MediaTypeNegotiator {
    fn negotiate(&self, header: &str, candidates: &[String]) -> Result<Option<usize>, NegotiationError> {
        negotiate_parsed(header, &parse_candidates(candidates)?)
    }
}

/// A [`MediaTypeNegotiator`] holding an already parsed candidate list.
///
/// Negotiating against the prepared list skips parsing the candidates. Any
/// other list is parsed on every call, like [`MediaTypeNegotiator`] does.
#[derive(Debug, Clone)]
pub struct PreparedMediaTypeNegotiator {
    candidates: Vec<String>,
    parsed: Vec<Mime>,
}

impl PreparedMediaTypeNegotiator {
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

impl HeaderNegotiator for PreparedMediaTypeNegotiator {
    fn negotiate(&self, header: &str, candidates: &[String]) -> Result<Option<usize>, NegotiationError> {
        if candidates == self.candidates.as_slice() {
            return negotiate_parsed(header, &self.parsed);
        }

        MediaTypeNegotiator.negotiate(header, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn negotiate(header: &str, candidates: &[&str]) -> Option<String> {
        let candidates: Vec<String> = candidates.iter().map(ToString::to_string).collect();
        MediaTypeNegotiator.negotiate(header, &candidates).unwrap().map(|index| candidates[index].clone())
    }

    const HTML_FIRST: &[&str] = &["text/html", "application/xhtml+xml", "text/plain", "application/json", "application/xml"];

    #[test]
    fn test_exact_match() {
        assert_eq!(negotiate("application/json", HTML_FIRST).as_deref(), Some("application/json"));
    }

    #[test]
    fn test_quality_order() {
        let header = "application/xml;charset=UTF-8,application/xhtml+xml,text/html;q=0.9,text/plain;q=0.8";
        assert_eq!(negotiate(header, HTML_FIRST).as_deref(), Some("application/xhtml+xml"));
    }

    #[test]
    fn test_wildcards() {
        assert_eq!(negotiate("*/*", HTML_FIRST).as_deref(), Some("text/html"));
        assert_eq!(negotiate("application/*", HTML_FIRST).as_deref(), Some("application/xhtml+xml"));
        assert_eq!(negotiate("image/png, *; q=0.2", HTML_FIRST).as_deref(), Some("text/html"));
    }

    #[test]
    fn test_specific_range_overrides_wildcard() {
        assert_eq!(negotiate("text/html;q=0, */*", HTML_FIRST).as_deref(), Some("application/xhtml+xml"));
        assert_eq!(negotiate("*/*;q=0.1, text/plain", HTML_FIRST).as_deref(), Some("text/plain"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(negotiate("text/xxx", HTML_FIRST), None);
        assert_eq!(negotiate("image/*", HTML_FIRST), None);
    }

    #[test]
    fn test_candidate_params_must_be_accepted() {
        assert_eq!(negotiate("text/html", &["text/html;level=1"]), None);
        assert_eq!(negotiate("text/html;level=1", &["text/html;level=1"]).as_deref(), Some("text/html;level=1"));
    }

    #[test]
    fn test_case_insensitive_types() {
        assert_eq!(negotiate("Application/JSON", HTML_FIRST).as_deref(), Some("application/json"));
    }

    #[test]
    fn test_prepared_candidates() {
        let candidates: Vec<String> = HTML_FIRST.iter().map(ToString::to_string).collect();
        let prepared = MediaTypeNegotiator::prepare(&candidates).unwrap();
        assert_eq!(prepared.candidates(), candidates.as_slice());

        for header in ["application/json", "*/*", "text/html;q=0, */*", "image/*", "application/xml;q=0.5, text/plain"] {
            assert_eq!(
                prepared.negotiate(header, &candidates).unwrap(),
                MediaTypeNegotiator.negotiate(header, &candidates).unwrap(),
                "header {header}"
            );
        }

        // a different list is still negotiated, just without the parsed cache
        let others = vec!["text/plain".to_string(), "application/json".to_string()];
        assert_eq!(prepared.negotiate("application/json", &others).unwrap(), Some(1));
    }

    #[test]
    fn test_prepare_rejects_invalid_candidate() {
        let candidates = vec!["text/html".to_string(), "html".to_string()];
        assert!(matches!(MediaTypeNegotiator::prepare(&candidates), Err(NegotiationError::InvalidMediaType { .. })));
    }

    #[test]
    fn test_invalid_range() {
        let candidates = vec!["text/html".to_string()];
        assert!(matches!(
            MediaTypeNegotiator.negotiate("text", &candidates),
            Err(NegotiationError::InvalidMediaType { .. })
        ));
    }
}
