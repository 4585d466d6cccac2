use crate::NegotiationError;
use crate::negotiator::{HeaderNegotiator, parse_items, select_best};

/// Negotiates `Accept-Language` against language tags.
///
/// Tags are compared by their base (`gl` in `gl-ES`) and sub tag. A client
/// asking for a regional variant still matches a candidate without a sub tag,
/// so `gl-es` selects a configured `gl`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LanguageNegotiator;

fn split_tag(tag: &str) -> (&str, Option<&str>) {
    match tag.split_once('-') {
        Some((base, sub)) => (base, Some(sub)),
        None => (tag, None),
    }
}

fn score(item: &&str, candidate: &String) -> Option<u32> {
    let (item_base, item_sub) = split_tag(item);
    let (candidate_base, candidate_sub) = split_tag(candidate);

    let base_equal = item_base.eq_ignore_ascii_case(candidate_base);
    let sub_equal = match (item_sub, candidate_sub) {
        (Some(item_sub), Some(candidate_sub)) => item_sub.eq_ignore_ascii_case(candidate_sub),
        (None, None) => true,
        _ => false,
    };

    if (item_base == "*" || base_equal) && (item_sub.is_none() || sub_equal || candidate_sub.is_none()) {
        Some(10 * u32::from(base_equal) + u32::from(sub_equal))
    } else {
        None
    }
}

impl HeaderNegotiator for LanguageNegotiator {
    fn negotiate(&self, header: &str, candidates: &[String]) -> Result<Option<usize>, NegotiationError> {
        let items = parse_items(header, |item| Ok(item.value()))?;
        Ok(select_best(&items, candidates, score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCEPT: &str = "gl-es, es;q=0.8, en;q=0.7";

    fn negotiate(header: &str, languages: &[&str]) -> Option<String> {
        let languages: Vec<String> = languages.iter().map(ToString::to_string).collect();
        LanguageNegotiator.negotiate(header, &languages).unwrap().map(|index| languages[index].clone())
    }

    #[test]
    fn test_regional_variant_matches_base() {
        assert_eq!(negotiate(ACCEPT, &["gl"]).as_deref(), Some("gl"));
        assert_eq!(negotiate(ACCEPT, &["gl", "es"]).as_deref(), Some("gl"));
    }

    #[test]
    fn test_quality_beats_candidate_order() {
        assert_eq!(negotiate(ACCEPT, &["es", "en"]).as_deref(), Some("es"));
        assert_eq!(negotiate(ACCEPT, &["en", "es"]).as_deref(), Some("es"));
    }

    #[test]
    fn test_base_item_matches_regional_candidate() {
        assert_eq!(negotiate("en", &["en-US"]).as_deref(), Some("en-US"));
        assert_eq!(negotiate("en-GB", &["en-US"]), None);
    }

    #[test]
    fn test_exact_regional_match_is_preferred() {
        assert_eq!(negotiate("en-gb;q=0.9, en;q=0.5", &["en-US", "en-GB"]).as_deref(), Some("en-GB"));
    }

    #[test]
    fn test_wildcard() {
        assert_eq!(negotiate("fr, *;q=0.1", &["de", "fr"]).as_deref(), Some("fr"));
        assert_eq!(negotiate("*", &["de", "fr"]).as_deref(), Some("de"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(negotiate("fr", &["de", "es"]), None);
        assert_eq!(negotiate(ACCEPT, &[]), None);
    }
}
