use crate::NegotiationError;
use crate::header::{AcceptItem, Quality, parse_header};
use tracing::trace;

/// Picks the best supported value for a client's `Accept*` header.
///
/// Implementations return the index of the winning entry in `candidates`, or
/// `None` when no candidate is acceptable. On equal quality the candidate
/// listed first wins.
pub trait HeaderNegotiator: Send + Sync {
    fn negotiate(&self, header: &str, candidates: &[String]) -> Result<Option<usize>, NegotiationError>;
}

/// Selects the best candidate for already parsed header items.
///
/// For each candidate the most specific matching item (highest score, first
/// one on equal score) decides the candidate's quality. Candidates whose
/// quality is zero are never selected.
pub(crate) fn select_best<T, C>(
    accepted: &[(T, Quality)],
    candidates: &[C],
    score: impl Fn(&T, &C) -> Option<u32>,
) -> Option<usize> {
    let mut best: Option<(usize, Quality)> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let mut specific: Option<(u32, Quality)> = None;
        for (item, quality) in accepted {
            if let Some(item_score) = score(item, candidate)
                && specific.is_none_or(|(current, _)| item_score > current)
            {
                specific = Some((item_score, *quality));
            }
        }

        let Some((_, quality)) = specific else {
            continue;
        };

        if quality.is_zero() {
            continue;
        }

        if best.is_none_or(|(_, best_quality)| quality > best_quality) {
            best = Some((index, quality));
        }
    }

    if let Some((index, quality)) = best {
        trace!(index, %quality, candidates = candidates.len(), "selected best candidate");
    }

    best.map(|(index, _)| index)
}

/// Parses `header` and pairs every item with its quality, converting the
/// item with `parse_item`.
pub(crate) fn parse_items<'h, T>(
    header: &'h str,
    parse_item: impl Fn(&AcceptItem<'h>) -> Result<T, NegotiationError>,
) -> Result<Vec<(T, Quality)>, NegotiationError> {
    parse_header(header)?.iter().map(|item| Ok((parse_item(item)?, item.quality()))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(item: &&str, candidate: &&str) -> Option<u32> {
        (item == candidate).then_some(1)
    }

    fn q(value: &str) -> Quality {
        Quality::parse(value).unwrap()
    }

    #[test]
    fn test_highest_quality_wins() {
        let accepted = vec![("a", q("0.5")), ("b", q("0.9"))];
        assert_eq!(select_best(&accepted, &["a", "b"], exact), Some(1));
    }

    #[test]
    fn test_tie_prefers_first_candidate() {
        let accepted = vec![("b", q("1")), ("a", q("1"))];
        assert_eq!(select_best(&accepted, &["a", "b"], exact), Some(0));
        assert_eq!(select_best(&accepted, &["b", "a"], exact), Some(0));
    }

    #[test]
    fn test_zero_quality_excludes_candidate() {
        let accepted = vec![("a", q("0")), ("b", q("0.1"))];
        assert_eq!(select_best(&accepted, &["a", "b"], exact), Some(1));
        assert_eq!(select_best(&accepted, &["a"], exact), None);
    }

    #[test]
    fn test_most_specific_item_decides_quality() {
        // "*" scores 0, an exact match scores 1
        let score = |item: &&str, candidate: &&str| match *item {
            "*" => Some(0),
            item if item == *candidate => Some(1),
            _ => None,
        };

        let accepted = vec![("*", q("1")), ("a", q("0"))];
        assert_eq!(select_best(&accepted, &["a", "b"], score), Some(1));
    }

    #[test]
    fn test_no_candidates() {
        let accepted = vec![("a", q("1"))];
        assert_eq!(select_best::<&str, &str>(&accepted, &[], exact), None);
    }
}
