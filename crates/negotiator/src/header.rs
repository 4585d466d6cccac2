//! Parsing of comma separated `Accept*` header values.
//!
//! Every item of the list is a value followed by optional `;` separated
//! parameters. The `q` parameter is pulled out as the item's [`Quality`], all
//! other parameters are kept in order for the matchers that care about them.

use crate::NegotiationError;
use std::fmt;

/// A quality weight in `[0, 1]`, stored as thousandths so it can be ordered exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u16);

impl Quality {
    pub const ZERO: Quality = Quality(0);
    pub const MAX: Quality = Quality(1000);

    /// Parses a `q` parameter value such as `0.8` or `1`.
    pub fn parse(value: &str) -> Result<Self, NegotiationError> {
        let trimmed = value.trim();
        let weight = trimmed
            .parse::<f32>()
            .ok()
            .filter(|weight| (0.0..=1.0).contains(weight))
            .ok_or_else(|| NegotiationError::invalid_quality(trimmed))?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "weight is checked to be within [0, 1]")]
        let millis = (weight * 1000.0).round() as u16;
        Ok(Self(millis))
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}

/// One entry of an `Accept*` header, borrowing from the raw header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptItem<'a> {
    value: &'a str,
    params: Vec<(&'a str, &'a str)>,
    quality: Quality,
}

impl<'a> AcceptItem<'a> {
    fn parse(raw: &'a str) -> Result<Self, NegotiationError> {
        let mut parts = raw.split(';');
        // split always yields at least one part
        let value = parts.next().unwrap_or_default().trim();
        if value.is_empty() {
            return Err(NegotiationError::invalid_item(format!("missing value in `{raw}`")));
        }

        let mut params = Vec::new();
        let mut quality = Quality::MAX;
        for param in parts.map(str::trim).filter(|param| !param.is_empty()) {
            let Some((name, param_value)) = param.split_once('=') else {
                return Err(NegotiationError::invalid_item(format!("parameter without value in `{raw}`")));
            };

            let name = name.trim();
            let param_value = param_value.trim().trim_matches('"');
            if name.eq_ignore_ascii_case("q") {
                quality = Quality::parse(param_value)?;
            } else {
                params.push((name, param_value));
            }
        }

        Ok(Self { value, params, quality })
    }

    /// The item without its parameters, e.g. `text/html` or `gzip`.
    #[inline]
    pub fn value(&self) -> &'a str {
        self.value
    }

    /// Parameters other than `q`, in header order.
    #[inline]
    pub fn params(&self) -> &[(&'a str, &'a str)] {
        &self.params
    }

    #[inline]
    pub fn quality(&self) -> Quality {
        self.quality
    }
}

/// Splits a header value into its items.
///
/// Empty list elements (`gzip,,br`) are skipped, but a header without any item
/// is an error.
pub fn parse_header(header: &str) -> Result<Vec<AcceptItem<'_>>, NegotiationError> {
    let items = header
        .split(',')
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(AcceptItem::parse)
        .collect::<Result<Vec<_>, _>>()?;

    if items.is_empty() {
        return Err(NegotiationError::EmptyHeader);
    }

    Ok(items)
}
