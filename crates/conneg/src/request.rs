//! Request scoped attributes.
//!
//! Selectors record what they resolved as named string attributes, stored in
//! the request's [`http::Extensions`], so downstream handlers can read them
//! without parsing headers again.

use http::Request;
use std::collections::HashMap;

/// Named string values attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    inner: HashMap<String, String>,
}

impl Attributes {
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    /// Sets `name` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.inner.insert(name.into(), value.into())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Attribute access on [`http::Request`].
pub trait RequestExt {
    /// Returns the attribute `name`, if any selector or handler has set it.
    fn attribute(&self, name: &str) -> Option<&str>;

    fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>);
}

impl<B> RequestExt for Request<B> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.extensions().get::<Attributes>().and_then(|attributes| attributes.get(name))
    }

    fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.extensions_mut().get_or_insert_default::<Attributes>().insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes() {
        let mut req = Request::new(());
        assert_eq!(req.attribute("format"), None);

        req.set_attribute("format", "json");
        req.set_attribute("other", "value");
        assert_eq!(req.attribute("format"), Some("json"));

        req.set_attribute("format", "html");
        assert_eq!(req.attribute("format"), Some("html"));
        assert_eq!(req.extensions().get::<Attributes>().map(Attributes::len), Some(2));
    }
}
