//! Formats and the registry the content type selector resolves them from.
//!
//! A [`Format`] bundles the file extensions and mime types of one
//! representation, e.g. `json` for `.json` files and `application/json`. The
//! [`FormatRegistry`] keeps formats in order: the first one is the default and
//! reverse lookups return the first format owning a value.

mod builtin;

use crate::ConfigError;
use builtin::{BUILTIN_FORMATS, BuiltinFormat};
use http::HeaderValue;
use mime::Mime;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::slice;
use std::sync::Arc;

/// A named representation: its extensions, mime types and charset flag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "FormatDef")]
pub struct Format {
    name: String,
    extensions: Vec<String>,
    mime_types: Vec<String>,
    needs_charset: bool,
    accept_value: HeaderValue,
}

/// Serialized shape of a [`Format`], using the field names of the format table.
#[derive(Deserialize)]
struct FormatDef {
    name: String,
    #[serde(default, rename = "extension")]
    extensions: Vec<String>,
    #[serde(rename = "mime-type")]
    mime_types: Vec<String>,
    #[serde(default, rename = "charset")]
    needs_charset: bool,
}

impl TryFrom<FormatDef> for Format {
    type Error = ConfigError;

    fn try_from(def: FormatDef) -> Result<Self, Self::Error> {
        Format::new(def.name, def.extensions, def.mime_types, def.needs_charset)
    }
}

impl Format {
    /// Creates a format, checking that it has at least one mime type and that
    /// every mime type is well formed.
    ///
    /// The first mime type is the canonical one, used when a request or
    /// response header is rewritten.
    pub fn new<E, M>(name: impl Into<String>, extensions: E, mime_types: M, needs_charset: bool) -> Result<Self, ConfigError>
    where
        E: IntoIterator,
        E::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        let name = name.into();
        let extensions = extensions.into_iter().map(Into::into).collect();
        let mime_types: Vec<String> = mime_types.into_iter().map(Into::into).collect();

        let Some(canonical) = mime_types.first() else {
            return Err(ConfigError::MissingMimeType { name });
        };

        for mime_type in &mime_types {
            if let Err(source) = mime_type.parse::<Mime>() {
                return Err(ConfigError::InvalidMimeType { name, mime_type: mime_type.clone(), source });
            }
        }

        let accept_value = HeaderValue::from_str(canonical).map_err(|e| ConfigError::invalid_header_value(canonical, e))?;
        Ok(Self { name, extensions, mime_types, needs_charset, accept_value })
    }

    fn from_builtin(builtin: &BuiltinFormat) -> Self {
        Self {
            name: builtin.name.to_string(),
            extensions: builtin.extensions.iter().map(ToString::to_string).collect(),
            mime_types: builtin.mime_types.iter().map(ToString::to_string).collect(),
            needs_charset: builtin.charset,
            // every built-in format lists at least one valid mime type
            accept_value: HeaderValue::from_static(builtin.mime_types[0]),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    #[inline]
    pub fn mime_types(&self) -> &[String] {
        &self.mime_types
    }

    /// The first mime type of the format.
    #[inline]
    pub fn canonical_mime_type(&self) -> &str {
        // non-empty, checked on construction
        &self.mime_types[0]
    }

    /// Whether `Content-Type` gets a `; charset=` suffix for this format.
    #[inline]
    pub fn needs_charset(&self) -> bool {
        self.needs_charset
    }

    /// The `Content-Type` value for a response in this format.
    pub fn content_type(&self, charset: &str) -> String {
        if self.needs_charset {
            format!("{}; charset={}", self.canonical_mime_type(), charset)
        } else {
            self.canonical_mime_type().to_string()
        }
    }

    /// The canonical mime type as a ready to use header value.
    #[inline]
    pub(crate) fn accept_value(&self) -> &HeaderValue {
        &self.accept_value
    }

    fn has_extension(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(extension))
    }

    fn has_mime_type(&self, mime_type: &str) -> bool {
        self.mime_types.iter().any(|m| m == mime_type)
    }
}

/// One entry of a custom registry: a built-in format referenced by name, or a
/// complete format definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FormatOverride {
    Builtin(String),
    Custom(Format),
}

impl From<Format> for FormatOverride {
    fn from(format: Format) -> Self {
        Self::Custom(format)
    }
}

impl From<&str> for FormatOverride {
    fn from(name: &str) -> Self {
        Self::Builtin(name.to_string())
    }
}

impl From<String> for FormatOverride {
    fn from(name: String) -> Self {
        Self::Builtin(name)
    }
}

static SHARED_BUILTIN: Lazy<Arc<FormatRegistry>> = Lazy::new(|| Arc::new(FormatRegistry::builtin()));

/// An ordered, immutable set of formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRegistry {
    formats: Vec<Format>,
    mime_types: Vec<String>,
}

impl FormatRegistry {
    /// Builds a registry holding the built-in format table, `html` first.
    pub fn builtin() -> Self {
        Self::from_formats(BUILTIN_FORMATS.iter().map(Format::from_builtin).collect())
    }

    /// Returns the process wide built-in registry, building it on first use.
    pub fn shared_builtin() -> Arc<Self> {
        Arc::clone(&SHARED_BUILTIN)
    }

    /// Builds a registry from `formats`, keeping their order.
    ///
    /// Fails if there are no formats or if two formats share a name.
    pub fn new(formats: impl IntoIterator<Item = Format>) -> Result<Self, ConfigError> {
        let formats: Vec<Format> = formats.into_iter().collect();
        if formats.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }

        for (index, format) in formats.iter().enumerate() {
            if formats[..index].iter().any(|other| other.name == format.name) {
                return Err(ConfigError::duplicate_format(&format.name));
            }
        }

        Ok(Self::from_formats(formats))
    }

    /// Builds a registry from built-in format names and custom formats.
    ///
    /// ```
    /// use micro_conneg::{Format, FormatOverride, FormatRegistry};
    ///
    /// let csv = Format::new("csv", ["csv"], ["text/csv"], true).unwrap();
    /// let registry = FormatRegistry::from_overrides([FormatOverride::from("json"), csv.into()]).unwrap();
    ///
    /// assert_eq!(registry.default_format().name(), "json");
    /// assert_eq!(registry.lookup_by_extension("CSV").map(Format::name), Some("csv"));
    /// ```
    pub fn from_overrides<I>(overrides: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<FormatOverride>,
    {
        let formats = overrides
            .into_iter()
            .map(|entry| match entry.into() {
                FormatOverride::Builtin(name) => {
                    builtin::find(&name).map(Format::from_builtin).ok_or_else(|| ConfigError::unknown_format(name))
                }
                FormatOverride::Custom(format) => Ok(format),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(formats)
    }

    /// Builds a registry from a JSON array of overrides, where a string names a
    /// built-in format and an object defines a custom one:
    ///
    /// ```json
    /// ["html", {"name": "csv", "extension": ["csv"], "mime-type": ["text/csv"], "charset": true}]
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let overrides: Vec<FormatOverride> = serde_json::from_str(json)?;
        Self::from_overrides(overrides)
    }

    fn from_formats(formats: Vec<Format>) -> Self {
        let mime_types = formats.iter().flat_map(|format| format.mime_types.iter().cloned()).collect();
        Self { formats, mime_types }
    }

    pub fn get(&self, name: &str) -> Option<&Format> {
        self.formats.iter().find(|format| format.name == name)
    }

    /// Returns the first format listing `extension`, ignoring ASCII case.
    pub fn lookup_by_extension(&self, extension: &str) -> Option<&Format> {
        self.formats.iter().find(|format| format.has_extension(extension))
    }

    /// Returns the first format listing exactly `mime_type`.
    pub fn lookup_by_mime_type(&self, mime_type: &str) -> Option<&Format> {
        self.formats.iter().find(|format| format.has_mime_type(mime_type))
    }

    /// Every mime type of every format, in registry order.
    #[inline]
    pub fn all_mime_types(&self) -> &[String] {
        &self.mime_types
    }

    #[inline]
    pub fn default_format(&self) -> &Format {
        // non-empty, checked on construction
        &self.formats[0]
    }

    pub fn iter(&self) -> slice::Iter<'_, Format> {
        self.formats.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl<'a> IntoIterator for &'a FormatRegistry {
    type Item = &'a Format;
    type IntoIter = slice::Iter<'a, Format>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let registry = FormatRegistry::builtin();
        let names: Vec<_> = registry.iter().map(Format::name).take(6).collect();

        assert_eq!(names, vec!["html", "txt", "css", "json", "jsonp", "js"]);
        assert_eq!(registry.default_format().name(), "html");
        assert_eq!(registry.len(), BUILTIN_FORMATS.len());
        assert_eq!(&registry.all_mime_types()[..3], &["text/html", "application/xhtml+xml", "text/plain"]);
    }

    #[test]
    fn test_builtin_formats_are_valid() {
        for builtin in BUILTIN_FORMATS {
            let checked = Format::new(builtin.name, builtin.extensions.iter().copied(), builtin.mime_types.iter().copied(), builtin.charset);
            assert_eq!(checked.unwrap(), Format::from_builtin(builtin));
        }
    }

    #[test]
    fn test_charset_groups() {
        let registry = FormatRegistry::builtin();
        for name in ["html", "txt", "css", "json", "jsonp", "js", "rdf", "rss", "atom", "xml", "kml"] {
            assert!(registry.get(name).unwrap().needs_charset(), "{name} should need a charset");
        }
        for name in ["png", "jpg", "mp4", "woff2", "pdf", "zip", "ods"] {
            assert!(!registry.get(name).unwrap().needs_charset(), "{name} should not need a charset");
        }
    }

    #[test]
    fn test_lookup_by_extension() {
        let registry = FormatRegistry::builtin();

        assert_eq!(registry.lookup_by_extension("json").map(Format::name), Some("json"));
        assert_eq!(registry.lookup_by_extension("JPEG").map(Format::name), Some("jpg"));
        assert_eq!(registry.lookup_by_extension("php").map(Format::name), Some("html"));
        assert_eq!(registry.lookup_by_extension("unknown"), None);
    }

    #[test]
    fn test_lookup_by_mime_type_prefers_registry_order() {
        let registry = FormatRegistry::builtin();

        assert_eq!(registry.lookup_by_mime_type("application/xhtml+xml").map(Format::name), Some("html"));
        assert_eq!(registry.lookup_by_mime_type("application/javascript").map(Format::name), Some("jsonp"));
        assert_eq!(registry.lookup_by_mime_type("application/x-msdownload").map(Format::name), Some("exe"));
        assert_eq!(registry.lookup_by_mime_type("TEXT/HTML"), None);
    }

    #[test]
    fn test_content_type() {
        let registry = FormatRegistry::builtin();

        assert_eq!(registry.get("html").unwrap().content_type("UTF-8"), "text/html; charset=UTF-8");
        assert_eq!(registry.get("png").unwrap().content_type("UTF-8"), "image/png");
    }

    #[test]
    fn test_shared_builtin_is_built_once() {
        let first = FormatRegistry::shared_builtin();
        let second = FormatRegistry::shared_builtin();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_from_overrides() {
        let csv = Format::new("csv", ["csv"], ["text/csv"], true).unwrap();
        let registry = FormatRegistry::from_overrides([FormatOverride::from("json"), csv.into(), "png".into()]).unwrap();

        let names: Vec<_> = registry.iter().map(Format::name).collect();
        assert_eq!(names, vec!["json", "csv", "png"]);
        assert_eq!(registry.default_format().canonical_mime_type(), "application/json");
        assert_eq!(registry.all_mime_types(), &["application/json", "text/json", "application/x-json", "text/csv", "image/png", "image/x-png"]);
    }

    #[test]
    fn test_from_overrides_unknown_builtin() {
        let result = FormatRegistry::from_overrides(["html", "nope"]);
        assert!(matches!(result, Err(ConfigError::UnknownFormat { name }) if name == "nope"));
    }

    #[test]
    fn test_invalid_registries() {
        assert!(matches!(FormatRegistry::new([]), Err(ConfigError::EmptyRegistry)));
        assert!(matches!(FormatRegistry::from_overrides(["html", "html"]), Err(ConfigError::DuplicateFormat { .. })));
    }

    #[test]
    fn test_invalid_formats() {
        assert!(matches!(
            Format::new("none", ["x"], Vec::<String>::new(), false),
            Err(ConfigError::MissingMimeType { .. })
        ));
        assert!(matches!(Format::new("bad", ["x"], ["not a mime"], false), Err(ConfigError::InvalidMimeType { .. })));
    }

    #[test]
    fn test_from_json() {
        let json = r#"["html", {"name": "csv", "extension": ["csv"], "mime-type": ["text/csv"], "charset": true}, {"name": "bin", "mime-type": ["application/octet-stream"]}]"#;
        let registry = FormatRegistry::from_json(json).unwrap();

        assert_eq!(registry.len(), 3);
        let csv = registry.get("csv").unwrap();
        assert!(csv.needs_charset());
        assert_eq!(csv.extensions(), &["csv"]);

        let bin = registry.get("bin").unwrap();
        assert!(!bin.needs_charset());
        assert!(bin.extensions().is_empty());
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(FormatRegistry::from_json("not json"), Err(ConfigError::Json { .. })));
        assert!(matches!(FormatRegistry::from_json(r#"["html", "nope"]"#), Err(ConfigError::UnknownFormat { .. })));
        assert!(matches!(
            FormatRegistry::from_json(r#"[{"name": "bad", "mime-type": []}]"#),
            Err(ConfigError::Json { .. })
        ));
    }
}
