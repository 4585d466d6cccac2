//! The built-in format table.

pub(crate) struct BuiltinFormat {
    pub(crate) name: &'static str,
    pub(crate) extensions: &'static [&'static str],
    pub(crate) mime_types: &'static [&'static str],
    pub(crate) charset: bool,
}

const fn text(name: &'static str, extensions: &'static [&'static str], mime_types: &'static [&'static str]) -> BuiltinFormat {
    BuiltinFormat { name, extensions, mime_types, charset: true }
}

const fn binary(name: &'static str, extensions: &'static [&'static str], mime_types: &'static [&'static str]) -> BuiltinFormat {
    BuiltinFormat { name, extensions, mime_types, charset: false }
}

const JAVASCRIPT: &[&str] = &["text/javascript", "application/javascript", "application/x-javascript"];

pub(crate) const BUILTIN_FORMATS: &[BuiltinFormat] = &[
    // text
    text("html", &["html", "htm", "php"], &["text/html", "application/xhtml+xml"]),
    text("txt", &["txt"], &["text/plain"]),
    text("css", &["css"], &["text/css"]),
    text("json", &["json"], &["application/json", "text/json", "application/x-json"]),
    text("jsonp", &["jsonp"], JAVASCRIPT),
    text("js", &["js"], JAVASCRIPT),
    // xml
    text("rdf", &["rdf"], &["application/rdf+xml"]),
    text("rss", &["rss"], &["application/rss+xml"]),
    text("atom", &["atom"], &["application/atom+xml"]),
    text("xml", &["xml"], &["text/xml", "application/xml", "application/x-xml"]),
    text("kml", &["kml"], &["application/vnd.google-earth.kml+xml"]),
    // images
    binary("bmp", &["bmp"], &["image/bmp"]),
    binary("gif", &["gif"], &["image/gif"]),
    binary("png", &["png"], &["image/png", "image/x-png"]),
    binary("jpg", &["jpg", "jpeg", "jpe"], &["image/jpeg", "image/jpg"]),
    binary("svg", &["svg", "svgz"], &["image/svg+xml"]),
    binary("psd", &["psd"], &["image/vnd.adobe.photoshop"]),
    binary("eps", &["ai", "eps", "ps"], &["application/postscript"]),
    binary("ico", &["ico"], &["image/x-icon", "image/vnd.microsoft.icon"]),
    // audio and video
    binary("mov", &["mov", "qt"], &["video/quicktime"]),
    binary("mp3", &["mp3"], &["audio/mpeg"]),
    binary("mp4", &["mp4"], &["video/mp4"]),
    binary("ogg", &["ogg"], &["audio/ogg"]),
    binary("ogv", &["ogv"], &["video/ogg"]),
    binary("webm", &["webm"], &["video/webm"]),
    binary("webp", &["webp"], &["image/webp"]),
    // fonts
    binary("eot", &["eot"], &["application/vnd.ms-fontobject"]),
    binary("otf", &["otf"], &["font/opentype", "application/x-font-opentype"]),
    binary("ttf", &["ttf"], &["font/ttf", "application/font-ttf", "application/x-font-ttf"]),
    binary("woff", &["woff"], &["font/woff", "application/font-woff", "application/x-font-woff"]),
    binary("woff2", &["woff2"], &["font/woff2", "application/font-woff2", "application/x-font-woff2"]),
    // other
    binary("pdf", &["pdf"], &["application/pdf", "application/x-download"]),
    binary("zip", &["zip"], &["application/zip", "application/x-zip", "application/x-zip-compressed"]),
    binary("rar", &["rar"], &["application/rar", "application/x-rar", "application/x-rar-compressed"]),
    binary("exe", &["exe"], &["application/x-msdownload"]),
    binary("msi", &["msi"], &["application/x-msdownload"]),
    binary("cab", &["cab"], &["application/vnd.ms-cab-compressed"]),
    binary("doc", &["doc"], &["application/msword"]),
    binary("rtf", &["rtf"], &["application/rtf"]),
    binary("xls", &["xls"], &["application/vnd.ms-excel"]),
    binary("ppt", &["ppt"], &["application/vnd.ms-powerpoint"]),
    binary("odt", &["odt"], &["application/vnd.oasis.opendocument.text"]),
    binary("ods", &["ods"], &["application/vnd.oasis.opendocument.spreadsheet"]),
];

pub(crate) fn find(name: &str) -> Option<&'static BuiltinFormat> {
    BUILTIN_FORMATS.iter().find(|format| format.name == name)
}
