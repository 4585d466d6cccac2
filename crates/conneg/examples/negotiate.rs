use http::header::{ACCEPT, ACCEPT_CHARSET, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONTENT_LANGUAGE, CONTENT_TYPE, LOCATION};
use http::{HeaderName, Request, Response};
use micro_conneg::{
    ContentEncoding, ContentLanguage, ContentType, FormatRegistry, Handler, HandlerDecorator, HandlerDecoratorExt, RequestExt, make_handler,
};
use std::convert::Infallible;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

async fn render(req: Request<()>) -> Result<Response<String>, Infallible> {
    let header = |name: HeaderName| req.headers().get(name).and_then(|value| value.to_str().ok()).unwrap_or("-");
    let body = format!(
        "format={} accept={} charset={} language={} encoding={}",
        req.attribute("format").unwrap_or("-"),
        header(ACCEPT),
        header(ACCEPT_CHARSET),
        header(ACCEPT_LANGUAGE),
        header(ACCEPT_ENCODING),
    );
    Ok(Response::new(body))
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let registry = match FormatRegistry::from_json(
        r#"["html", "json", {"name": "csv", "extension": ["csv"], "mime-type": ["text/csv"], "charset": true}, "png"]"#,
    ) {
        Ok(registry) => registry,
        Err(e) => {
            error!(cause = %e, "invalid format registry");
            return;
        }
    };

    let content_type = ContentType::builder().registry(registry).charsets(["UTF-8", "ISO-8859-1"]).attribute("format").build();
    let language = ContentLanguage::builder(["en", "es", "gl"]).use_path(true).redirect(true).build();
    let encoding = ContentEncoding::builder().encodings(["br", "gzip", "deflate"]).build();

    let (content_type, language, encoding) = match (content_type, language, encoding) {
        (Ok(content_type), Ok(language), Ok(encoding)) => (content_type, language, encoding),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
            error!(cause = %e, "invalid selector configuration");
            return;
        }
    };

    let handler = content_type.and_then(language).and_then(encoding).decorate(make_handler(render));

    let requests = [
        ("/en/report.csv", "text/html", "es", "gzip;q=0.5, br"),
        ("/es/", "application/json, */*;q=0.1", "en", "identity"),
        ("/gl/logo", "image/*", "", "*"),
        ("/about?tab=team", "text/html", "gl-ES, es;q=0.8", "gzip"),
    ];

    for (uri, accept, accept_language, accept_encoding) in requests {
        let req = Request::builder()
            .uri(uri)
            .header(ACCEPT, accept)
            .header(ACCEPT_LANGUAGE, accept_language)
            .header(ACCEPT_ENCODING, accept_encoding)
            .body(())
            .expect("static request is valid");

        match handler.call(req).await {
            Ok(resp) => info!(
                uri,
                status = %resp.status(),
                content_type = ?resp.headers().get(CONTENT_TYPE),
                content_language = ?resp.headers().get(CONTENT_LANGUAGE),
                location = ?resp.headers().get(LOCATION),
                body = resp.body(),
                "handled request"
            ),
            Err(e) => error!(uri, cause = %e, "failed to handle request"),
        }
    }
}
