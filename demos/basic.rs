//! Minimal wildroute example: an admin app and legacy modules sharing `/`.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/admin/products
//!   curl -i http://localhost:3000/downloads/report.pdf
//!   curl -i http://localhost:3000/about
//!   curl -i http://localhost:3000/nowhere

use http::StatusCode;
use http::header::{HeaderName, HeaderValue};
use wildroute::{
    ContentType, FallbackRouter, Handler, Mux, Request, ResponseWriter, ResponseWriterExt, Server,
    middleware,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut mux = Mux::new();

    FallbackRouter::new()
        .add_handler(admin)
        .mount_to("/admin", &mut mux);

    FallbackRouter::new()
        .add_handler(Downloads { root: "/downloads/" })
        .mount_to("/downloads", &mut mux);

    FallbackRouter::new()
        .use_middleware(middleware::trace)
        .use_middleware(middleware::set_header(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .add_handler(pages)
        .add_handler(legacy_blog)
        .not_found_handler(gone)
        .mount_to("/", &mut mux);

    if let Err(e) = Server::bind("0.0.0.0:3000").serve(mux).await {
        eprintln!("server error: {e}");
    }
}

// /admin and /admin/…
fn admin(w: &mut dyn ResponseWriter, req: &Request) {
    let section = req.path().trim_start_matches("/admin").trim_matches('/');
    let body = format!(r#"{{"section":"{section}"}}"#);
    let _ = w.send(StatusCode::OK, ContentType::Json, body);
}

// A stateful module: serves anything under its root, declines the bare root.
struct Downloads {
    root: &'static str,
}

impl Handler for Downloads {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        let _ = match req.path().strip_prefix(self.root) {
            Some(name) if !name.is_empty() => {
                w.headers_mut().insert(
                    "content-disposition",
                    HeaderValue::from_str(&format!("attachment; filename=\"{name}\""))
                        .unwrap_or(HeaderValue::from_static("attachment")),
                );
                w.send(StatusCode::OK, ContentType::OctetStream, name)
            }
            _ => w.not_found(),
        };
    }
}

// GET /about, GET /contact
fn pages(w: &mut dyn ResponseWriter, req: &Request) {
    let _ = match req.path() {
        "/about" => w.send(StatusCode::OK, ContentType::Html, "<h1>About</h1>"),
        "/contact" => w.send(StatusCode::OK, ContentType::Html, "<h1>Contact</h1>"),
        _ => w.not_found(),
    };
}

// Old URLs move permanently; everything else is somebody else's problem.
fn legacy_blog(w: &mut dyn ResponseWriter, req: &Request) {
    if let Some(slug) = req.path().strip_prefix("/blog.php/") {
        if let Ok(location) = HeaderValue::from_str(&format!("/blog/{slug}")) {
            w.headers_mut().insert("location", location);
            w.write_header(StatusCode::MOVED_PERMANENTLY);
            return;
        }
    }
    w.write_header(StatusCode::NOT_FOUND);
}

fn gone(w: &mut dyn ResponseWriter, _req: &Request) {
    let _ = w.send(StatusCode::NOT_FOUND, ContentType::Html, "<h1>Sorry, this page was gone!</h1>");
}
