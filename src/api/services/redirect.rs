use std::borrow::Cow;
use std::fmt::Write;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, trace};

use crate::storage::{UrlStore, is_valid_key};

pub struct RedirectService {}

impl RedirectService {
    /// Resolve the last path segment of any request and redirect to it.
    ///
    /// Registered as the default service, so every method and path ends up
    /// here. The query string never takes part in the lookup.
    pub async fn handle_redirect(
        req: HttpRequest,
        store: web::Data<Arc<UrlStore>>,
    ) -> HttpResponse {
        let key = last_path_segment(req.path());
        let key = urlencoding::decode(key).unwrap_or(Cow::Borrowed(key));

        if !is_valid_key(&key) {
            // 非法短码，不碰锁直接 404
            trace!("Invalid key rejected: {}", &key);
            return Self::not_found_response();
        }

        match store.resolve(&key) {
            Some(target) => {
                debug!("Redirecting {} -> {}", &key, &target);
                Self::finish_redirect(&target)
            }
            None => {
                debug!("Key not found: {}", &key);
                Self::not_found_response()
            }
        }
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .insert_header(("X-Content-Type-Options", "nosniff"))
            .body("404 page not found\n")
    }

    fn finish_redirect(target: &str) -> HttpResponse {
        let location = escape_non_ascii(target);
        HttpResponse::build(StatusCode::FOUND)
            .insert_header(("Location", &*location))
            .finish()
    }
}

/// Percent-encode every byte ≥ 0x80 so the header value stays ASCII.
fn escape_non_ascii(target: &str) -> Cow<'_, str> {
    if target.is_ascii() {
        return Cow::Borrowed(target);
    }

    let mut escaped = String::with_capacity(target.len() * 3);
    for b in target.bytes() {
        if b.is_ascii() {
            escaped.push(b as char);
        } else {
            let _ = write!(escaped, "%{:02X}", b);
        }
    }
    Cow::Owned(escaped)
}

/// Last element of a URL path, ignoring trailing slashes.
///
/// `/a/b/key` and `/key/` both yield `key`; `/` yields an empty string.
pub fn last_path_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}
