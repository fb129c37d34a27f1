use actix_web::HttpResponse;
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

fn render(requests: u64, errors: u64) -> String {
    format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_errors_total Total number of HTTP responses with status >= 400\n\
         # TYPE http_errors_total counter\n\
         http_errors_total {}\n",
        requests, errors
    )
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus text exposition", content_type = "text/plain")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let requests = REQUEST_COUNT.load(Ordering::Relaxed);
    let errors = ERROR_COUNT.load(Ordering::Relaxed);

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(render(requests, errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let text = render(12, 3);
        assert!(text.contains("http_requests_total 12\n"));
        assert!(text.contains("http_errors_total 3\n"));
    }
}
