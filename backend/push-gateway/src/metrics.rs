/// Prometheus metrics for the gateway
use std::rc::Rc;
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures::future::{ready, LocalBoxFuture, Ready};
use once_cell::sync::Lazy;
use prometheus::core::Collector;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, TextEncoder};

/// Route label for requests that match no registered route
pub const UNMATCHED_ROUTE: &str = "unmatched";

const HTTP_LABELS: &[&str] = &["method", "route", "status"];

static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register(IntCounterVec::new(
        Opts::new(
            "push_gateway_http_requests_total",
            "HTTP requests by method, route pattern and status",
        ),
        HTTP_LABELS,
    ))
});

static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register(HistogramVec::new(
        HistogramOpts::new(
            "push_gateway_http_request_duration_seconds",
            "HTTP request latency by method, route pattern and status",
        )
        .buckets(vec![0.005, 0.025, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        HTTP_LABELS,
    ))
});

static PROVIDER_CALLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register(IntCounterVec::new(
        Opts::new(
            "push_gateway_provider_calls_total",
            "Push provider calls by operation and outcome",
        ),
        &["operation", "outcome"],
    ))
});

// Metric definitions are static; failing here is a programming error.
fn register<C>(collector: prometheus::Result<C>) -> C
where
    C: Collector + Clone + 'static,
{
    let collector = collector.expect("invalid metric definition");
    prometheus::default_registry()
        .register(Box::new(collector.clone()))
        .expect("metric registered twice");
    collector
}

pub fn observe_provider_call(operation: &str, success: bool) {
    let outcome = if success { "success" } else { "error" };
    PROVIDER_CALLS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

/// GET /metrics
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    match encoder.encode(&prometheus::gather(), &mut buffer) {
        Ok(()) => HttpResponse::Ok()
            .content_type(encoder.format_type())
            .body(buffer),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

/// Records count and latency of every request, keyed by the matched route
/// pattern so unknown paths collapse into one series.
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let route = req
            .match_pattern()
            .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());
        let method = req.method().to_string();
        let started = Instant::now();

        Box::pin(async move {
            let result = service.call(req).await;
            let status = result
                .as_ref()
                .map(|response| response.status().as_u16())
                .unwrap_or(500)
                .to_string();

            let labels = [method.as_str(), route.as_str(), status.as_str()];
            HTTP_REQUESTS_TOTAL.with_label_values(&labels).inc();
            HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&labels)
                .observe(started.elapsed().as_secs_f64());

            result
        })
    }
}
