//! Per-IP rate limiting with token buckets.
//!
//! One bucket per client IP; whitelisted IPs bypass entirely. Strictness is
//! set by the deployment environment through `RateLimitConfig`. Stale
//! buckets are swept by a background task.

use crate::domain::config::RateLimitConfig;
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    response::Response,
};
use dashmap::DashMap;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::{Layer, Service};
use tracing::{debug, warn};

/// Token bucket entry for one IP.
struct TokenBucket {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    last_access: Instant,
}

impl TokenBucket {
    fn new(config: &RateLimitConfig) -> Self {
        let rps = NonZeroU32::new(config.requests_per_second)
            .unwrap_or(NonZeroU32::new(100).unwrap());
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(rps);
        let quota = Quota::per_second(rps).allow_burst(burst);
        Self {
            limiter: RateLimiter::direct(quota),
            last_access: Instant::now(),
        }
    }

    fn check(&mut self) -> Result<(), Duration> {
        self.last_access = Instant::now();
        match self.limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => Err(not_until.wait_time_from(governor::clock::Clock::now(
                &governor::clock::DefaultClock::default(),
            ))),
        }
    }
}

/// Shared limiter state.
pub struct RateLimitState {
    buckets: DashMap<IpAddr, TokenBucket>,
    config: RateLimitConfig,
}

impl RateLimitState {
    /// Build from configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
        }
    }

    /// Allow or defer a request from `ip`.
    pub fn check(&self, ip: IpAddr) -> Result<(), Duration> {
        if !self.config.enabled || self.config.whitelist.contains(&ip) {
            return Ok(());
        }
        let mut bucket = self.buckets.entry(ip).or_insert_with(|| {
            debug!(ip = %ip, "creating rate limit bucket");
            TokenBucket::new(&self.config)
        });
        bucket.check()
    }

    /// Drop buckets idle longer than `max_age`.
    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.buckets
            .retain(|_, bucket| now.duration_since(bucket.last_access) <= max_age);
    }

    /// Number of tracked IPs.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

/// Rate limit layer.
#[derive(Clone)]
pub struct RateLimitLayer {
    state: Arc<RateLimitState>,
}

impl RateLimitLayer {
    /// Build the layer and its shared state.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            state: Arc::new(RateLimitState::new(config)),
        }
    }

    /// Handle to the shared state, for the cleanup task.
    pub fn state(&self) -> Arc<RateLimitState> {
        Arc::clone(&self.state)
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            state: Arc::clone(&self.state),
        }
    }
}

/// Rate limit service.
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    state: Arc<RateLimitState>,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let state = Arc::clone(&self.state);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let ip = extract_client_ip(&req);
            match state.check(ip) {
                Ok(()) => inner.call(req).await,
                Err(retry_after) => {
                    let retry_ms = retry_after.as_millis() as u64;
                    warn!(ip = %ip, retry_after_ms = retry_ms, "rate limit exceeded");
                    Ok(rate_limit_response(retry_ms))
                }
            }
        })
    }
}

/// Extract client IP: forwarded headers first, then connection info.
fn extract_client_ip<B>(req: &Request<B>) -> IpAddr {
    if let Some(forwarded) = req.headers().get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }

    if let Some(real_ip) = req.headers().get("x-real-ip") {
        if let Ok(real_ip_str) = real_ip.to_str() {
            if let Ok(ip) = real_ip_str.parse::<IpAddr>() {
                return ip;
            }
        }
    }

    if let Some(connect_info) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip();
    }

    IpAddr::from([127, 0, 0, 1])
}

/// 429 with the standard envelope and a Retry-After hint.
fn rate_limit_response(retry_after_ms: u64) -> Response {
    let body = serde_json::json!({
        "success": false,
        "error": "rate limit exceeded",
    });

    let mut response = Response::new(Body::from(serde_json::to_vec(&body).unwrap_or_default()));
    *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
    if let Ok(content_type) = "application/json".parse() {
        response.headers_mut().insert("Content-Type", content_type);
    }
    if let Ok(retry) = retry_after_ms.div_ceil(1000).to_string().parse() {
        response.headers_mut().insert("Retry-After", retry);
    }
    response
}

/// Background sweep of stale buckets.
pub async fn cleanup_task(state: Arc<RateLimitState>, interval: Duration, max_age: Duration) {
    let mut cleanup_interval = tokio::time::interval(interval);
    cleanup_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        cleanup_interval.tick().await;
        state.cleanup(max_age);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn test_config() -> RateLimitConfig {
        RateLimitConfig {
            enabled: true,
            requests_per_second: 5,
            burst_size: 5,
            whitelist: vec![IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))],
        }
    }

    #[test]
    fn test_burst_then_limited() {
        let state = RateLimitState::new(test_config());
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));

        for _ in 0..5 {
            assert!(state.check(ip).is_ok());
        }
        assert!(state.check(ip).is_err());
    }

    #[test]
    fn test_whitelist_bypasses() {
        let state = RateLimitState::new(test_config());
        let ip = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1));

        for _ in 0..100 {
            assert!(state.check(ip).is_ok());
        }
    }

    #[test]
    fn test_disabled_allows_everything() {
        let mut config = test_config();
        config.enabled = false;
        let state = RateLimitState::new(config);
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        for _ in 0..100 {
            assert!(state.check(ip).is_ok());
        }
    }

    #[test]
    fn test_ips_do_not_share_buckets() {
        let state = RateLimitState::new(test_config());
        let first = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let second = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        for _ in 0..5 {
            assert!(state.check(first).is_ok());
        }
        assert!(state.check(first).is_err());
        assert!(state.check(second).is_ok());
    }

    #[test]
    fn test_cleanup_drops_stale_buckets() {
        let state = RateLimitState::new(test_config());
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        state.check(ip).unwrap();
        assert_eq!(state.bucket_count(), 1);

        state.cleanup(Duration::from_secs(0));
        assert_eq!(state.bucket_count(), 0);
    }

    #[test]
    fn test_forwarded_header_wins() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            extract_client_ip(&req),
            IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9))
        );
    }
}
