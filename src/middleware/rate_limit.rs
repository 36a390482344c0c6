use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Fixed one-second window over the whole API group. The window resets lazily
/// on the first request that arrives after it expires.
#[derive(Clone, Debug)]
pub struct Throttle {
    limit: u32,
    window: Arc<Mutex<(Instant, u32)>>,
}

impl Throttle {
    pub fn per_second(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            window: Arc::new(Mutex::new((Instant::now(), 0))),
        }
    }

    fn admit(&self) -> bool {
        let mut window = self.window.lock().expect("throttle mutex poisoned");
        let now = Instant::now();
        if now.duration_since(window.0) >= Duration::from_secs(1) {
            *window = (now, 0);
        }
        if window.1 < self.limit {
            window.1 += 1;
            true
        } else {
            false
        }
    }
}

pub async fn throttle(
    State(state): State<Throttle>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !state.admit() {
        return (StatusCode::TOO_MANY_REQUESTS, "rate_limit_exceeded").into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_beyond_the_limit_are_refused_within_one_window() {
        let throttle = Throttle::per_second(2);
        assert!(throttle.admit());
        assert!(throttle.admit());
        assert!(!throttle.admit());
    }
}
