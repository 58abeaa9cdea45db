//! Process-wide request rate limiting
//!
//! One token bucket shared by every client. Requests beyond the configured
//! per-minute quota are answered with 429 until the bucket refills.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

/// Default request budget per minute
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 100;

/// Bucket holding `per_minute` tokens, refilled evenly over a minute
pub fn rate_limiter(per_minute: NonZeroU32) -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_minute(per_minute))
}

/// Rate limiting middleware, applied to the `/api` routes
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.rate_limiter.check().is_err() {
        warn!(path = %request.uri().path(), "Rate limit exceeded");
        return Err(ApiError::RateLimited);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_allows_burst_then_rejects() {
        let limiter = rate_limiter(NonZeroU32::new(3).unwrap());

        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }
}
