pub mod csrf;
pub mod rate_limit;

pub use csrf::CsrfGuard;
pub use rate_limit::RateLimiter;
