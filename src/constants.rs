//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Default service locations
pub mod services {
    /// Suggestion service (image analysis)
    pub const DEFAULT_SUGGESTION_URL: &str = "http://localhost:8000";

    /// Generation service (image-to-image)
    pub const DEFAULT_GENERATION_URL: &str = "http://localhost:8001";

    /// Auth and user service
    pub const DEFAULT_AUTH_URL: &str = "http://localhost:5000";
}

/// Endpoint paths, relative to their service base URL
pub mod endpoints {
    pub const REFINE: &str = "/refine-image";
    pub const GENERATE: &str = "/image-to-image";
    pub const HEALTH: &str = "/";
    pub const TOKEN_TRACKING: &str = "/api/users/tokens";

    /// Prefix for every auth endpoint
    pub const AUTH_PREFIX: &str = "/api/auth";
}

/// HTTP/Network constants
pub mod network {
    /// Suggestion request timeout (seconds)
    pub const SUGGESTION_TIMEOUT_SECS: u64 = 30;

    /// Generation request timeout (seconds)
    pub const GENERATION_TIMEOUT_SECS: u64 = 60;

    /// Health check timeout (seconds)
    pub const HEALTH_TIMEOUT_SECS: u64 = 5;

    /// Auth request timeout (seconds)
    pub const AUTH_TIMEOUT_SECS: u64 = 15;
}

/// Retry wrapper constants
pub mod retry {
    /// Retries after the first attempt
    pub const DEFAULT_MAX_RETRIES: usize = 2;

    /// Delay before the first retry (milliseconds)
    pub const INITIAL_DELAY_MS: u64 = 1000;

    /// Backoff multiplier
    pub const BACKOFF_FACTOR: f32 = 2.0;

    /// Upper bound for a single backoff delay (seconds)
    pub const MAX_DELAY_SECS: u64 = 30;
}

/// Cache constants
pub mod cache {
    /// Suggestion cache time-to-live (1 hour)
    pub const SUGGESTION_TTL_SECS: u64 = 3600;
}

/// Upload constraints
pub mod upload {
    /// Maximum accepted image size (10MB)
    pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

    /// MIME types the services accept
    pub const SUPPORTED_FORMATS: &[&str] = &["image/jpeg", "image/png", "image/webp"];

    /// Images wider than this are downscaled before upload
    pub const MAX_WIDTH: u32 = 1920;

    /// JPEG quality used when re-encoding uploads (0-100)
    pub const JPEG_QUALITY: u8 = 90;

    /// Maximum length of free-text reference notes (characters)
    pub const MAX_REFERENCE_NOTES: usize = 1000;
}

/// Simulated generation progress
pub mod progress {
    /// Average generation time the estimate is based on (seconds)
    pub const ESTIMATED_TOTAL_SECS: u64 = 45;

    /// Interval between progress updates (seconds)
    pub const TICK_SECS: u64 = 2;

    /// Estimates never pass this value until the response arrives
    pub const CEILING: f32 = 95.0;
}
