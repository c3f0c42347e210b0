//! Photomonix - Client for the Photomonix AI Image-Enhancement Services
//!
//! Talks to two AI services (image analysis and image-to-image generation)
//! plus an auth/user service, and coordinates the outbound calls so they stay
//! well-behaved under load.
//!
//! ## Core Features
//!
//! - **Single-flight queue**: at most one AI call in flight, FIFO order
//! - **Retry with backoff**: server and network failures retried, client
//!   errors and timeouts surfaced immediately
//! - **Suggestion cache**: content-addressed by SHA-256, one hour TTL
//! - **Progress estimates**: time-based progress while generation runs
//!
//! ## Quick Start
//!
//! ```ignore
//! use photomonix::{ConfigLoader, Enhancer, ImageFile};
//!
//! let config = ConfigLoader::load()?;
//! let enhancer = Enhancer::from_config(&config)?;
//! let image = ImageFile::from_path(Path::new("product.jpg")).await?;
//! let suggestions = enhancer.suggestions(&image).await?;
//! ```
//!
//! ## Modules
//!
//! - [`orchestration`]: queue, retry, timeouts, cache, progress
//! - [`api`]: HTTP clients for every service
//! - [`enhancer`]: the workflow facade over both AI services
//! - [`validation`] / [`upload`]: input checks and upload compression
//! - [`config`]: layered configuration

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod enhancer;
pub mod orchestration;
pub mod types;
pub mod upload;
pub mod validation;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{ErrorCategory, ErrorClassifier, PhotomonixError, Result};

// Domain Types
pub use types::{
    GeneratedImage, GenerationRequest, GenerationResult, ImageFile, SelectedOptions,
    SuggestionSet,
};

// Workflow
pub use enhancer::Enhancer;

// =============================================================================
// Orchestration Re-exports
// =============================================================================

pub use orchestration::{
    ProgressCallback, ProgressEstimator, RequestQueue, RetryPolicy, SuggestionCache,
    TimeoutConfig, call_with_retry, content_hash, with_timeout,
};

// =============================================================================
// API Re-exports
// =============================================================================

pub use api::{
    AuthClient, GenerationClient, GenerationService, HealthChecker, SuggestionClient,
    SuggestionService, TokenTracker,
};
