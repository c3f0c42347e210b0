pub mod auth;
pub mod enhancement;
pub mod error;
pub mod image;
pub mod service;

pub use auth::{AuthData, AuthResponse, Profile, ProfileUpdate, User};
pub use enhancement::{
    GeneratedImage, GenerationRequest, GenerationResult, REQUIRED_CATEGORIES, SelectedOptions,
    SuggestionSet,
};
pub use error::{ErrorCategory, ErrorClassifier, PhotomonixError, Result, ValidationError};
pub use image::ImageFile;
pub use service::{HealthReport, HealthStatus, ServiceHealth, TokenUsage};
