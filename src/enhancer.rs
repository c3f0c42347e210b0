//! Enhancement Workflow
//!
//! [`Enhancer`] ties the pieces together for both AI calls:
//!
//! ```text
//! suggestions: validate → cache lookup → compress → queue(retry(call)) → cache insert
//! generate:    sanitize notes → validate → compress → queue(retry(call))
//! ```
//!
//! Compression happens once per call, outside the retry loop. Cache keys are
//! computed from the original upload so repeated uploads of the same file hit
//! regardless of compression output.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::api::{
    GenerationClient, SharedGenerationService, SharedSuggestionService, SuggestionClient,
};
use crate::config::{Config, UploadConfig};
use crate::orchestration::{
    ProgressCallback, RequestQueue, RetryPolicy, SuggestionCache, call_with_retry, content_hash,
};
use crate::types::{GenerationRequest, GenerationResult, ImageFile, Result, SuggestionSet};
use crate::upload::compress_image_blocking;
use crate::validation::{sanitize_reference_notes, validate_generation_request, validate_image_file};

/// Facade over the suggestion and generation services
pub struct Enhancer {
    suggestion: SharedSuggestionService,
    generation: SharedGenerationService,
    queue: RequestQueue,
    cache: Arc<SuggestionCache>,
    retry: RetryPolicy,
    upload: UploadConfig,
}

impl std::fmt::Debug for Enhancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enhancer")
            .field("suggestion", &self.suggestion.name())
            .field("generation", &self.generation.name())
            .field("queue", &self.queue)
            .field("cached", &self.cache.len())
            .field("retry", &self.retry)
            .finish()
    }
}

impl Enhancer {
    /// Enhancer with default retry, cache and upload settings
    pub fn new(suggestion: SharedSuggestionService, generation: SharedGenerationService) -> Self {
        Self {
            suggestion,
            generation,
            queue: RequestQueue::new(),
            cache: Arc::new(SuggestionCache::default()),
            retry: RetryPolicy::default(),
            upload: UploadConfig::default(),
        }
    }

    /// Enhancer talking to the HTTP services named in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let suggestion = Arc::new(SuggestionClient::from_config(config)?);
        let generation = Arc::new(GenerationClient::from_config(config)?);

        Ok(Self::new(suggestion, generation)
            .with_retry(RetryPolicy::from(&config.retry))
            .with_cache_ttl(config.cache.ttl())
            .with_upload(config.upload.clone()))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = Arc::new(SuggestionCache::new(ttl));
        self
    }

    pub fn with_upload(mut self, upload: UploadConfig) -> Self {
        self.upload = upload;
        self
    }

    /// Share a queue with other enhancers
    pub fn with_queue(mut self, queue: RequestQueue) -> Self {
        self.queue = queue;
        self
    }

    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }

    /// Categorized enhancement ideas for `image`, served from cache when the
    /// same bytes were analyzed within the TTL.
    pub async fn suggestions(&self, image: &ImageFile) -> Result<SuggestionSet> {
        validate_image_file(image, &self.upload)?;

        let key = content_hash(&image.bytes);
        if let Some(cached) = self.cache.get_by_key(&key) {
            info!(name = %image.name, "Suggestions served from cache");
            return Ok(cached);
        }

        let compressed = compress_image_blocking(image, &self.upload).await?;
        let service = Arc::clone(&self.suggestion);
        let policy = self.retry.clone();

        debug!(name = %image.name, pending = self.queue.len(), "Queueing suggestion request");
        let suggestions = self
            .queue
            .enqueue(move || async move {
                call_with_retry(&policy, || service.suggest(&compressed)).await
            })
            .await?;

        self.cache.insert_by_key(key, suggestions.clone());
        Ok(suggestions)
    }

    /// Generate enhanced variants. `progress` receives estimates while the
    /// service works and 100 once it responds.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        progress: Option<ProgressCallback>,
    ) -> Result<GenerationResult> {
        validate_image_file(&request.image, &self.upload)?;
        let notes = sanitize_reference_notes(&request.reference_notes);
        validate_generation_request(Some(&request.image), &request.options, &notes)?;

        let compressed = compress_image_blocking(&request.image, &self.upload).await?;
        let prepared = GenerationRequest::new(compressed, request.options.clone()).with_notes(notes);
        let service = Arc::clone(&self.generation);
        let policy = self.retry.clone();

        debug!(
            name = %request.image.name,
            categories = prepared.options.0.len(),
            pending = self.queue.len(),
            "Queueing generation request"
        );
        self.queue
            .enqueue(move || async move {
                call_with_retry(&policy, || service.generate(&prepared, progress.as_ref())).await
            })
            .await
    }
}
