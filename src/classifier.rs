//! # Classifier Module
//!
//! The object classifier is an external black box that turns an image into
//! labeled predictions. This module defines the narrow [`Classifier`] interface,
//! a memoizing loader for expensive classifier initialization, and the batch
//! helper that maps detections to ingredient names.

use async_trait::async_trait;
use futures::future::BoxFuture;
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::label_mapper::map_predictions;
use crate::recipe_config::MatchingConfig;
use crate::recipe_model::PredictionLabel;

/// Minimum bytes needed to sniff an image format
const MIN_FORMAT_BYTES: usize = 8;

/// Errors from loading or running a classifier
#[derive(Debug, Clone, Error)]
pub enum ClassifierError {
    /// The classifier could not be initialized
    #[error("Classifier load failed: {0}")]
    Load(String),

    /// Detection on a single image failed
    #[error("Detection failed: {0}")]
    Detection(String),
}

/// Image -> predictions
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Detect objects in an encoded image, returning at most `max_detections`
    async fn detect(
        &self,
        image: &[u8],
        max_detections: usize,
    ) -> Result<Vec<PredictionLabel>, ClassifierError>;
}

type ClassifierFactory =
    Box<dyn Fn() -> BoxFuture<'static, Result<Arc<dyn Classifier>, ClassifierError>> + Send + Sync>;

/// A classifier loaded on first use
///
/// Loading happens at most once even under concurrent first calls; every caller
/// then shares the same instance. A failed load is not cached, so the next call
/// tries again.
pub struct LazyClassifier {
    instance: OnceCell<Arc<dyn Classifier>>,
    factory: ClassifierFactory,
}

impl LazyClassifier {
    /// Create a loader from an async factory
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fridge_recipes::classifier::{Classifier, ClassifierError, LazyClassifier};
    /// use fridge_recipes::recipe_model::PredictionLabel;
    /// use std::sync::Arc;
    ///
    /// struct Nothing;
    ///
    /// #[async_trait::async_trait]
    /// impl Classifier for Nothing {
    ///     async fn detect(&self, _: &[u8], _: usize) -> Result<Vec<PredictionLabel>, ClassifierError> {
    ///         Ok(Vec::new())
    ///     }
    /// }
    ///
    /// let lazy = LazyClassifier::new(|| async { Ok(Arc::new(Nothing) as Arc<dyn Classifier>) });
    /// assert!(!lazy.is_loaded());
    /// ```
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Arc<dyn Classifier>, ClassifierError>>
            + Send
            + 'static,
    {
        Self {
            instance: OnceCell::new(),
            factory: Box::new(move || Box::pin(factory())),
        }
    }

    /// The loaded classifier, loading it if needed
    pub async fn get(&self) -> Result<Arc<dyn Classifier>, ClassifierError> {
        let instance = self
            .instance
            .get_or_try_init(|| async {
                info!("Loading classifier");
                let loaded = (self.factory)().await;
                if let Err(e) = &loaded {
                    warn!("Classifier load failed: {e}");
                }
                loaded
            })
            .await?;
        Ok(Arc::clone(instance))
    }

    pub fn is_loaded(&self) -> bool {
        self.instance.initialized()
    }
}

impl fmt::Debug for LazyClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyClassifier")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[async_trait]
impl Classifier for LazyClassifier {
    async fn detect(
        &self,
        image: &[u8],
        max_detections: usize,
    ) -> Result<Vec<PredictionLabel>, ClassifierError> {
        self.get().await?.detect(image, max_detections).await
    }
}

/// Whether the bytes look like an image format the classifier accepts
pub fn is_supported_image(bytes: &[u8]) -> bool {
    if bytes.len() < MIN_FORMAT_BYTES {
        debug!(
            "Not enough bytes to determine image format (read {} bytes, need at least {})",
            bytes.len(),
            MIN_FORMAT_BYTES
        );
        return false;
    }

    match image::guess_format(bytes) {
        Ok(format) => {
            let supported = matches!(
                format,
                image::ImageFormat::Png
                    | image::ImageFormat::Jpeg
                    | image::ImageFormat::WebP
                    | image::ImageFormat::Bmp
            );
            debug!("Detected image format {format:?}, supported: {supported}");
            supported
        }
        Err(e) => {
            debug!("Could not determine image format: {e}");
            false
        }
    }
}

/// Run the classifier over a batch of images, one at a time
///
/// Unsupported images and failed detections are logged and skipped. Returns the
/// mapped ingredient names of all images in order, not deduplicated.
pub async fn detect_ingredients<C>(
    classifier: &C,
    images: &[Vec<u8>],
    config: &MatchingConfig,
) -> Vec<String>
where
    C: Classifier + ?Sized,
{
    let mut ingredients = Vec::new();

    for (index, image) in images.iter().enumerate() {
        if !is_supported_image(image) {
            warn!("Skipping image {index}: unsupported format");
            continue;
        }

        match classifier.detect(image, config.max_detections).await {
            Ok(predictions) => {
                let mapped = map_predictions(&predictions, config.confidence_threshold);
                debug!(
                    "Image {index}: {} predictions -> {} ingredients",
                    predictions.len(),
                    mapped.len()
                );
                ingredients.extend(mapped);
            }
            Err(e) => warn!("Skipping image {index}: {e}"),
        }
    }

    info!(
        "Detected {} ingredient names in {} images",
        ingredients.len(),
        images.len()
    );
    ingredients
}
