//! The per-species image pipeline and the batch driver.

use std::sync::Arc;

use species_map_database::SpeciesStore;
use species_map_database_models::{ImageId, ImageMeta};

use crate::progress::ProgressCallback;
use crate::{ImageError, WikimediaConfig, commons, download, taxobox};

/// What happened to one species.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// An image and its attribution were stored.
    Stored {
        /// Id of the stored blob.
        image_id: ImageId,
    },
    /// The article has no taxobox image.
    NoImage,
    /// Commons has no attribution metadata for the image.
    NoMetadata,
    /// The image itself could not be downloaded.
    DownloadFailed,
}

/// Outcome counts for a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageJobSummary {
    /// Species that now have an image.
    pub stored: u64,
    /// Species whose article has no taxobox image.
    pub no_image: u64,
    /// Species whose image has no Commons metadata.
    pub no_metadata: u64,
    /// Species whose image download failed.
    pub download_failed: u64,
    /// Species skipped because of a transport or database error.
    pub errors: u64,
}

impl ImageJobSummary {
    fn record(&mut self, outcome: &ImageOutcome) {
        match outcome {
            ImageOutcome::Stored { .. } => self.stored += 1,
            ImageOutcome::NoImage => self.no_image += 1,
            ImageOutcome::NoMetadata => self.no_metadata += 1,
            ImageOutcome::DownloadFailed => self.download_failed += 1,
        }
    }

    /// Number of species processed, successful or not.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.stored + self.no_image + self.no_metadata + self.download_failed + self.errors
    }
}

/// Clears a species' image fields after a miss.
///
/// # Errors
///
/// Returns [`ImageError::Database`] if either update fails.
pub fn clear_image(store: &SpeciesStore, species: &str) -> Result<(), ImageError> {
    store.update_image_id(species, None)?;
    store.update_image_meta(species, None)?;
    Ok(())
}

/// Stores the image bytes and links them and their attribution to the
/// species.
///
/// # Errors
///
/// Returns [`ImageError::Database`] if any write fails.
pub fn store_image(
    store: &SpeciesStore,
    species: &str,
    meta: &ImageMeta,
    content: &[u8],
) -> Result<ImageId, ImageError> {
    let filename = download::stored_filename(species, &meta.source);
    let image_id = store.insert_image(content, &filename)?;
    store.update_image_meta(species, Some(meta))?;
    store.update_image_id(species, Some(&image_id))?;
    Ok(image_id)
}

/// Runs the full image pipeline for one species.
///
/// # Errors
///
/// Returns [`ImageError`] on transport or database failures. Misses at any
/// step are reported as an [`ImageOutcome`], not an error.
pub async fn process_species(
    client: &reqwest::Client,
    config: &WikimediaConfig,
    store: &SpeciesStore,
    species: &str,
) -> Result<ImageOutcome, ImageError> {
    let Some(image) = taxobox::fetch_taxobox_image(client, config, species).await? else {
        clear_image(store, species)?;
        return Ok(ImageOutcome::NoImage);
    };

    let Some(meta) = commons::fetch_image_meta(client, config, &image).await? else {
        clear_image(store, species)?;
        return Ok(ImageOutcome::NoMetadata);
    };

    let Some(content) = download::download_image(client, config, &image.source).await? else {
        clear_image(store, species)?;
        return Ok(ImageOutcome::DownloadFailed);
    };

    let image_id = store_image(store, species, &meta, &content)?;
    Ok(ImageOutcome::Stored { image_id })
}

/// Runs the image pipeline for each species in turn.
///
/// Failures for one species are logged and counted; the batch carries on.
pub async fn run_image_job(
    client: &reqwest::Client,
    config: &WikimediaConfig,
    store: &SpeciesStore,
    species: &[String],
    progress: &Arc<dyn ProgressCallback>,
) -> ImageJobSummary {
    let mut summary = ImageJobSummary::default();
    progress.set_total(species.len() as u64);

    for name in species {
        progress.set_message(name.clone());

        match process_species(client, config, store, name).await {
            Ok(outcome) => {
                match &outcome {
                    ImageOutcome::Stored { image_id } => {
                        log::info!("IMAGE FOUND: {name} ({image_id})");
                    }
                    ImageOutcome::NoImage => log::info!("NO IMAGE: {name}"),
                    ImageOutcome::NoMetadata => log::info!("NO IMAGE META: {name}"),
                    ImageOutcome::DownloadFailed => log::info!("DOWNLOAD FAILED: {name}"),
                }
                summary.record(&outcome);
            }
            Err(e) => {
                log::warn!("Image job failed for {name}: {e}");
                summary.errors += 1;
            }
        }

        progress.inc(1);
    }

    progress.finish(format!(
        "{} of {} species have images",
        summary.stored,
        summary.total()
    ));
    summary
}
