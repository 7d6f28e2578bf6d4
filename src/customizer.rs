//! Icon stamping engine: extract, transform every rendition, repack.

use tracing::{debug, info};

use crate::container::IconContainer;
use crate::error::{ConfigError, Error};
use crate::icon::{RectPx, Rendition, SizeTag};
use crate::layer::watermark::DEFAULT_TEXT_COLOR;
use crate::layer::{
    ClassCensus, GlyphBounds, LayerPipeline, RemapConfig, RenderContext, WatermarkConfig,
};
use crate::profile::{RecolorSettings, StampProfile, WatermarkSettings};

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`StampProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    ///
    /// On error nothing is changed.
    fn apply_profile(&mut self, profile: &StampProfile) -> Result<(), ConfigError>;

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> StampProfile;
}

// ============================================================================
// Stage
// ============================================================================

/// Progress of a stamping run.
///
/// `Idle -> Extracting -> Transforming -> Repacking -> Done`; any step can
/// end in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Extracting,
    Transforming,
    Repacking,
    Done,
    Failed,
}

/// What the layers reported for one rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenditionReport {
    pub tag: SizeTag,
    /// Pixel classes before recoloring, if the remap layer ran.
    pub census: Option<ClassCensus>,
    /// Area covered by the watermark, if text was drawn.
    pub glyph_bounds: Option<RectPx>,
}

impl RenditionReport {
    fn from_context(ctx: &RenderContext) -> Self {
        Self {
            tag: ctx.rendition.tag(),
            census: ctx.get::<ClassCensus>().copied(),
            glyph_bounds: ctx.get::<GlyphBounds>().map(|bounds| bounds.0),
        }
    }
}

// ============================================================================
// IconStamper
// ============================================================================

/// Main icon stamping engine.
///
/// `IconStamper` applies a pipeline of layers to every rendition of an icns
/// container. Access layers directly through the [`pipeline`](Self::pipeline)
/// field to configure them.
///
/// # Layer Pipeline
///
/// 1. **Remap** (`pipeline.remap`) - Recolors background and foreground pixels
/// 2. **Watermark** (`pipeline.watermark`) - Draws short text in a corner
///
/// The same settings are applied to every rendition; only the watermark
/// geometry scales with the rendition dimension. The first failing rendition
/// aborts the run and no container is produced.
///
/// # Example
///
/// ```
/// use icns_stamp::{ColorSpec, IconStamper, RemapConfig, WatermarkConfig};
///
/// let mut stamper = IconStamper::new();
///
/// // Configure layers directly
/// stamper.pipeline.remap.set_config(Some(
///     RemapConfig::new().with_background(ColorSpec::rgb(0xF0, 0xF0, 0xF0)),
/// ));
/// stamper.pipeline.watermark.set_config(Some(WatermarkConfig::new("22").unwrap()));
///
/// // Toggle layers without losing config
/// stamper.pipeline.watermark.set_enabled(false);
///
/// // Process a container
/// // let output = stamper.process(&icns_bytes)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct IconStamper {
    /// The layer pipeline. Access layers directly to configure them.
    ///
    /// See [`LayerPipeline`] for the order layers run in.
    pub pipeline: LayerPipeline,

    stage: Stage,
}

impl IconStamper {
    /// Creates a stamper with no layers configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stamper configured from a profile.
    pub fn from_profile(profile: &StampProfile) -> Result<Self, ConfigError> {
        let mut stamper = Self::new();
        stamper.apply_profile(profile)?;
        Ok(stamper)
    }

    /// Returns the stage the last run reached.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        info!(from = ?self.stage, to = ?stage, "stage transition");
        self.stage = stage;
    }

    /// Stamps an icns container and returns the repacked bytes.
    ///
    /// With no active layers the output is identical to the input.
    pub fn process(&mut self, bytes: &[u8]) -> Result<Vec<u8>, Error> {
        let result = self.run(bytes);
        if result.is_err() {
            self.enter(Stage::Failed);
        }
        result
    }

    fn run(&mut self, bytes: &[u8]) -> Result<Vec<u8>, Error> {
        self.enter(Stage::Extracting);
        let mut container = IconContainer::extract(bytes)?;
        info!(renditions = container.len(), "extracted container");

        self.enter(Stage::Transforming);
        if self.pipeline.is_noop() {
            info!("no active layers, renditions pass through");
        } else {
            let reports = self.render_all(&mut container)?;
            debug!(?reports, "transformed renditions");
        }

        self.enter(Stage::Repacking);
        let output = container.repack()?;

        self.enter(Stage::Done);
        Ok(output)
    }

    /// Runs every rendition of a container through the pipeline and stores
    /// the results back in the container.
    ///
    /// The container is left untouched if any rendition fails; the error
    /// carries the size tag of the first failing rendition in container order.
    pub fn render_all(&self, container: &mut IconContainer) -> Result<Vec<RenditionReport>, Error> {
        let contexts = self.render_each(container.renditions().to_vec())?;

        let mut reports = Vec::with_capacity(contexts.len());
        let mut renditions = Vec::with_capacity(contexts.len());
        for ctx in contexts {
            reports.push(RenditionReport::from_context(&ctx));
            renditions.push(ctx.into_rendition());
        }

        container.replace_renditions(renditions)?;
        Ok(reports)
    }

    /// Runs a single rendition through the pipeline.
    pub fn render(&self, rendition: Rendition) -> Result<Rendition, Error> {
        self.render_one(rendition).map(RenderContext::into_rendition)
    }

    fn render_one(&self, rendition: Rendition) -> Result<RenderContext, Error> {
        let tag = rendition.tag();
        debug!(%tag, "transforming rendition");
        self.pipeline
            .render(rendition)
            .map_err(|e| e.in_rendition(tag))
    }

    #[cfg(not(feature = "parallel"))]
    fn render_each(&self, renditions: Vec<Rendition>) -> Result<Vec<RenderContext>, Error> {
        renditions
            .into_iter()
            .map(|rendition| self.render_one(rendition))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn render_each(&self, renditions: Vec<Rendition>) -> Result<Vec<RenderContext>, Error> {
        use rayon::prelude::*;

        // Collected in order first so the reported error does not depend on
        // thread scheduling.
        let results: Vec<Result<RenderContext, Error>> = renditions
            .into_par_iter()
            .map(|rendition| self.render_one(rendition))
            .collect();
        results.into_iter().collect()
    }
}

impl Configurable for IconStamper {
    /// Applies a profile's settings to this stamper.
    ///
    /// This sets the configuration and enabled state for each layer.
    ///
    /// # Example
    ///
    /// ```
    /// use icns_stamp::{Configurable, IconStamper, StampProfile, WatermarkSettings};
    ///
    /// let mut stamper = IconStamper::new();
    /// let profile = StampProfile::new().with_watermark(WatermarkSettings::new("22"));
    ///
    /// stamper.apply_profile(&profile).unwrap();
    /// assert!(stamper.pipeline.watermark.is_active());
    /// ```
    fn apply_profile(&mut self, profile: &StampProfile) -> Result<(), ConfigError> {
        // Build everything first so a bad section leaves the stamper as it was.
        let remap = profile.recolor.as_ref().map(|settings| {
            let config = RemapConfig {
                foreground: settings.foreground,
                background: settings.background,
                thresholds: settings.thresholds,
            };
            (config, settings.enabled)
        });

        let watermark = match &profile.watermark {
            Some(settings) => {
                let config = WatermarkConfig::new(settings.text.clone())?
                    .with_color(settings.color.unwrap_or(DEFAULT_TEXT_COLOR))
                    .with_anchor(settings.anchor.into())
                    .with_scale(settings.scale)?
                    .with_inset(settings.inset)?
                    .with_min_dimension(settings.min_dimension);
                Some((config, settings.enabled))
            }
            None => None,
        };

        match remap {
            Some((config, enabled)) => {
                self.pipeline.remap.set_config(Some(config));
                self.pipeline.remap.set_enabled(enabled);
            }
            None => {
                self.pipeline.remap.set_config(None);
            }
        }

        match watermark {
            Some((config, enabled)) => {
                self.pipeline.watermark.set_config(Some(config));
                self.pipeline.watermark.set_enabled(enabled);
            }
            None => {
                self.pipeline.watermark.set_config(None);
            }
        }

        Ok(())
    }

    /// Exports the current stamping settings as a profile.
    fn export_profile(&self) -> StampProfile {
        let recolor = self.pipeline.remap.config().map(|c| RecolorSettings {
            foreground: c.foreground,
            background: c.background,
            thresholds: c.thresholds,
            enabled: self.pipeline.remap.is_enabled(),
        });

        let watermark = self.pipeline.watermark.config().map(|c| WatermarkSettings {
            text: c.text().to_string(),
            color: Some(c.color),
            anchor: c.anchor.into(),
            scale: c.scale(),
            inset: c.inset(),
            min_dimension: c.min_dimension,
            enabled: self.pipeline.watermark.is_enabled(),
        });

        StampProfile { recolor, watermark }
    }
}

// ============================================================================
// Tests
// ============================================================================
