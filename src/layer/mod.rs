//! Layer infrastructure for icon stamping.
//!
//! This module provides the generic layer system used by `IconStamper`.
//! Each layer encapsulates a configuration and an enabled state, and is
//! applied to one rendition at a time.
//!
//! # Architecture
//!
//! Each layer config implements [`LayerEffect`], which defines:
//! - How the layer transforms a rendition
//! - What properties it publishes for downstream layers and the caller
//!
//! Properties flow through the pipeline via [`RenderContext`], enabling
//! layers to communicate without tight coupling.

pub mod glyph;
pub mod remap;
pub mod watermark;

pub use remap::{ClassCensus, ClassifierThresholds, PixelClass, RemapConfig};
pub use watermark::{Anchor, GlyphBounds, WatermarkConfig};

use crate::error::Error;
use crate::icon::Rendition;
use std::any::{Any, TypeId};
use std::collections::HashMap;

// ============================================================================
// Render Context
// ============================================================================

/// Context that flows through the rendering pipeline.
///
/// Layers can read properties set by upstream layers and publish new
/// properties for downstream layers to consume.
///
/// # Example
///
/// ```ignore
/// // Upstream layer publishes a property
/// ctx.set(ClassCensus::default());
///
/// // Downstream layer reads the property
/// if let Some(census) = ctx.get::<ClassCensus>() {
///     // Use the counts...
/// }
/// ```
pub struct RenderContext {
    /// The rendition being processed through the pipeline.
    pub rendition: Rendition,

    /// Typed property bag for inter-layer communication.
    properties: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RenderContext {
    /// Creates a new render context for the given rendition.
    pub fn new(rendition: Rendition) -> Self {
        Self {
            rendition,
            properties: HashMap::new(),
        }
    }

    /// Sets a typed property that downstream layers can read.
    pub fn set<T: Any + Send + Sync>(&mut self, value: T) {
        self.properties.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Gets a typed property set by an upstream layer.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.properties
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref())
    }

    /// Checks if a property has been set.
    pub fn has<T: Any + Send + Sync>(&self) -> bool {
        self.properties.contains_key(&TypeId::of::<T>())
    }

    /// Consumes the context, returning the transformed rendition.
    pub fn into_rendition(self) -> Rendition {
        self.rendition
    }
}

// ============================================================================
// Layer Traits
// ============================================================================

/// Trait for layer configuration types.
pub trait LayerConfig: Clone {
    /// Returns true if this config differs from another in a way that
    /// would produce different rendering output.
    fn differs_from(&self, other: &Self) -> bool;

    /// Returns true if applying this config cannot change any pixel.
    fn is_noop(&self) -> bool {
        false
    }
}

/// Trait for layer configurations that know how to apply themselves.
///
/// Each layer reads any properties it needs from the context, modifies
/// `ctx.rendition` in place and publishes what it learned with `ctx.set()`.
/// A layer must not change the rendition's element type or dimensions.
pub trait LayerEffect: LayerConfig {
    /// Transform the rendition in the render context.
    fn transform(&self, ctx: &mut RenderContext) -> Result<(), Error>;
}

// ============================================================================
// Generic Layer
// ============================================================================

/// A generic layer with an optional configuration and an enabled flag.
///
/// A disabled layer keeps its configuration, so it can be toggled back on.
#[derive(Debug, Clone)]
pub struct Layer<C: LayerConfig> {
    config: Option<C>,
    enabled: bool,
}

impl<C: LayerConfig> Default for Layer<C> {
    fn default() -> Self {
        Self {
            config: None,
            enabled: true,
        }
    }
}

impl<C: LayerConfig> Layer<C> {
    /// Returns the current configuration, if any.
    pub fn config(&self) -> Option<&C> {
        self.config.as_ref()
    }

    /// Returns true if this layer would touch pixels: it is enabled and has
    /// a configuration that is not a no-op.
    pub fn is_active(&self) -> bool {
        self.enabled && self.config.as_ref().is_some_and(|c| !c.is_noop())
    }

    /// Returns true if the layer has a configuration set.
    pub fn has_config(&self) -> bool {
        self.config.is_some()
    }

    /// Returns whether the layer is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets whether the layer is enabled.
    ///
    /// Returns true if the enabled state changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled != enabled {
            self.enabled = enabled;
            true
        } else {
            false
        }
    }

    /// Sets the configuration. Returns true if it changed.
    pub fn set_config(&mut self, config: Option<C>) -> bool {
        let differs = match (&self.config, &config) {
            (None, None) => false,
            (Some(_), None) | (None, Some(_)) => true,
            (Some(old), Some(new)) => old.differs_from(new),
        };

        if differs {
            self.config = config;
        }
        differs
    }
}

impl<C: LayerEffect> Layer<C> {
    /// Apply this layer to the render context.
    ///
    /// If the layer is not active, the context passes through unchanged.
    pub fn apply(&self, ctx: &mut RenderContext) -> Result<(), Error> {
        match &self.config {
            Some(config) if self.is_active() => config.transform(ctx),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Layer Pipeline
// ============================================================================

/// Defines the layer pipeline and its fixed order.
///
/// ```text
/// Rendition
///     │
///     ▼
/// ┌───────────┐
/// │   Remap   │ ◄── Recolors background and foreground pixels
/// └─────┬─────┘
///       │
///       ▼
/// ┌───────────┐
/// │ Watermark │ ◄── Applied last so the text color is never remapped
/// └─────┬─────┘
///       │
///       ▼
///   Rendition'
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayerPipeline {
    /// Color remapping layer.
    pub remap: Layer<RemapConfig>,

    /// Text watermark layer.
    pub watermark: Layer<WatermarkConfig>,
}

impl LayerPipeline {
    /// Returns true if no layer would change any pixel.
    pub fn is_noop(&self) -> bool {
        !self.remap.is_active() && !self.watermark.is_active()
    }

    /// Renders one rendition through the full layer pipeline.
    ///
    /// The returned context holds the transformed rendition and every
    /// property the layers published.
    pub fn render(&self, rendition: Rendition) -> Result<RenderContext, Error> {
        let mut ctx = RenderContext::new(rendition);
        self.remap.apply(&mut ctx)?;
        self.watermark.apply(&mut ctx)?;
        Ok(ctx)
    }
}

// ============================================================================
// Tests
// ============================================================================
