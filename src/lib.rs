//! icns-stamp: recolor and watermark every rendition of a macOS icon
//!
//! This crate unpacks an Apple Icon Image (`.icns`) container, runs each
//! rendition through a small layer pipeline (color remapping, then a text
//! watermark), and packs the result back into a container of the same shape.
//! Reading and writing files is left to the caller.
//!
//! # Example
//!
//! ```
//! use icns_stamp::{ColorSpec, IconStamper, RemapConfig, WatermarkConfig};
//!
//! let mut stamper = IconStamper::new();
//!
//! // Configure layers directly through the pipeline
//! stamper.pipeline.remap.set_config(Some(
//!     RemapConfig::new()
//!         .with_foreground(ColorSpec::parse("#FF8A00").unwrap())
//!         .with_background(ColorSpec::parse("#F0F0F0").unwrap()),
//! ));
//! stamper.pipeline.watermark.set_config(Some(WatermarkConfig::new("22").unwrap()));
//!
//! // let stamped = stamper.process(&std::fs::read("AppIcon.icns")?)?;
//! ```
//!
//! # Serializable Profiles
//!
//! Settings can also be loaded from JSON with [`StampProfile`] and the
//! [`Configurable`] trait:
//!
//! ```
//! use icns_stamp::{Configurable, IconStamper, StampProfile};
//!
//! let profile = StampProfile::from_json(
//!     r##"{ "recolor": { "background": "#F0F0F0" }, "watermark": { "text": "22" } }"##,
//! )
//! .unwrap();
//!
//! let mut stamper = IconStamper::new();
//! stamper.apply_profile(&profile).unwrap();
//!
//! // Export current settings
//! let json = stamper.export_profile().to_json().unwrap();
//! ```
//!
//! # Containers
//!
//! [`extract`] and [`repack`] convert between container bytes and
//! [`Rendition`]s. [`IconContainer`] additionally remembers elements it does
//! not decode and the original payload of each rendition, so unmodified
//! renditions are written back byte for byte.

mod color;
mod container;
mod customizer;
mod error;
mod icon;
mod layer;
mod profile;

pub use color::ColorSpec;
pub use container::{Encoding, IconContainer, IconElement, IconType, OSType, extract, repack};
pub use customizer::{Configurable, IconStamper, RenditionReport, Stage};
pub use error::{ConfigError, Error, FormatError, RenderError};
pub use icon::{Density, RectPx, Rendition, SizePx, SizeTag};
pub use layer::{
    Anchor, ClassCensus, ClassifierThresholds, GlyphBounds, Layer, LayerConfig, LayerEffect,
    LayerPipeline, PixelClass, RemapConfig, RenderContext, WatermarkConfig,
};
pub use profile::{RecolorSettings, SerializableAnchor, StampProfile, WatermarkSettings};
