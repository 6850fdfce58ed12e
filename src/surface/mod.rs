//! Rendering surface contract
//!
//! The trail core never draws. It creates, restyles and detaches square
//! elements inside a single mount point through [`RenderSurface`], and the
//! host decides what an element actually is (a DOM node, a webview message,
//! an in-memory record).

pub mod json_lines;
pub mod memory;

pub use json_lines::JsonLinesSurface;
pub use memory::MemorySurface;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors reported by surface backends
///
/// The trail session treats all of these as non-fatal.
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Mount point not found: {0}")]
    MountNotFound(String),

    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),
}

/// Result type for surface operations
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Handle to an element attached to the mount point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Visual properties of one trail pixel, in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelStyle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub border_radius: f64,
}

impl PixelStyle {
    /// Square of edge `size` whose center sits at `(x, y)`
    pub fn centered(x: f64, y: f64, size: f64, opacity: f64) -> Self {
        Self {
            left: x - size / 2.0,
            top: y - size / 2.0,
            width: size,
            height: size,
            opacity,
            border_radius: 0.0,
        }
    }
}

/// Outcome of preparing the mount point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountStatus {
    /// A container with the requested id already existed
    Reused,
    /// The container was created on the document root
    Created,
}

/// One operation against the surface, as sent to out-of-process renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum RenderOp {
    CreateMount { id: String },
    Attach { element: ElementId, style: PixelStyle },
    Update { element: ElementId, style: PixelStyle },
    Detach { element: ElementId },
}

/// A place trail pixels can be drawn into
pub trait RenderSurface {
    /// Check whether a container with this id is already attached
    fn has_mount(&self, id: &str) -> bool;

    /// Create the container and attach it to the document root
    fn create_mount(&mut self, id: &str) -> SurfaceResult<()>;

    /// Create a new element inside the mount point
    fn attach(&mut self, style: &PixelStyle) -> SurfaceResult<ElementId>;

    /// Restyle a previously attached element
    fn update(&mut self, element: ElementId, style: &PixelStyle) -> SurfaceResult<()>;

    /// Remove an element from the mount point
    ///
    /// Returns `false` when the element was already detached. That case is not an error.
    fn detach(&mut self, element: ElementId) -> SurfaceResult<bool>;

    /// Reuse the container `id` if present, otherwise create it
    fn ensure_mount(&mut self, id: &str) -> SurfaceResult<MountStatus> {
        if self.has_mount(id) {
            return Ok(MountStatus::Reused);
        }
        self.create_mount(id)?;
        Ok(MountStatus::Created)
    }
}
