//! In-memory surface for headless hosts and tests

use crate::surface::{ElementId, PixelStyle, RenderSurface, SurfaceError, SurfaceResult};
use std::collections::BTreeMap;

/// Element table kept in memory
///
/// Detached elements are dropped from the table; the creation and removal
/// counters survive so callers can check that no handle leaked.
#[derive(Debug, Default)]
pub struct MemorySurface {
    mount: Option<String>,
    elements: BTreeMap<ElementId, PixelStyle>,
    next_element: u64,
    created: usize,
    detached: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface whose document already contains a mount point with this id
    pub fn with_mount(id: impl Into<String>) -> Self {
        Self {
            mount: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn mount(&self) -> Option<&str> {
        self.mount.as_deref()
    }

    pub fn style(&self, element: ElementId) -> Option<&PixelStyle> {
        self.elements.get(&element)
    }

    pub fn is_attached(&self, element: ElementId) -> bool {
        self.elements.contains_key(&element)
    }

    /// Number of currently attached elements
    pub fn attached(&self) -> usize {
        self.elements.len()
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn detached(&self) -> usize {
        self.detached
    }
}

impl RenderSurface for MemorySurface {
    fn has_mount(&self, id: &str) -> bool {
        self.mount.as_deref() == Some(id)
    }

    fn create_mount(&mut self, id: &str) -> SurfaceResult<()> {
        self.mount = Some(id.to_string());
        Ok(())
    }

    fn attach(&mut self, style: &PixelStyle) -> SurfaceResult<ElementId> {
        if self.mount.is_none() {
            return Err(SurfaceError::MountNotFound("<none>".to_string()));
        }
        let element = ElementId(self.next_element);
        self.next_element += 1;
        self.elements.insert(element, *style);
        self.created += 1;
        Ok(element)
    }

    fn update(&mut self, element: ElementId, style: &PixelStyle) -> SurfaceResult<()> {
        let slot = self
            .elements
            .get_mut(&element)
            .ok_or(SurfaceError::UnknownElement(element))?;
        *slot = *style;
        Ok(())
    }

    fn detach(&mut self, element: ElementId) -> SurfaceResult<bool> {
        if self.elements.remove(&element).is_some() {
            self.detached += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
