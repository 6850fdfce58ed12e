//! Surface that streams render operations as JSON lines
//!
//! Used when the pixels are drawn by another process, e.g. a webview that
//! applies each [`RenderOp`] to its DOM.

use crate::surface::{ElementId, PixelStyle, RenderOp, RenderSurface, SurfaceError, SurfaceResult};
use std::collections::HashSet;
use std::io::Write;

pub struct JsonLinesSurface<W: Write> {
    writer: W,
    mount: Option<String>,
    live: HashSet<ElementId>,
    next_element: u64,
}

impl<W: Write> JsonLinesSurface<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            mount: None,
            live: HashSet::new(),
            next_element: 0,
        }
    }

    /// Surface whose renderer already has a mount point with this id
    pub fn with_mount(writer: W, id: impl Into<String>) -> Self {
        Self {
            mount: Some(id.into()),
            ..Self::new(writer)
        }
    }

    pub fn live_elements(&self) -> usize {
        self.live.len()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, op: &RenderOp) -> SurfaceResult<()> {
        serde_json::to_writer(&mut self.writer, op)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> RenderSurface for JsonLinesSurface<W> {
    fn has_mount(&self, id: &str) -> bool {
        self.mount.as_deref() == Some(id)
    }

    fn create_mount(&mut self, id: &str) -> SurfaceResult<()> {
        self.emit(&RenderOp::CreateMount { id: id.to_string() })?;
        self.mount = Some(id.to_string());
        Ok(())
    }

    fn attach(&mut self, style: &PixelStyle) -> SurfaceResult<ElementId> {
        if self.mount.is_none() {
            return Err(SurfaceError::MountNotFound("<none>".to_string()));
        }
        let element = ElementId(self.next_element);
        self.next_element += 1;
        self.emit(&RenderOp::Attach {
            element,
            style: *style,
        })?;
        self.live.insert(element);
        Ok(element)
    }

    fn update(&mut self, element: ElementId, style: &PixelStyle) -> SurfaceResult<()> {
        if !self.live.contains(&element) {
            return Err(SurfaceError::UnknownElement(element));
        }
        self.emit(&RenderOp::Update {
            element,
            style: *style,
        })
    }

    fn detach(&mut self, element: ElementId) -> SurfaceResult<bool> {
        if !self.live.remove(&element) {
            return Ok(false);
        }
        self.emit(&RenderOp::Detach { element })?;
        Ok(true)
    }
}
