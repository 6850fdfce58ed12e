//! Trail session: the explicit owner of all trail state
//!
//! A session holds the store, the sampler, the id counter and the render
//! surface. Pointer moves and decay ticks are plain synchronous calls; the
//! host decides when they happen (see [`crate::runtime`]). Several sessions
//! can coexist, each with its own surface.

use crate::surface::{MountStatus, PixelStyle, RenderSurface};
use crate::trail::{
    decay_point, FrameDecision, MotionSampler, PointId, TrailPoint, TrailStore, MOUNT_ID,
    PIXEL_SIZE,
};
use serde::Serialize;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    /// Created but not yet listening
    Idle,
    /// Accepting pointer moves and decaying every frame
    Active,
    /// Torn down; no further mutation
    TornDown,
}

/// Counters describing what a session has done so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailStats {
    /// Pointer moves that became trail points
    pub accepted: u64,
    /// Pointer moves within the distance threshold
    pub rejected: u64,
    /// Points dropped because the store was full
    pub evicted: u64,
    /// Points retired after fading out
    pub expired: u64,
    /// Decay ticks run
    pub ticks: u64,
}

pub struct TrailSession<S: RenderSurface> {
    surface: S,
    store: TrailStore,
    sampler: MotionSampler,
    next_id: u64,
    state: SessionState,
    stats: TrailStats,
}

impl<S: RenderSurface> TrailSession<S> {
    /// Create a session drawing into `surface`
    ///
    /// The trail container is reused if the surface already has one,
    /// otherwise it is created on the document root.
    pub fn new(mut surface: S) -> Self {
        match surface.ensure_mount(MOUNT_ID) {
            Ok(MountStatus::Reused) => tracing::debug!("Reusing mount point {}", MOUNT_ID),
            Ok(MountStatus::Created) => tracing::debug!("Created mount point {}", MOUNT_ID),
            Err(e) => tracing::warn!("Failed to prepare mount point {}: {}", MOUNT_ID, e),
        }

        Self {
            surface,
            store: TrailStore::new(),
            sampler: MotionSampler::new(),
            next_id: 0,
            state: SessionState::Idle,
            stats: TrailStats::default(),
        }
    }

    /// Begin listening to pointer moves and decaying on frames
    ///
    /// Has no effect on a session that is already active or torn down.
    pub fn start(&mut self) {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Active;
                tracing::info!("Pixel trail started");
            }
            SessionState::Active => tracing::debug!("Pixel trail already active"),
            SessionState::TornDown => tracing::debug!("Ignoring start after teardown"),
        }
    }

    /// Tear the session down
    ///
    /// Stops all future mutation. Elements already on the surface are left
    /// where they are.
    pub fn stop(&mut self) {
        if self.state == SessionState::TornDown {
            return;
        }
        self.state = SessionState::TornDown;
        tracing::info!(
            "Pixel trail stopped (points={}, accepted={}, ticks={})",
            self.store.len(),
            self.stats.accepted,
            self.stats.ticks
        );
    }

    /// Handle a pointer move at viewport coordinates `(x, y)`
    ///
    /// Returns `true` when the move produced a new trail point.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        if self.state != SessionState::Active {
            return false;
        }

        if !self.sampler.accepts(x, y) {
            self.stats.rejected += 1;
            return false;
        }

        // Sampler and id counter only move once the element exists
        let style = PixelStyle::centered(x, y, PIXEL_SIZE, 1.0);
        let element = match self.surface.attach(&style) {
            Ok(element) => element,
            Err(e) => {
                tracing::warn!("Failed to attach element at ({}, {}): {}", x, y, e);
                return false;
            }
        };

        self.sampler.accept(x, y);
        let id = PointId(self.next_id);
        self.next_id += 1;

        tracing::debug!("Accepted {} at ({}, {}) as element {}", id, x, y, element);
        self.stats.accepted += 1;

        if let Some(evicted) = self.store.append(TrailPoint::new(id, x, y, element)) {
            tracing::debug!("Evicted {} (store full)", evicted.id());
            self.stats.evicted += 1;
            release(&mut self.surface, evicted);
        }
        true
    }

    /// Run one decay tick
    ///
    /// Fades and shrinks every point oldest first, pushes the new styles to
    /// the surface, then retires every point whose opacity reached zero.
    /// Returns whether the caller should arm the next frame.
    pub fn tick(&mut self) -> FrameDecision {
        match self.state {
            SessionState::TornDown => return FrameDecision::Stop,
            SessionState::Idle => return FrameDecision::Continue,
            SessionState::Active => {}
        }

        for point in self.store.iter_mut() {
            decay_point(point);
            tracing::trace!(
                "{} age={} opacity={:.2} size={:.2}",
                point.id(),
                point.age(),
                point.opacity(),
                point.size()
            );
            if let Err(e) = self.surface.update(point.element(), &point.style()) {
                tracing::warn!("Failed to update element for {}: {}", point.id(), e);
            }
        }

        let surface = &mut self.surface;
        let expired = self.store.retain(
            |point| !point.is_expired(),
            |point| {
                tracing::debug!("Expired {} after {} ticks", point.id(), point.age());
                release(surface, point);
            },
        );

        self.stats.expired += expired as u64;
        self.stats.ticks += 1;
        FrameDecision::Continue
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Live points, oldest first
    pub fn points(&self) -> impl Iterator<Item = &TrailPoint> {
        self.store.iter()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn last_accepted(&self) -> (f64, f64) {
        self.sampler.last_accepted()
    }

    pub fn stats(&self) -> TrailStats {
        self.stats
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Detach a point's element; a point leaving the store is always released here
fn release<S: RenderSurface>(surface: &mut S, point: TrailPoint) {
    match surface.detach(point.element()) {
        Ok(true) => {}
        Ok(false) => tracing::debug!("Element for {} was already detached", point.id()),
        Err(e) => tracing::warn!("Failed to detach element for {}: {}", point.id(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{ElementId, MemorySurface, RenderSurface, SurfaceError, SurfaceResult};
    use crate::trail::{FADE_SPEED, TRAIL_LENGTH};

    fn active_session() -> TrailSession<MemorySurface> {
        let mut session = TrailSession::new(MemorySurface::new());
        session.start();
        session
    }

    /// Feed `count` moves spaced far enough apart to all be accepted
    fn feed_spaced(session: &mut TrailSession<MemorySurface>, count: usize) {
        for i in 0..count {
            assert!(session.pointer_move(20.0 * (i + 1) as f64, 0.0));
        }
    }

    #[test]
    fn test_new_session_creates_mount() {
        let session = TrailSession::new(MemorySurface::new());
        assert_eq!(session.surface().mount(), Some(MOUNT_ID));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_idle_session_ignores_input() {
        let mut session = TrailSession::new(MemorySurface::new());
        assert!(!session.pointer_move(100.0, 100.0));
        assert_eq!(session.tick(), FrameDecision::Continue);
        assert!(session.is_empty());
        assert_eq!(session.last_accepted(), (0.0, 0.0));
        assert_eq!(session.stats(), TrailStats::default());
    }

    #[test]
    fn test_threshold_law() {
        let mut session = active_session();
        assert!(session.pointer_move(100.0, 100.0));

        assert!(!session.pointer_move(110.0, 105.0));
        assert_eq!(session.len(), 1);
        assert_eq!(session.last_accepted(), (100.0, 100.0));

        assert!(session.pointer_move(110.0, 110.0));
        assert_eq!(session.len(), 2);
        assert_eq!(session.last_accepted(), (110.0, 110.0));
    }

    #[test]
    fn test_accepted_point_is_rendered_fresh() {
        let mut session = active_session();
        session.pointer_move(40.0, 30.0);

        let point = session.points().next().unwrap();
        let style = session.surface().style(point.element()).unwrap();
        assert_eq!(*style, PixelStyle::centered(40.0, 30.0, PIXEL_SIZE, 1.0));
    }

    #[test]
    fn test_eviction_releases_oldest_handle() {
        let mut session = active_session();
        feed_spaced(&mut session, TRAIL_LENGTH);
        let oldest = session.points().next().unwrap().element();

        feed_spaced_from(&mut session, TRAIL_LENGTH, 1);

        assert_eq!(session.len(), TRAIL_LENGTH);
        assert!(!session.surface().is_attached(oldest));
        assert_eq!(session.surface().attached(), TRAIL_LENGTH);
        assert_eq!(session.stats().evicted, 1);
        assert_eq!(session.points().next().unwrap().id(), PointId(1));
    }

    fn feed_spaced_from(session: &mut TrailSession<MemorySurface>, start: usize, count: usize) {
        for i in start..start + count {
            assert!(session.pointer_move(20.0 * (i + 1) as f64, 0.0));
        }
    }

    #[test]
    fn test_empty_tick_rearms() {
        let mut session = active_session();
        assert_eq!(session.tick(), FrameDecision::Continue);
        assert!(session.is_empty());
        assert_eq!(session.stats().ticks, 1);
        assert_eq!(session.surface().created(), 0);
    }

    #[test]
    fn test_tick_updates_rendered_style() {
        let mut session = active_session();
        session.pointer_move(100.0, 100.0);
        session.tick();

        let point = session.points().next().unwrap();
        let style = session.surface().style(point.element()).unwrap();
        assert!((style.opacity - (1.0 - FADE_SPEED)).abs() < 1e-9);
        assert!((style.width - PIXEL_SIZE * 0.99).abs() < 1e-9);
        assert!((style.left + style.width / 2.0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_expires_after_25_ticks() {
        let mut session = active_session();
        session.pointer_move(100.0, 100.0);
        let element = session.points().next().unwrap().element();

        for tick in 1..25 {
            session.tick();
            assert_eq!(session.len(), 1, "point removed early at tick {}", tick);
            let point = session.points().next().unwrap();
            assert!(point.opacity() > 0.0 && point.opacity() <= 1.0);
        }

        session.tick();
        assert!(session.is_empty());
        assert!(!session.surface().is_attached(element));
        assert_eq!(session.stats().expired, 1);
    }

    #[test]
    fn test_store_never_exceeds_capacity() {
        let mut session = active_session();
        for i in 0..200 {
            session.pointer_move(15.0 * i as f64, (i % 7) as f64 * 15.0);
            if i % 3 == 0 {
                session.tick();
            }
            assert!(session.len() <= TRAIL_LENGTH);
            assert!(session.points().all(|p| p.opacity() > 0.0 && p.opacity() <= 1.0));
        }
        let surface = session.surface();
        assert_eq!(surface.created() - surface.detached(), session.len());
    }

    #[test]
    fn test_teardown_stops_mutation() {
        let mut session = active_session();
        feed_spaced(&mut session, 3);
        session.tick();
        session.stop();

        let before: Vec<_> = session.points().map(|p| (p.id(), p.opacity(), p.age())).collect();
        let stats = session.stats();

        assert!(!session.pointer_move(900.0, 900.0));
        assert_eq!(session.tick(), FrameDecision::Stop);
        session.start();
        assert_eq!(session.tick(), FrameDecision::Stop);

        let after: Vec<_> = session.points().map(|p| (p.id(), p.opacity(), p.age())).collect();
        assert_eq!(before, after);
        assert_eq!(session.stats(), stats);
        // Teardown leaves rendered visuals alone
        assert_eq!(session.surface().attached(), 3);
    }

    /// Surface whose elements vanish on their own, like nodes removed by page scripts
    #[derive(Default)]
    struct VanishingSurface {
        inner: MemorySurface,
    }

    impl RenderSurface for VanishingSurface {
        fn has_mount(&self, id: &str) -> bool {
            self.inner.has_mount(id)
        }

        fn create_mount(&mut self, id: &str) -> SurfaceResult<()> {
            self.inner.create_mount(id)
        }

        fn attach(&mut self, style: &PixelStyle) -> SurfaceResult<ElementId> {
            let element = self.inner.attach(style)?;
            self.inner.detach(element)?;
            Ok(element)
        }

        fn update(&mut self, element: ElementId, _style: &PixelStyle) -> SurfaceResult<()> {
            Err(SurfaceError::UnknownElement(element))
        }

        fn detach(&mut self, element: ElementId) -> SurfaceResult<bool> {
            self.inner.detach(element)
        }
    }

    /// Surface that refuses to attach until told otherwise
    #[derive(Default)]
    struct FlakySurface {
        inner: MemorySurface,
        refuse_attach: bool,
    }

    impl RenderSurface for FlakySurface {
        fn has_mount(&self, id: &str) -> bool {
            self.inner.has_mount(id)
        }

        fn create_mount(&mut self, id: &str) -> SurfaceResult<()> {
            self.inner.create_mount(id)
        }

        fn attach(&mut self, style: &PixelStyle) -> SurfaceResult<ElementId> {
            if self.refuse_attach {
                return Err(SurfaceError::MountNotFound(MOUNT_ID.to_string()));
            }
            self.inner.attach(style)
        }

        fn update(&mut self, element: ElementId, style: &PixelStyle) -> SurfaceResult<()> {
            self.inner.update(element, style)
        }

        fn detach(&mut self, element: ElementId) -> SurfaceResult<bool> {
            self.inner.detach(element)
        }
    }

    #[test]
    fn test_failed_attach_leaves_sampler_and_ids_untouched() {
        let mut session = TrailSession::new(FlakySurface {
            refuse_attach: true,
            ..FlakySurface::default()
        });
        session.start();

        assert!(!session.pointer_move(100.0, 100.0));
        assert!(session.is_empty());
        assert_eq!(session.last_accepted(), (0.0, 0.0));
        assert_eq!(session.stats().accepted, 0);

        session.surface.refuse_attach = false;
        assert!(session.pointer_move(100.0, 100.0));
        assert_eq!(session.last_accepted(), (100.0, 100.0));
        assert_eq!(session.points().next().unwrap().id(), PointId(0));
    }

    #[test]
    fn test_surface_failures_are_silent() {
        let mut session = TrailSession::new(VanishingSurface::default());
        session.start();
        session.pointer_move(100.0, 100.0);

        for _ in 0..25 {
            assert_eq!(session.tick(), FrameDecision::Continue);
        }
        assert!(session.is_empty());
        assert_eq!(session.stats().expired, 1);
    }
}
