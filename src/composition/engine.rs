use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    composition::{compositor::Compositor, session::Session, surface::PresentationSurface},
    config::Config,
    error::{Result, SourceError},
    filters::FilterConfig,
    video::{DimensionSync, FrameAcquisition, SourceReadiness, VideoSource},
};

/// Lifecycle of a render loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No source attached
    Idle,
    /// Source attached, resolution or first frame not there yet
    Initializing,
    /// Steady-state per-frame processing
    Running,
    /// Teardown in progress
    Stopping,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing attached
    Idle,
    /// Source had no decodable frame; nothing presented
    NotReady,
    /// A processed frame reached the surface
    Presented,
    /// A recoverable fault dropped this tick; the previous frame stays on screen
    Skipped,
    /// The source went away; the loop is back to idle
    SourceLost,
    /// Stop was requested; nothing processed
    Stopped,
}

/// Counters for one attachment of a source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub presented: u64,
    pub not_ready: u64,
    pub skipped: u64,
    pub reinitialized: u64,
    pub process_time: Duration,
}

impl LoopStats {
    /// Mean acquire-to-present time over presented frames
    pub fn average_process_time(&self) -> Duration {
        if self.presented == 0 {
            return Duration::ZERO;
        }
        self.process_time / self.presented as u32
    }
}

/// Drives acquire -> filter -> composite -> present once per tick
///
/// The loop owns the working buffer (through [`FrameAcquisition`]) and the
/// presentation surface. Shared controls are read once per tick from the
/// [`Session`], so a selection change lands on the next tick, never mid-frame.
pub struct RenderLoop<S, P> {
    session: Arc<Session>,
    filters: FilterConfig,
    fps: f64,
    surface: P,
    surface_dimensions: Option<(u32, u32)>,
    acquisition: Option<FrameAcquisition<S>>,
    state: LoopState,
    cancel: CancellationToken,
    stats: LoopStats,
}

impl<S: VideoSource, P: PresentationSurface> RenderLoop<S, P> {
    pub fn new(config: &Config, session: Arc<Session>, surface: P) -> Self {
        Self {
            session,
            filters: config.filters.clone(),
            fps: config.pipeline.fps,
            surface,
            surface_dimensions: None,
            acquisition: None,
            state: LoopState::Idle,
            cancel: CancellationToken::new(),
            stats: LoopStats::default(),
        }
    }

    /// Attach a video source, replacing any previous one
    ///
    /// Stopping cancels the loop's token; attaching after a stop issues a
    /// fresh one, so fetch [`RenderLoop::cancel_token`] after attaching.
    pub fn attach(&mut self, source: S) {
        if self.acquisition.is_some() {
            self.stop();
        }
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }

        self.acquisition = Some(FrameAcquisition::new(source));
        self.stats = LoopStats::default();
        transition(&mut self.state, LoopState::Initializing);
    }

    /// Run one acquire/process/present step
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if self.cancel.is_cancelled() {
            if self.acquisition.is_some() {
                self.stop();
            }
            return Ok(TickOutcome::Stopped);
        }

        let Some(acquisition) = self.acquisition.as_mut() else {
            return Ok(TickOutcome::Idle);
        };
        self.stats.ticks += 1;

        let readiness = acquisition.readiness();
        if readiness == SourceReadiness::Lost {
            return Ok(self.handle_source_loss("source reported lost"));
        }

        match acquisition.sync_dimensions()? {
            DimensionSync::Unknown => {
                transition(&mut self.state, LoopState::Initializing);
                self.stats.not_ready += 1;
                return Ok(TickOutcome::NotReady);
            }
            DimensionSync::Resized { width, height } => {
                debug!("Working buffer now {}x{}", width, height);
                transition(&mut self.state, LoopState::Initializing);
                self.stats.reinitialized += 1;
            }
            DimensionSync::Unchanged => {}
        }

        if readiness == SourceReadiness::NotReady {
            debug!("Source not ready, skipping tick {}", self.stats.ticks);
            self.stats.not_ready += 1;
            return Ok(TickOutcome::NotReady);
        }

        // One read of the shared controls per tick
        let settings = self.session.snapshot();
        let started = Instant::now();

        let frame = match acquisition.draw() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.stats.not_ready += 1;
                return Ok(TickOutcome::NotReady);
            }
            Err(e) if e.is_source_loss() => {
                return Ok(self.handle_source_loss(&e.to_string()));
            }
            Err(e) if e.is_recoverable() => {
                warn!("Dropping tick {}: {}", self.stats.ticks, e);
                self.stats.skipped += 1;
                return Ok(TickOutcome::Skipped);
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = settings.filter.apply(frame, &self.filters) {
            warn!("Filter '{}' failed, keeping previous frame: {}", settings.filter, e);
            self.stats.skipped += 1;
            return Ok(TickOutcome::Skipped);
        }

        Compositor::new(settings.mirror).apply(frame);

        // The surface keeps the last presented frame until one at the new size is ready
        let dimensions = frame.dimensions();
        if self.surface_dimensions != Some(dimensions) {
            match self.surface.resize(dimensions.0, dimensions.1) {
                Ok(()) => self.surface_dimensions = Some(dimensions),
                Err(e) if e.is_recoverable() => {
                    warn!("Surface resize failed on tick {}: {}", self.stats.ticks, e);
                    self.stats.skipped += 1;
                    return Ok(TickOutcome::Skipped);
                }
                Err(e) => return Err(e),
            }
        }

        match self.surface.present(frame) {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => {
                warn!("Present failed on tick {}: {}", self.stats.ticks, e);
                self.stats.skipped += 1;
                return Ok(TickOutcome::Skipped);
            }
            Err(e) => return Err(e),
        }

        transition(&mut self.state, LoopState::Running);
        self.stats.presented += 1;
        self.stats.process_time += started.elapsed();
        Ok(TickOutcome::Presented)
    }

    /// Tick at the configured rate until stopped, cancelled, out of ticks or
    /// the source is lost
    ///
    /// Source loss is terminal and comes back as [`SourceError::Lost`].
    pub async fn run(&mut self, max_ticks: Option<u64>) -> Result<LoopStats> {
        let period = Duration::from_secs_f64(1.0 / self.fps);
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let cancel = self.cancel.clone();
        let mut ticks = 0u64;
        info!("Render loop running at {:.1} fps", self.fps);

        loop {
            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            ticks += 1;

            let outcome = match self.tick() {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.stop();
                    return Err(e);
                }
            };

            match outcome {
                TickOutcome::SourceLost => {
                    return Err(SourceError::Lost {
                        reason: "video source became unavailable".to_string(),
                    }
                    .into());
                }
                TickOutcome::Idle | TickOutcome::Stopped => break,
                _ => {}
            }
        }

        let stats = self.stats.clone();
        self.stop();
        Ok(stats)
    }

    /// Stop processing, release the working buffer and detach the source
    ///
    /// Takes effect before the next tick: the cancellation token is tripped
    /// first, so a tick already scheduled by [`RenderLoop::run`] never executes.
    pub fn stop(&mut self) -> Option<S> {
        self.cancel.cancel();

        let acquisition = self.acquisition.take()?;
        transition(&mut self.state, LoopState::Stopping);
        let source = acquisition.into_source();
        transition(&mut self.state, LoopState::Idle);

        info!(
            "Render loop stopped: {} ticks, {} presented, {} not ready, {} skipped",
            self.stats.ticks, self.stats.presented, self.stats.not_ready, self.stats.skipped
        );
        Some(source)
    }

    fn handle_source_loss(&mut self, reason: &str) -> TickOutcome {
        warn!("Video source lost: {}", reason);
        self.stop();
        TickOutcome::SourceLost
    }

    /// Token the UI can trip to stop the loop
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    /// Dimensions of the working buffer, if one is allocated
    pub fn working_dimensions(&self) -> Option<(u32, u32)> {
        self.acquisition.as_ref().and_then(FrameAcquisition::working_dimensions)
    }
}

fn transition(state: &mut LoopState, to: LoopState) {
    if *state != to {
        info!("Render loop: {:?} -> {:?}", state, to);
        *state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::FrameSurface;
    use crate::error::RetroLensError;
    use crate::filters::FilterKind;
    use crate::video::{Frame, TestPatternSource};

    /// Source whose readiness, size and frame content are set by the test
    struct ScriptedSource {
        readiness: SourceReadiness,
        dimensions: Option<(u32, u32)>,
        color: [u8; 4],
        draws: u32,
        /// Draw number (1-based) that scribbles over the buffer and fails
        fail_draw: Option<u32>,
        /// After this many draws, switch to the given readiness and size
        switch: Option<(u32, SourceReadiness, (u32, u32))>,
    }

    impl ScriptedSource {
        fn ready(width: u32, height: u32, color: [u8; 4]) -> Self {
            Self {
                readiness: SourceReadiness::Ready,
                dimensions: Some((width, height)),
                color,
                draws: 0,
                fail_draw: None,
                switch: None,
            }
        }
    }

    impl VideoSource for ScriptedSource {
        fn readiness(&mut self) -> SourceReadiness {
            match self.switch {
                Some((after, readiness, _)) if self.draws >= after => readiness,
                _ => self.readiness,
            }
        }

        fn native_dimensions(&self) -> Option<(u32, u32)> {
            match self.switch {
                Some((after, _, dimensions)) if self.draws >= after => Some(dimensions),
                _ => self.dimensions,
            }
        }

        fn draw_into(&mut self, frame: &mut Frame) -> Result<()> {
            self.draws += 1;
            if self.fail_draw == Some(self.draws) {
                frame.pixels_mut().fill(0);
                return Err(SourceError::DrawFailed {
                    reason: "decoder hiccup".to_string(),
                }
                .into());
            }
            for pixel in frame.pixels_mut().chunks_exact_mut(4) {
                pixel.copy_from_slice(&self.color);
            }
            Ok(())
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.pipeline.mirror = false;
        config
    }

    fn new_loop<S: VideoSource>() -> RenderLoop<S, FrameSurface> {
        let config = config();
        let session = Arc::new(Session::from_config(&config.pipeline));
        RenderLoop::new(&config, session, FrameSurface::new())
    }

    #[test]
    fn test_idle_without_source() {
        let mut render_loop = new_loop::<ScriptedSource>();
        assert_eq!(render_loop.state(), LoopState::Idle);
        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Idle);
    }

    #[test]
    fn test_never_ready_source_presents_nothing() {
        let mut render_loop = new_loop();
        let mut source = ScriptedSource::ready(4, 4, [1, 2, 3, 4]);
        source.readiness = SourceReadiness::NotReady;
        render_loop.attach(source);

        for _ in 0..20 {
            assert_eq!(render_loop.tick().unwrap(), TickOutcome::NotReady);
        }
        assert_eq!(render_loop.surface().presents(), 0);
        assert_eq!(render_loop.state(), LoopState::Initializing);
    }

    #[test]
    fn test_unknown_resolution_stays_initializing() {
        let mut render_loop = new_loop();
        let mut source = ScriptedSource::ready(4, 4, [0; 4]);
        source.dimensions = None;
        render_loop.attach(source);

        assert_eq!(render_loop.tick().unwrap(), TickOutcome::NotReady);
        assert_eq!(render_loop.state(), LoopState::Initializing);
        assert_eq!(render_loop.working_dimensions(), None);
    }

    #[test]
    fn test_ready_source_runs_and_presents() {
        let mut render_loop = new_loop();
        render_loop.attach(ScriptedSource::ready(3, 2, [255, 0, 0, 77]));
        render_loop.session().registry().select("Grayscale");

        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Presented);
        assert_eq!(render_loop.state(), LoopState::Running);

        let presented = render_loop.surface().latest().unwrap();
        assert_eq!(presented.dimensions(), (3, 2));
        assert_eq!(presented.get_pixel(0, 0), [76, 76, 76, 77]);
    }

    #[test]
    fn test_selection_change_applies_on_next_tick() {
        let mut render_loop = new_loop();
        render_loop.attach(ScriptedSource::ready(2, 2, [0, 255, 0, 255]));

        render_loop.tick().unwrap();
        assert_eq!(render_loop.surface().latest().unwrap().get_pixel(0, 0), [0, 255, 0, 255]);

        assert!(render_loop.session().registry().select_kind(FilterKind::Grayscale));
        render_loop.tick().unwrap();
        assert_eq!(render_loop.surface().latest().unwrap().get_pixel(0, 0), [150, 150, 150, 255]);
    }

    #[test]
    fn test_mirror_toggle() {
        let mut render_loop = new_loop();
        render_loop.attach(TestPatternSource::new(16, 2));
        render_loop.tick().unwrap();
        let plain = render_loop.surface().latest().unwrap().clone();

        let mut reference = TestPatternSource::new(16, 2);
        let mut expected = Frame::new_black(16, 2).unwrap();
        reference.draw_into(&mut expected).unwrap();
        reference.draw_into(&mut expected).unwrap();
        crate::composition::compositor::mirror_horizontal(&mut expected);

        render_loop.session().set_mirror(true);
        render_loop.tick().unwrap();
        let mirrored = render_loop.surface().latest().unwrap();
        assert_ne!(&plain, mirrored);
        assert_eq!(mirrored, &expected);
    }

    #[test]
    fn test_resolution_change_reallocates_within_one_tick() {
        let mut render_loop = new_loop();
        render_loop.attach(TestPatternSource::new(8, 6).with_resize_after(3, 4, 2));

        for _ in 0..3 {
            assert_eq!(render_loop.tick().unwrap(), TickOutcome::Presented);
        }
        assert_eq!(render_loop.working_dimensions(), Some((8, 6)));

        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Presented);
        assert_eq!(render_loop.working_dimensions(), Some((4, 2)));
        assert_eq!(render_loop.surface().latest().unwrap().dimensions(), (4, 2));
        assert_eq!(render_loop.stats().reinitialized, 2);
        assert_eq!(render_loop.surface().allocations(), 2);
    }

    #[test]
    fn test_resize_while_not_ready_keeps_presented_frame() {
        let mut render_loop = new_loop();
        let mut source = ScriptedSource::ready(4, 4, [200, 100, 50, 255]);
        source.switch = Some((1, SourceReadiness::NotReady, (2, 2)));
        render_loop.attach(source);

        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Presented);
        assert_eq!(render_loop.tick().unwrap(), TickOutcome::NotReady);
        assert_eq!(render_loop.working_dimensions(), Some((2, 2)));
        assert_eq!(render_loop.state(), LoopState::Initializing);

        let latest = render_loop.surface().latest().unwrap();
        assert_eq!(latest.dimensions(), (4, 4));
        assert_eq!(latest.get_pixel(3, 3), [200, 100, 50, 255]);
        assert_eq!(render_loop.surface().presents(), 1);
        assert_eq!(render_loop.surface().allocations(), 1);
    }

    #[test]
    fn test_surface_follows_resize_once_ready() {
        let mut render_loop = new_loop();
        let mut source = ScriptedSource::ready(4, 4, [200, 100, 50, 255]);
        source.switch = Some((1, SourceReadiness::Ready, (2, 2)));
        render_loop.attach(source);

        render_loop.tick().unwrap();
        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Presented);
        assert_eq!(render_loop.surface().latest().unwrap().dimensions(), (2, 2));
        assert_eq!(render_loop.surface().allocations(), 2);
    }

    #[test]
    fn test_draw_fault_skips_tick_and_keeps_previous_frame() {
        let mut render_loop = new_loop();
        let mut source = ScriptedSource::ready(4, 4, [200, 100, 50, 255]);
        source.fail_draw = Some(2);
        render_loop.attach(source);

        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Presented);
        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Skipped);
        assert_eq!(render_loop.surface().presents(), 1);
        assert_eq!(render_loop.stats().skipped, 1);
        assert_eq!(render_loop.state(), LoopState::Running);
        assert_eq!(render_loop.surface().latest().unwrap().get_pixel(1, 2), [200, 100, 50, 255]);

        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Presented);
        assert_eq!(render_loop.surface().presents(), 2);
    }

    /// Surface whose first few resizes fail
    struct FlakySurface {
        inner: FrameSurface,
        failing_resizes: u32,
    }

    impl PresentationSurface for FlakySurface {
        fn resize(&mut self, width: u32, height: u32) -> Result<()> {
            if self.failing_resizes > 0 {
                self.failing_resizes -= 1;
                return Err(crate::error::SurfaceError::PresentFailed {
                    reason: "display busy".to_string(),
                }
                .into());
            }
            self.inner.resize(width, height)
        }

        fn present(&mut self, frame: &Frame) -> Result<()> {
            self.inner.present(frame)
        }
    }

    #[test]
    fn test_failed_surface_resize_is_retried() {
        let config = config();
        let session = Arc::new(Session::from_config(&config.pipeline));
        let surface = FlakySurface {
            inner: FrameSurface::new(),
            failing_resizes: 1,
        };
        let mut render_loop = RenderLoop::new(&config, session, surface);
        render_loop.attach(ScriptedSource::ready(3, 3, [1, 2, 3, 255]));

        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Skipped);
        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Presented);
        assert_eq!(render_loop.surface().inner.latest().unwrap().get_pixel(0, 0), [1, 2, 3, 255]);
    }

    #[test]
    fn test_buffers_not_reallocated_in_steady_state() {
        let mut render_loop = new_loop();
        render_loop.attach(TestPatternSource::new(8, 8));
        for _ in 0..10 {
            render_loop.tick().unwrap();
        }
        assert_eq!(render_loop.stats().reinitialized, 1);
        assert_eq!(render_loop.surface().allocations(), 1);
        assert_eq!(render_loop.stats().presented, 10);
    }

    #[test]
    fn test_source_loss_returns_to_idle() {
        let mut render_loop = new_loop();
        render_loop.attach(TestPatternSource::new(4, 4).with_loss_after(2));

        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Presented);
        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Presented);
        assert_eq!(render_loop.tick().unwrap(), TickOutcome::SourceLost);
        assert_eq!(render_loop.state(), LoopState::Idle);
        assert_eq!(render_loop.working_dimensions(), None);
        assert_eq!(render_loop.surface().presents(), 2);
    }

    #[test]
    fn test_stop_prevents_further_ticks() {
        let mut render_loop = new_loop();
        render_loop.attach(ScriptedSource::ready(2, 2, [5; 4]));
        render_loop.tick().unwrap();

        let source = render_loop.stop().unwrap();
        assert_eq!(source.draws, 1);
        assert_eq!(render_loop.state(), LoopState::Idle);
        assert_eq!(render_loop.working_dimensions(), None);
        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Stopped);
        assert_eq!(render_loop.surface().presents(), 1);
    }

    #[test]
    fn test_cancel_token_stops_before_next_tick() {
        let mut render_loop = new_loop();
        render_loop.attach(ScriptedSource::ready(2, 2, [5; 4]));
        render_loop.cancel_token().cancel();

        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Stopped);
        assert_eq!(render_loop.state(), LoopState::Idle);
        assert_eq!(render_loop.surface().presents(), 0);
    }

    #[test]
    fn test_reattach_after_stop() {
        let mut render_loop = new_loop();
        render_loop.attach(ScriptedSource::ready(2, 2, [5; 4]));
        render_loop.stop();

        render_loop.attach(ScriptedSource::ready(2, 2, [6; 4]));
        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Presented);
        assert_eq!(render_loop.surface().latest().unwrap().get_pixel(1, 1), [6; 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_for_fixed_ticks() {
        let mut render_loop = new_loop();
        render_loop.attach(TestPatternSource::new(8, 8).with_warmup(2));

        let stats = render_loop.run(Some(6)).await.unwrap();
        assert_eq!(stats.ticks, 6);
        assert_eq!(stats.not_ready, 2);
        assert_eq!(stats.presented, 4);
        assert_eq!(render_loop.state(), LoopState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_cancel() {
        let mut render_loop = new_loop();
        render_loop.attach(TestPatternSource::new(8, 8));

        let token = render_loop.cancel_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            token.cancel();
        });

        let stats = render_loop.run(None).await.unwrap();
        assert!(stats.presented >= 1 && stats.presented <= 6, "{stats:?}");
        assert_eq!(render_loop.state(), LoopState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_reports_source_loss() {
        let mut render_loop = new_loop();
        render_loop.attach(TestPatternSource::new(4, 4).with_loss_after(3));

        let err = render_loop.run(None).await.unwrap_err();
        assert!(matches!(err, RetroLensError::Source(SourceError::Lost { .. })));
        assert_eq!(render_loop.state(), LoopState::Idle);
        assert_eq!(render_loop.surface().presents(), 3);
    }

    #[test]
    fn test_average_process_time() {
        let stats = LoopStats {
            presented: 4,
            process_time: Duration::from_millis(8),
            ..LoopStats::default()
        };
        assert_eq!(stats.average_process_time(), Duration::from_millis(2));
        assert_eq!(LoopStats::default().average_process_time(), Duration::ZERO);
    }
}
