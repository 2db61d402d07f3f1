use std::time::{Duration, Instant};

use crate::capture::domain::frame_source::FrameSource;
use crate::display::domain::display_surface::{DisplayEvent, DisplaySurface};
use crate::lighting::domain::lighting_reading::LightingReading;
use crate::lighting::lighting_estimator::LightingEstimator;
use crate::overlay::overlay_renderer::OverlayRenderer;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::{DEFAULT_POLL_MS, EXIT_KEY};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped(StopReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The frame source ran dry or a frame could not be acquired.
    EndOfStream,
    /// The exit key was pressed.
    ExitRequested,
    WindowClosed,
    /// `max_frames` frames were processed.
    FrameLimit,
}

#[derive(Clone, Copy, Debug)]
pub struct RunOptions {
    pub poll_timeout: Duration,
    pub exit_key: char,
    pub max_frames: Option<usize>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(DEFAULT_POLL_MS),
            exit_key: EXIT_KEY,
            max_frames: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunSummary {
    pub frames: usize,
    pub stop_reason: StopReason,
    pub last_reading: Option<LightingReading>,
}

/// Live lighting monitor: capture → estimate → render → show → poll.
///
/// One frame is processed end to end per iteration. Whatever ends the run
/// (end of stream, exit key, closed window, frame limit or an error), the
/// frame source is released exactly once and the display is closed.
pub struct RunLoop {
    source: Box<dyn FrameSource>,
    estimator: LightingEstimator,
    renderer: OverlayRenderer,
    display: Box<dyn DisplaySurface>,
    logger: Box<dyn PipelineLogger>,
    options: RunOptions,
    state: RunState,
    frames: usize,
    last_reading: Option<LightingReading>,
}

impl RunLoop {
    pub fn new(
        source: Box<dyn FrameSource>,
        estimator: LightingEstimator,
        renderer: OverlayRenderer,
        display: Box<dyn DisplaySurface>,
        logger: Box<dyn PipelineLogger>,
        options: RunOptions,
    ) -> Self {
        Self {
            source,
            estimator,
            renderer,
            display,
            logger,
            options,
            state: RunState::Running,
            frames: 0,
            last_reading: None,
        }
    }

    /// Runs until stopped. Consumes the loop so it cannot be restarted on a
    /// released source.
    pub fn run(mut self) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let outcome = self.drive();

        self.source.release();
        self.display.close();
        self.logger.summary();

        let stop_reason = outcome?;
        Ok(RunSummary {
            frames: self.frames,
            stop_reason,
            last_reading: self.last_reading,
        })
    }

    fn drive(&mut self) -> Result<StopReason, Box<dyn std::error::Error>> {
        loop {
            if let RunState::Stopped(reason) = self.state {
                self.logger
                    .info(&format!("Stopped after {} frames: {reason:?}", self.frames));
                return Ok(reason);
            }
            self.state = self.step()?;
        }
    }

    fn step(&mut self) -> Result<RunState, Box<dyn std::error::Error>> {
        if self.options.max_frames.is_some_and(|max| self.frames >= max) {
            return Ok(RunState::Stopped(StopReason::FrameLimit));
        }

        let start = Instant::now();
        let mut frame = match self.source.read() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(RunState::Stopped(StopReason::EndOfStream)),
            Err(e) => {
                log::warn!("Frame acquisition failed, ending stream: {e}");
                return Ok(RunState::Stopped(StopReason::EndOfStream));
            }
        };
        self.logger.timing("capture", elapsed_ms(start));

        let start = Instant::now();
        let reading = self.estimator.estimate(&frame);
        self.logger.timing("estimate", elapsed_ms(start));
        self.logger.metric("brightness", reading.brightness);
        self.logger.metric(
            "face_readings",
            if reading.is_face_reading() { 1.0 } else { 0.0 },
        );

        let start = Instant::now();
        self.renderer.render_reading(&mut frame, &reading);
        self.logger.timing("render", elapsed_ms(start));

        let start = Instant::now();
        self.display.show(&frame)?;
        self.logger.timing("display", elapsed_ms(start));

        self.logger.reading(frame.index(), &reading);
        self.frames += 1;
        self.last_reading = Some(reading);

        let next = match self.display.poll_event(self.options.poll_timeout) {
            Some(DisplayEvent::Key(key)) if key == self.options.exit_key => {
                RunState::Stopped(StopReason::ExitRequested)
            }
            Some(DisplayEvent::Closed) => RunState::Stopped(StopReason::WindowClosed),
            _ => RunState::Running,
        };
        Ok(next)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
