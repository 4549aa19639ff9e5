//! Workout playback engine
//!
//! The engine runs the session state machine on its owning thread
//! (`Idle → Running(0) → Resting → Running(1) → … → Finished`, with an
//! orthogonal pause flag and `Interrupted` on close) and spawns one
//! background worker per segment to read and pace frames. All coordination
//! is message passing: user intents arrive on a command channel, the worker
//! is driven by a control channel and reports back on an event channel.
//! Surface and recorder calls happen only on the engine thread, so display
//! updates stay in production order and at most one terminal history write
//! ever occurs.
//!
//! Time is accumulated from `Instant` wall clock with pause spans
//! subtracted, for segments and rest periods alike. A segment that runs to
//! its assigned duration reports exactly that duration, so a completed
//! session's total is `sum(durations) + (N - 1) * rest`. Rest time counts
//! toward the session total, matching the recorded history convention.

use crate::model::{Exercise, Workout};
use crate::player::{
    clock, Command, EngineOptions, PlayerSurface, SessionOutcome, SessionSummary,
};
use crate::session::{unix_now, SessionId, SessionRecorder};
use crate::utils::error::{PlayerError, Result};
use crate::video::{Frame, SourceFactory, VideoSource};

use crossbeam_channel::{select, unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use log::{debug, error, info, warn};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// How often the rest countdown wakes to refresh the display and poll for
/// commands; pause and close are honored within one tick
const REST_TICK: Duration = Duration::from_millis(100);

/// Control messages from the engine thread to the segment worker
enum WorkerCtl {
    Pause,
    Resume,
    Stop,
}

/// Events from the segment worker back to the engine thread
enum WorkerEvent {
    /// A decoded frame and the segment elapsed time it corresponds to
    Frame {
        frame: Frame,
        segment_elapsed: Duration,
    },

    /// The assigned duration elapsed; `segment_elapsed` is clamped to it
    Done { segment_elapsed: Duration },

    /// A stop request was honored at `segment_elapsed`
    Stopped { segment_elapsed: Duration },

    /// The source failed mid-segment (decode or restart error)
    Failed { segment_elapsed: Duration },
}

/// How one segment came to an end
enum SegmentEnd {
    Completed(Duration),
    Failed(Duration),
    Closed(Duration),
}

/// How one rest period came to an end
enum RestEnd {
    Elapsed,
    Closed(Duration),
}

/// Clonable sender of user intents into a running engine
#[derive(Clone)]
pub struct EngineHandle {
    commands: Sender<Command>,
}

impl EngineHandle {
    pub fn start(&self) {
        let _ = self.commands.send(Command::Start);
    }

    pub fn toggle_pause(&self) {
        let _ = self.commands.send(Command::TogglePause);
    }

    pub fn close(&self) {
        let _ = self.commands.send(Command::Close);
    }
}

/// Drives one workout session from start to finish
pub struct PlaybackEngine {
    workout_name: String,
    exercises: Vec<Exercise>,
    sources: Box<dyn SourceFactory>,
    recorder: Box<dyn SessionRecorder>,
    surface: Box<dyn PlayerSurface>,
    options: EngineOptions,
    commands: Receiver<Command>,

    session_id: Option<SessionId>,
    terminal_written: bool,
    is_paused: bool,

    /// Time accumulated before the current segment or rest period
    base_total: Duration,
}

impl PlaybackEngine {
    /// Build an engine for one workout
    ///
    /// Fails fast with [`PlayerError::InvalidSession`] if the workout has no
    /// active exercises; no resources are allocated and the recorder is
    /// never contacted.
    pub fn new(
        workout: &Workout,
        sources: Box<dyn SourceFactory>,
        recorder: Box<dyn SessionRecorder>,
        surface: Box<dyn PlayerSurface>,
        options: EngineOptions,
    ) -> Result<(Self, EngineHandle)> {
        let exercises = workout.active_exercises();
        if exercises.is_empty() {
            return Err(PlayerError::InvalidSession(format!(
                "workout '{}' has no exercises",
                workout.display_name()
            )));
        }

        let (command_tx, command_rx) = unbounded();

        let engine = Self {
            workout_name: workout.display_name().to_string(),
            exercises,
            sources,
            recorder,
            surface,
            options,
            commands: command_rx,
            session_id: None,
            terminal_written: false,
            is_paused: false,
            base_total: Duration::ZERO,
        };

        Ok((engine, EngineHandle { commands: command_tx }))
    }

    /// Run the session to completion or interruption, blocking the calling
    /// thread. This thread owns all surface and recorder calls.
    pub fn run(mut self) -> SessionSummary {
        // Idle: nothing is open and no record exists until the first start
        loop {
            match self.commands.recv() {
                Ok(Command::Start) => break,
                Ok(Command::TogglePause) => {}
                Ok(Command::Close) | Err(_) => {
                    info!("Player closed before the session started");
                    return SessionSummary {
                        outcome: SessionOutcome::Interrupted,
                        total_elapsed: Duration::ZERO,
                    };
                }
            }
        }

        self.begin_session();

        let total = self.exercises.len();
        let mut index = 0;
        while index < total {
            self.surface.set_progress(index + 1, total);

            let exercise = self.exercises[index].clone();
            let source = match self.sources.open(&exercise.video_path) {
                Ok(source) => source,
                Err(e) => {
                    // Skip the exercise as if instantly completed; the next
                    // one starts directly, with no rest period in between
                    error!(
                        "Error opening video {:?}: {}",
                        exercise.video_path, e
                    );
                    index += 1;
                    continue;
                }
            };

            match self.play_segment(source, &exercise) {
                SegmentEnd::Completed(elapsed) | SegmentEnd::Failed(elapsed) => {
                    self.base_total += elapsed;
                }
                SegmentEnd::Closed(elapsed) => {
                    self.base_total += elapsed;
                    return self.finish(SessionOutcome::Interrupted);
                }
            }

            index += 1;
            if index < total {
                match self.rest_between(index) {
                    RestEnd::Elapsed => self.base_total += self.options.rest,
                    RestEnd::Closed(rest_elapsed) => {
                        self.base_total += rest_elapsed;
                        return self.finish(SessionOutcome::Interrupted);
                    }
                }
            }
        }

        self.finish(SessionOutcome::Completed)
    }

    /// Record the session start; a persistence failure is logged and the
    /// session plays on without history
    fn begin_session(&mut self) {
        match self.recorder.begin(&self.workout_name, unix_now()) {
            Ok(id) => {
                debug!("Session record {} created for '{}'", id, self.workout_name);
                self.session_id = Some(id);
            }
            Err(e) => warn!("Failed to record session start: {}", e),
        }
    }

    /// Play one segment: spawn the worker, then pump commands and worker
    /// events until the segment ends or the player is closed
    fn play_segment(&mut self, source: Box<dyn VideoSource>, exercise: &Exercise) -> SegmentEnd {
        let duration = Duration::from_secs(u64::from(exercise.duration_secs));
        let reported = source.frame_rate();
        let fps = if reported > 0.0 {
            reported
        } else {
            self.options.default_fps
        };
        let interval = Duration::from_secs_f64(1.0 / fps);

        let (ctl_tx, ctl_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        let worker =
            thread::spawn(move || segment_worker(source, duration, interval, ctl_rx, event_tx));

        if self.is_paused {
            let _ = ctl_tx.send(WorkerCtl::Pause);
        }

        let end = loop {
            select! {
                recv(self.commands) -> cmd => match cmd {
                    Ok(Command::Start) => {}
                    Ok(Command::TogglePause) => {
                        self.is_paused = !self.is_paused;
                        let ctl = if self.is_paused { WorkerCtl::Pause } else { WorkerCtl::Resume };
                        let _ = ctl_tx.send(ctl);
                        info!("Playback {}", if self.is_paused { "paused" } else { "resumed" });
                    }
                    Ok(Command::Close) | Err(_) => {
                        let _ = ctl_tx.send(WorkerCtl::Stop);
                        // Drain until the worker reports where it stopped;
                        // no further frames are rendered
                        let elapsed = loop {
                            match event_rx.recv() {
                                Ok(WorkerEvent::Frame { .. }) => {}
                                Ok(WorkerEvent::Done { segment_elapsed })
                                | Ok(WorkerEvent::Stopped { segment_elapsed })
                                | Ok(WorkerEvent::Failed { segment_elapsed }) => {
                                    break segment_elapsed;
                                }
                                Err(_) => break Duration::ZERO,
                            }
                        };
                        break SegmentEnd::Closed(elapsed);
                    }
                },
                recv(event_rx) -> event => match event {
                    Ok(WorkerEvent::Frame { frame, segment_elapsed }) => {
                        self.surface.render_frame(&frame);
                        self.surface.set_segment_timer(&clock::format_remaining(
                            exercise.duration_secs,
                            segment_elapsed,
                        ));
                        self.surface.set_total_timer(&clock::format_total(
                            self.base_total + segment_elapsed,
                        ));
                    }
                    Ok(WorkerEvent::Done { segment_elapsed }) => {
                        break SegmentEnd::Completed(segment_elapsed);
                    }
                    Ok(WorkerEvent::Failed { segment_elapsed }) => {
                        break SegmentEnd::Failed(segment_elapsed);
                    }
                    Ok(WorkerEvent::Stopped { segment_elapsed }) => {
                        warn!("Segment worker stopped without a stop request");
                        break SegmentEnd::Failed(segment_elapsed);
                    }
                    Err(_) => break SegmentEnd::Failed(Duration::ZERO),
                },
            }
        };

        let _ = worker.join();
        end
    }

    /// Run the rest countdown on the engine thread, showing a preview of
    /// the upcoming exercise
    fn rest_between(&mut self, next_index: usize) -> RestEnd {
        let next = self.exercises[next_index].clone();
        let preview = self.read_preview(&next.video_path);
        self.surface.show_rest_preview(preview.as_ref());

        let rest = self.options.rest;
        let started = Instant::now();
        let mut paused_total = Duration::ZERO;
        let mut pause_started: Option<Instant> = None;

        loop {
            let elapsed = rest_elapsed(started, paused_total, pause_started);
            if elapsed >= rest {
                return RestEnd::Elapsed;
            }

            let remaining = rest - elapsed;
            // Ceiling, so the label starts at the full rest length and
            // reaches zero exactly when the next segment begins
            let shown = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            self.surface
                .set_segment_timer(&format!("Rest {}", clock::format_mmss(shown)));
            self.surface
                .set_total_timer(&clock::format_total(self.base_total + elapsed));

            match self.commands.recv_timeout(REST_TICK) {
                Ok(Command::Start) => {}
                Ok(Command::TogglePause) => {
                    if let Some(since) = pause_started.take() {
                        paused_total += since.elapsed();
                        self.is_paused = false;
                        info!("Rest resumed");
                    } else {
                        pause_started = Some(Instant::now());
                        self.is_paused = true;
                        info!("Rest paused");
                    }
                }
                Ok(Command::Close) | Err(RecvTimeoutError::Disconnected) => {
                    return RestEnd::Closed(rest_elapsed(started, paused_total, pause_started));
                }
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }

    /// Grab the first frame of the upcoming exercise for the rest preview
    fn read_preview(&self, path: &Path) -> Option<Frame> {
        match self.sources.open(path) {
            Ok(mut source) => match source.read_next_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    debug!("Preview read failed for {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                debug!("Preview open failed for {:?}: {}", path, e);
                None
            }
        }
    }

    /// Commit the terminal history write (exactly once) and summarize
    fn finish(&mut self, outcome: SessionOutcome) -> SessionSummary {
        self.write_terminal(outcome);

        match outcome {
            SessionOutcome::Completed => info!(
                "Workout '{}' completed, total time {}",
                self.workout_name,
                clock::format_total(self.base_total)
            ),
            SessionOutcome::Interrupted => info!(
                "Workout '{}' interrupted, total time {}",
                self.workout_name,
                clock::format_total(self.base_total)
            ),
        }

        SessionSummary {
            outcome,
            total_elapsed: self.base_total,
        }
    }

    fn write_terminal(&mut self, outcome: SessionOutcome) {
        if self.terminal_written {
            return;
        }
        self.terminal_written = true;

        if let Some(id) = self.session_id {
            let completed = outcome == SessionOutcome::Completed;
            if let Err(e) = self
                .recorder
                .update(id, self.base_total.as_secs(), completed)
            {
                warn!("Failed to record session outcome: {}", e);
            }
        }
    }
}

fn rest_elapsed(
    started: Instant,
    paused_total: Duration,
    pause_started: Option<Instant>,
) -> Duration {
    match pause_started {
        Some(since) => since.duration_since(started).saturating_sub(paused_total),
        None => started.elapsed().saturating_sub(paused_total),
    }
}

/// Background worker for one segment
///
/// Owns the video source exclusively; reads frames sequentially, loops the
/// source on end of stream, paces to `interval` and polls the control
/// channel every iteration so pause and stop are honored within one frame
/// interval. Elapsed time is wall clock minus pause spans, clamped to the
/// assigned duration on completion. Dropping the source on return releases
/// it.
fn segment_worker(
    mut source: Box<dyn VideoSource>,
    duration: Duration,
    interval: Duration,
    ctl: Receiver<WorkerCtl>,
    events: Sender<WorkerEvent>,
) {
    let started = Instant::now();
    let mut paused_total = Duration::ZERO;
    let mut restarted_without_frame = false;

    loop {
        match ctl.try_recv() {
            Ok(WorkerCtl::Stop) => {
                let elapsed = started
                    .elapsed()
                    .saturating_sub(paused_total)
                    .min(duration);
                let _ = events.send(WorkerEvent::Stopped {
                    segment_elapsed: elapsed,
                });
                return;
            }
            Ok(WorkerCtl::Pause) => {
                let pause_started = Instant::now();
                loop {
                    // Block until resumed or stopped; no frames are read
                    // and no time accumulates while paused
                    match ctl.recv() {
                        Ok(WorkerCtl::Resume) => {
                            paused_total += pause_started.elapsed();
                            break;
                        }
                        Ok(WorkerCtl::Pause) => {}
                        Ok(WorkerCtl::Stop) | Err(_) => {
                            let elapsed = pause_started
                                .duration_since(started)
                                .saturating_sub(paused_total)
                                .min(duration);
                            let _ = events.send(WorkerEvent::Stopped {
                                segment_elapsed: elapsed,
                            });
                            return;
                        }
                    }
                }
            }
            Ok(WorkerCtl::Resume) => {}
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => return,
        }

        let elapsed = started.elapsed().saturating_sub(paused_total);
        if elapsed >= duration {
            let _ = events.send(WorkerEvent::Done {
                segment_elapsed: duration,
            });
            return;
        }

        match source.read_next_frame() {
            Ok(Some(frame)) => {
                restarted_without_frame = false;
                if events
                    .send(WorkerEvent::Frame {
                        frame,
                        segment_elapsed: elapsed,
                    })
                    .is_err()
                {
                    // Engine is gone; nothing left to report to
                    return;
                }
            }
            Ok(None) => {
                // Segment length is governed by elapsed time, not stream
                // length: rewind and keep supplying frames
                if restarted_without_frame {
                    warn!("Video source is empty, skipping segment");
                    let _ = events.send(WorkerEvent::Failed {
                        segment_elapsed: elapsed,
                    });
                    return;
                }
                if let Err(e) = source.restart() {
                    warn!("Video restart failed: {}", e);
                    let _ = events.send(WorkerEvent::Failed {
                        segment_elapsed: elapsed,
                    });
                    return;
                }
                restarted_without_frame = true;
                continue;
            }
            Err(e) => {
                warn!("Frame decode failed: {}", e);
                let _ = events.send(WorkerEvent::Failed {
                    segment_elapsed: elapsed,
                });
                return;
            }
        }

        thread::sleep(interval);
    }
}
