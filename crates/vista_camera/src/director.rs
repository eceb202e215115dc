//! Camera director
//!
//! Owns every piece of camera state and decides, frame by frame, who drives
//! the camera:
//!
//! - **Free**: the host's orbit controls; the director writes nothing
//! - **Path**: scroll-driven travel along the journey path
//! - **Cinematic**: the scripted fly-through, played once
//! - **Credits**: a slow drift toward the closing pose
//!
//! Hosts queue [`InputEvent`]s at any time with [`Director::push`]. Queued
//! events are applied at the start of the next [`Director::update`], which
//! then computes the pose for the frame. Outward notifications collect until
//! [`Director::drain_events`] is called.

use crate::checkpoint::Checkpoints;
use crate::cinematic::CinematicSequencer;
use crate::config::SessionConfig;
use crate::credits::CreditsApproach;
use crate::error::Result;
use crate::events::{CameraMode, DirectorEvent, InputEvent};
use crate::interaction::InteractionGate;
use crate::path::{PathCamera, ScrubOverride};
use crate::scroll::{ScrollController, ScrollDelta, ScrollOutcome, ScrollState};
use crate::transform::{CameraSink, CameraTransform};
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Who drives the camera this frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectorState {
    Free,
    Path,
    Cinematic,
    Credits,
}

impl From<CameraMode> for DirectorState {
    fn from(mode: CameraMode) -> Self {
        match mode {
            CameraMode::Free => DirectorState::Free,
            CameraMode::Path => DirectorState::Path,
        }
    }
}

/// Session orchestrator
#[derive(Debug)]
pub struct Director {
    state: DirectorState,
    mode: CameraMode,
    final_character: String,
    path: PathCamera,
    scroll: ScrollController,
    checkpoints: Checkpoints,
    interactions: InteractionGate,
    cinematic: CinematicSequencer,
    credits: CreditsApproach,
    pose: CameraTransform,
    inputs: VecDeque<InputEvent>,
    events: Vec<DirectorEvent>,
}

impl Director {
    /// Validate `config` and build a session at the start of the path
    pub fn new(config: &SessionConfig) -> Result<Self> {
        config.validate()?;

        let path = PathCamera::from_config(&config.path)?;
        let pose = path.pose_at(0.0);

        Ok(Self {
            state: DirectorState::Path,
            mode: CameraMode::Path,
            final_character: config.final_character.clone(),
            path,
            scroll: ScrollController::new(config.scroll),
            checkpoints: Checkpoints::new(&config.checkpoints)?,
            interactions: InteractionGate::new(),
            cinematic: CinematicSequencer::new(config.cinematic.script()?),
            credits: CreditsApproach::new(&config.credits),
            pose,
            inputs: VecDeque::new(),
            events: Vec::new(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> DirectorState {
        self.state
    }

    /// Last camera mode the user picked
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Last pose the director computed
    pub fn pose(&self) -> &CameraTransform {
        &self.pose
    }

    pub fn scroll(&self) -> &ScrollState {
        self.scroll.state()
    }

    /// Checkpoint currently holding the camera, if any
    pub fn stuck(&self) -> Option<usize> {
        self.scroll.stuck()
    }

    pub fn checkpoints(&self) -> &Checkpoints {
        &self.checkpoints
    }

    pub fn interactions(&self) -> &InteractionGate {
        &self.interactions
    }

    pub fn cinematic(&self) -> &CinematicSequencer {
        &self.cinematic
    }

    pub fn path(&self) -> &PathCamera {
        &self.path
    }

    pub fn final_character(&self) -> &str {
        &self.final_character
    }

    /// Debug scrub control for the path camera
    pub fn debug_scrub(&mut self) -> &mut ScrubOverride {
        self.path.scrub_mut()
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Queue an event for the next update
    pub fn push(&mut self, event: InputEvent) {
        self.inputs.push_back(event);
    }

    /// Number of events waiting for the next update
    pub fn pending_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Take every outward event raised since the last drain
    pub fn drain_events(&mut self) -> impl Iterator<Item = DirectorEvent> + '_ {
        self.events.drain(..)
    }

    /// A character conversation finished (dialog opened and closed)
    pub fn on_character_interaction_complete(&mut self, character: &str) {
        self.emit(DirectorEvent::InteractionCompleted {
            character: character.to_string(),
        });

        for index in self.checkpoints.unlock_character(character) {
            self.emit(DirectorEvent::CheckpointUnlocked {
                checkpoint: index,
                character: character.to_string(),
            });
        }

        if let Some(index) = self.scroll.stuck() {
            if self.checkpoints.is_passed(index) {
                self.scroll.clear_stuck();
                self.emit(DirectorEvent::StuckCleared { checkpoint: index });
            }
        }
    }

    /// The final character was clicked; start the cinematic if on the path
    pub fn on_final_character_triggered(&mut self) {
        if self.state != DirectorState::Path {
            warn!(
                "final character triggered in {:?}, cinematic needs the path camera",
                self.state
            );
            return;
        }

        let run = self.cinematic.start();
        self.state = DirectorState::Cinematic;
        self.pose = self.cinematic.script().first_segment().start();
        self.emit(DirectorEvent::started(run));
    }

    fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Scroll { delta } => self.on_scroll(delta),
            InputEvent::SelectMode { mode } => self.on_select_mode(mode),
            InputEvent::InteractionOpened { character } => {
                self.interactions.opened(&character);
                if let Some(index) = self.scroll.clear_stuck() {
                    self.emit(DirectorEvent::StuckCleared { checkpoint: index });
                }
            }
            InputEvent::InteractionClosed { character } => {
                if self.interactions.closed(&character) {
                    self.on_character_interaction_complete(&character);
                }
            }
            InputEvent::FinalCharacterTriggered => self.on_final_character_triggered(),
            InputEvent::ChestOpened => {
                if self.interactions.open_chest() {
                    debug!("chest opened");
                    self.emit(DirectorEvent::FinalPromptRevealed);
                }
            }
            InputEvent::BeginCredits { run } => self.on_begin_credits(run),
        }
    }

    fn on_scroll(&mut self, delta: ScrollDelta) {
        if self.state != DirectorState::Path {
            trace!("scroll ignored in {:?}", self.state);
            return;
        }

        match self.scroll.on_scroll_delta(delta, &self.checkpoints) {
            ScrollOutcome::Pinned {
                checkpoint,
                newly_stuck: true,
            } => self.emit(DirectorEvent::StuckAtCheckpoint { checkpoint }),
            ScrollOutcome::Released { checkpoint } => {
                self.emit(DirectorEvent::StuckCleared { checkpoint })
            }
            _ => {}
        }
    }

    fn on_select_mode(&mut self, mode: CameraMode) {
        self.mode = mode;

        match self.state {
            DirectorState::Credits => {
                trace!("mode {} recorded, credits keep the camera", mode);
                return;
            }
            DirectorState::Cinematic => {
                if let Some(run) = self.cinematic.abandon() {
                    let completed = DirectorEvent::completed(run);
                    self.events.retain(|e| *e != completed);
                    self.emit(DirectorEvent::abandoned(run));
                }
            }
            DirectorState::Free | DirectorState::Path => {
                if self.state == DirectorState::from(mode) {
                    return;
                }
            }
        }

        self.state = mode.into();
        debug!("camera mode now {}", mode);
        self.emit(DirectorEvent::ModeChanged { mode });
    }

    fn on_begin_credits(&mut self, run: u64) {
        if self.cinematic.run().map(|r| r.0) != Some(run) {
            trace!("stale credits request for run#{} dropped", run);
            return;
        }

        let ready = self.state == DirectorState::Cinematic && self.cinematic.state().finished;
        if !ready {
            warn!("credits requested in {:?} before the cinematic finished", self.state);
            return;
        }

        self.state = DirectorState::Credits;
        debug!("credits started");
        self.emit(DirectorEvent::CreditsStarted);
    }

    fn emit(&mut self, event: DirectorEvent) {
        debug!("event: {}", event);
        self.events.push(event);
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Apply queued input, then compute this frame's pose
    ///
    /// Returns `None` in free mode, where the host owns the camera.
    pub fn update(&mut self, dt: f32) -> Option<CameraTransform> {
        while let Some(event) = self.inputs.pop_front() {
            self.apply(event);
        }

        match self.state {
            DirectorState::Free => return None,
            DirectorState::Path => {
                self.pose = self.path.advance(self.scroll.state_mut(), dt);
            }
            DirectorState::Cinematic => {
                let frame = self.cinematic.tick(dt);
                if let Some(run) = frame.completed {
                    self.emit(DirectorEvent::completed(run));
                }
                self.pose = frame.transform();
            }
            DirectorState::Credits => {
                self.pose = self.credits.step(&self.pose, dt);
            }
        }

        Some(self.pose)
    }

    /// [`update`](Self::update) and hand the pose to `sink`
    pub fn frame(&mut self, dt: f32, sink: &mut impl CameraSink) -> Option<CameraTransform> {
        let pose = self.update(dt)?;
        sink.write_pose(&pose);
        Some(pose)
    }
}
