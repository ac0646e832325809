//! Locomotion animation layer.
//!
//! The controller only ever talks to an [`AnimationBlend`]. [`ClipBlender`] is the
//! engine-agnostic implementation: it tracks weight, local time and fade ramps per clip
//! so a renderer can mirror them onto its own animation player.

use std::{fmt, str::FromStr};

use crate::error::SetupError;

/// Locomotion clips the controller selects between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Idle,
    Walk,
    Run,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Idle, Action::Walk, Action::Run];

    /// Clip name as authored in the character asset.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Idle => "Idle",
            Action::Walk => "Walk",
            Action::Run => "Run",
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, Action::Walk | Action::Run)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or(())
    }
}

/// Operations the controller issues against the animation layer.
pub trait AnimationBlend {
    /// Start playing a clip at its current weight.
    fn play(&mut self, action: Action);
    /// Rewind a clip to its start and cancel any fade on it.
    fn reset(&mut self, action: Action);
    /// Ramp a clip's weight from zero to one over `duration` seconds.
    fn fade_in(&mut self, action: Action, duration: f32);
    /// Ramp a clip's weight to zero over `duration` seconds, then stop it.
    fn fade_out(&mut self, action: Action, duration: f32);
    /// Advance every playing clip and every fade by `dt` seconds.
    fn advance(&mut self, dt: f32);
}

/// One value per [`Action`]. Construction guarantees every action is present.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipSet<T> {
    idle: T,
    walk: T,
    run: T,
}

impl<T> ClipSet<T> {
    pub fn new(idle: T, walk: T, run: T) -> Self {
        Self { idle, walk, run }
    }

    /// Collect clips by their authored names.
    ///
    /// Names that are not a locomotion action (a bind pose, for instance) are skipped.
    /// Fails if any action has no clip.
    pub fn from_named<S: AsRef<str>>(
        clips: impl IntoIterator<Item = (S, T)>,
    ) -> Result<Self, SetupError> {
        let (mut idle, mut walk, mut run) = (None, None, None);
        for (name, clip) in clips {
            match name.as_ref().parse::<Action>() {
                Ok(Action::Idle) => idle = Some(clip),
                Ok(Action::Walk) => walk = Some(clip),
                Ok(Action::Run) => run = Some(clip),
                Err(()) => log::debug!("ignoring non-locomotion clip `{}`", name.as_ref()),
            }
        }

        Ok(Self {
            idle: idle.ok_or(SetupError::MissingClip(Action::Idle))?,
            walk: walk.ok_or(SetupError::MissingClip(Action::Walk))?,
            run: run.ok_or(SetupError::MissingClip(Action::Run))?,
        })
    }

    pub fn get(&self, action: Action) -> &T {
        match action {
            Action::Idle => &self.idle,
            Action::Walk => &self.walk,
            Action::Run => &self.run,
        }
    }

    pub fn get_mut(&mut self, action: Action) -> &mut T {
        match action {
            Action::Idle => &mut self.idle,
            Action::Walk => &mut self.walk,
            Action::Run => &mut self.run,
        }
    }

    /// Convert each clip, in Idle, Walk, Run order.
    pub fn map<U>(&self, mut f: impl FnMut(Action, &T) -> U) -> ClipSet<U> {
        let idle = f(Action::Idle, &self.idle);
        let walk = f(Action::Walk, &self.walk);
        let run = f(Action::Run, &self.run);
        ClipSet { idle, walk, run }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl Fade {
    fn weight(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Playback state of a single clip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipState {
    pub playing: bool,
    pub weight: f32,
    /// Local clip time in seconds since the last reset.
    pub time: f32,
    /// Bumped by every reset, so a player can restart its copy of the clip exactly.
    pub restarts: u32,
    fade: Option<Fade>,
}

impl Default for ClipState {
    fn default() -> Self {
        Self {
            playing: false,
            weight: 1.0,
            time: 0.0,
            restarts: 0,
            fade: None,
        }
    }
}

impl ClipState {
    fn start_fade(&mut self, to: f32, duration: f32) {
        self.fade = Some(Fade {
            from: self.weight,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
        });
    }
}

/// Reference cross-fade mixer over the three locomotion clips.
#[derive(Clone, Debug, Default)]
pub struct ClipBlender {
    clips: ClipSet<ClipState>,
}

impl<T: Default> Default for ClipSet<T> {
    fn default() -> Self {
        Self::new(T::default(), T::default(), T::default())
    }
}

impl ClipBlender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clip(&self, action: Action) -> &ClipState {
        self.clips.get(action)
    }

    /// Effective blend weight; zero for clips that are not playing.
    pub fn weight(&self, action: Action) -> f32 {
        let clip = self.clips.get(action);
        if clip.playing { clip.weight } else { 0.0 }
    }

}

impl AnimationBlend for ClipBlender {
    fn play(&mut self, action: Action) {
        self.clips.get_mut(action).playing = true;
    }

    fn reset(&mut self, action: Action) {
        let clip = self.clips.get_mut(action);
        clip.time = 0.0;
        clip.restarts = clip.restarts.wrapping_add(1);
        clip.fade = None;
    }

    fn fade_in(&mut self, action: Action, duration: f32) {
        let clip = self.clips.get_mut(action);
        clip.weight = 0.0;
        clip.start_fade(1.0, duration);
    }

    fn fade_out(&mut self, action: Action, duration: f32) {
        self.clips.get_mut(action).start_fade(0.0, duration);
    }

    fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        for action in Action::ALL {
            let clip = self.clips.get_mut(action);
            if !clip.playing {
                continue;
            }
            clip.time += dt;

            let Some(mut fade) = clip.fade else {
                continue;
            };
            fade.elapsed += dt;
            clip.weight = fade.weight();
            if fade.finished() {
                clip.fade = None;
                if fade.to <= 0.0 {
                    clip.playing = false;
                }
            } else {
                clip.fade = Some(fade);
            }
        }
    }
}
