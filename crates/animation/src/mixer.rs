use crate::clip::AnimationClip;
use crate::skeleton::{Pose, Skeleton};
use std::collections::HashMap;

/// Handle to an action owned by an [`AnimationMixer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(usize);

/// What happens when an action reaches the end of its clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Play once, then stop.
    Once,
    /// Wrap back to the start.
    #[default]
    Repeat,
}

/// Playback state of one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationAction {
    clip: usize,
    time: f32,
    weight: f32,
    time_scale: f32,
    running: bool,
    loop_mode: LoopMode,
}

impl AnimationAction {
    fn new(clip: usize) -> Self {
        Self {
            clip,
            time: 0.0,
            weight: 1.0,
            time_scale: 1.0,
            running: false,
            loop_mode: LoopMode::default(),
        }
    }

    pub fn play(&mut self) -> &mut Self {
        self.running = true;
        self
    }

    /// Disable the action and rewind it.
    pub fn stop(&mut self) -> &mut Self {
        self.running = false;
        self.time = 0.0;
        self
    }

    pub fn set_weight(&mut self, weight: f32) -> &mut Self {
        self.weight = weight.max(0.0);
        self
    }

    pub fn set_time_scale(&mut self, scale: f32) -> &mut Self {
        self.time_scale = scale;
        self
    }

    pub fn set_loop(&mut self, mode: LoopMode) -> &mut Self {
        self.loop_mode = mode;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    fn advance(&mut self, delta: f32, duration: f32) {
        if !self.running {
            return;
        }
        self.time += delta * self.time_scale;
        if duration <= 0.0 {
            self.time = 0.0;
            return;
        }
        match self.loop_mode {
            LoopMode::Repeat => self.time = self.time.rem_euclid(duration),
            LoopMode::Once => {
                if self.time >= duration || self.time < 0.0 {
                    self.time = self.time.clamp(0.0, duration);
                    self.running = false;
                }
            }
        }
    }
}

/// Plays animation clips against a skeleton.
///
/// Actions are created lazily, one per clip, and cached for the lifetime of
/// the mixer.
#[derive(Debug, Clone, Default)]
pub struct AnimationMixer {
    clips: Vec<AnimationClip>,
    actions: Vec<AnimationAction>,
    by_clip: HashMap<usize, ActionId>,
    time: f32,
}

impl AnimationMixer {
    pub fn new(clips: Vec<AnimationClip>) -> Self {
        Self {
            clips,
            ..Self::default()
        }
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn clip_names(&self) -> Vec<&str> {
        self.clips.iter().map(|c| c.name.as_str()).collect()
    }

    /// Global mixer time in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Return the action for the named clip, creating it on first use.
    pub fn clip_action(&mut self, clip_name: &str) -> Option<ActionId> {
        let clip = self.clips.iter().position(|c| c.name == clip_name)?;
        if let Some(id) = self.by_clip.get(&clip) {
            return Some(*id);
        }
        let id = ActionId(self.actions.len());
        self.actions.push(AnimationAction::new(clip));
        self.by_clip.insert(clip, id);
        Some(id)
    }

    pub fn action(&self, id: ActionId) -> Option<&AnimationAction> {
        self.actions.get(id.0)
    }

    pub fn action_mut(&mut self, id: ActionId) -> Option<&mut AnimationAction> {
        self.actions.get_mut(id.0)
    }

    /// Stop every clip, creating actions for clips that have none yet.
    pub fn stop_all_actions(&mut self) {
        let names: Vec<String> = self.clips.iter().map(|c| c.name.clone()).collect();
        for name in names {
            if let Some(action) = self.clip_action(&name).and_then(|id| self.action_mut(id)) {
                action.stop();
            }
        }
    }

    pub fn active_clip_names(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|a| a.running)
            .map(|a| self.clips[a.clip].name.as_str())
            .collect()
    }

    /// Advance every running action by `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        self.time += delta;
        for action in &mut self.actions {
            let duration = self.clips[action.clip].duration;
            action.advance(delta, duration);
        }
    }

    /// Sample all running actions over the rest pose of `skeleton`.
    pub fn pose(&self, skeleton: &Skeleton) -> Pose {
        let mut pose = Pose::rest(skeleton);
        let mut accumulated = 0.0;
        for action in self.actions.iter().filter(|a| a.running && a.weight > 0.0) {
            accumulated += action.weight;
            let t = action.weight / accumulated;
            for track in &self.clips[action.clip].tracks {
                if let Some(sample) = track.sample(action.time) {
                    pose.blend(track.target_joint, sample, t);
                }
            }
        }
        pose
    }
}
