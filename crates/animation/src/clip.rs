use glam::{Quat, Vec3};

/// How values between two keyframes are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    Linear,
    /// Only the value keys are kept; sampled like `Linear`.
    CubicSpline,
}

/// Keyframe values for one animated property.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackValues {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

impl TrackValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Translation(v) | Self::Scale(v) => v.len(),
            Self::Rotation(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single sampled property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Translation(Vec3),
    Rotation(Quat),
    Scale(Vec3),
}

/// Keyframes driving one property of one joint.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub target_joint: usize,
    pub interpolation: Interpolation,
    pub times: Vec<f32>,
    pub values: TrackValues,
}

impl Track {
    /// Sample the track at `time` seconds. Times outside the keyframe range
    /// clamp to the first/last key.
    pub fn sample(&self, time: f32) -> Option<Sample> {
        let count = self.times.len().min(self.values.len());
        if count == 0 {
            return None;
        }

        let next = self.times[..count].partition_point(|&k| k <= time);
        let (i, j, alpha) = if next == 0 {
            (0, 0, 0.0)
        } else if next >= count {
            (count - 1, count - 1, 0.0)
        } else {
            let (t0, t1) = (self.times[next - 1], self.times[next]);
            let span = t1 - t0;
            let alpha = if span > f32::EPSILON {
                (time - t0) / span
            } else {
                0.0
            };
            (next - 1, next, alpha)
        };

        let alpha = match self.interpolation {
            Interpolation::Step => 0.0,
            Interpolation::Linear | Interpolation::CubicSpline => alpha,
        };

        Some(match &self.values {
            TrackValues::Translation(v) => Sample::Translation(v[i].lerp(v[j], alpha)),
            TrackValues::Scale(v) => Sample::Scale(v[i].lerp(v[j], alpha)),
            TrackValues::Rotation(v) => Sample::Rotation(v[i].slerp(v[j], alpha).normalize()),
        })
    }

    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }
}

/// A named, reusable set of tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Build a clip whose duration is the end time of its longest track.
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks.iter().map(Track::end_time).fold(0.0, f32::max);
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    pub fn find_by_name<'a>(clips: &'a [AnimationClip], name: &str) -> Option<&'a AnimationClip> {
        clips.iter().find(|c| c.name == name)
    }
}
