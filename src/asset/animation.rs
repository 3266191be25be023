//! Keyframe animation clips and playback
//!
//! Every clip found in the asset starts playing the moment the model is
//! attached and loops indefinitely. Channels target node TRS components;
//! sampling interpolates linearly (slerp for rotations) or steps,
//! depending on the clip's sampler.

use cgmath::{InnerSpace, Quaternion, Vector3, VectorSpace};

use crate::asset::model::NodeData;

/// Keyframe interpolation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
}

/// Sampled output values of one channel
#[derive(Debug, Clone)]
pub enum ChannelValues {
    Translation(Vec<Vector3<f32>>),
    Rotation(Vec<Quaternion<f32>>),
    Scale(Vec<Vector3<f32>>),
}

/// One animation channel: a keyframe track bound to one node property
#[derive(Debug, Clone)]
pub struct AnimationChannel {
    pub node: usize,
    pub times: Vec<f32>,
    pub values: ChannelValues,
    pub interpolation: Interpolation,
}

impl AnimationChannel {
    /// Writes the sampled value at `time` into the target node
    pub fn apply(&self, time: f32, nodes: &mut [NodeData]) {
        let Some(node) = nodes.get_mut(self.node) else {
            return;
        };

        match &self.values {
            ChannelValues::Translation(values) => {
                node.translation = sample_vec3(&self.times, values, time, self.interpolation);
            }
            ChannelValues::Rotation(values) => {
                node.rotation = sample_quat(&self.times, values, time, self.interpolation);
            }
            ChannelValues::Scale(values) => {
                node.scale = sample_vec3(&self.times, values, time, self.interpolation);
            }
        }
    }

    fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }
}

/// One named animation clip
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub channels: Vec<AnimationChannel>,
}

/// Playback state for every clip of one asset.
///
/// All clips play immediately and loop; there is no per-clip control
/// surface because the card never pauses or seeks.
pub struct AnimationPlayer {
    times: Vec<f32>,
}

impl AnimationPlayer {
    /// Starts playback of every clip. An empty clip set is a valid no-op;
    /// the frame loop still runs and renders a static model.
    pub fn attach(clips: &[AnimationClip]) -> Self {
        Self {
            times: vec![0.0; clips.len()],
        }
    }

    pub fn is_idle(&self) -> bool {
        self.times.is_empty()
    }

    /// Playback position of a clip, for tests and diagnostics
    pub fn clip_time(&self, clip: usize) -> Option<f32> {
        self.times.get(clip).copied()
    }

    /// Advances every clip by `delta` seconds (looping) and writes the
    /// sampled values into the node hierarchy.
    pub fn advance(&mut self, delta: f32, clips: &[AnimationClip], nodes: &mut [NodeData]) {
        for (time, clip) in self.times.iter_mut().zip(clips) {
            if clip.duration <= 0.0 {
                continue;
            }

            *time = (*time + delta) % clip.duration;
            for channel in &clip.channels {
                channel.apply(*time, nodes);
            }
        }
    }
}

/// Extracts every supported animation clip from the document.
///
/// Morph-target weight channels are skipped; cubic-spline samplers are
/// reduced to their keyframe values and played back linearly.
pub fn clips_from_gltf(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Vec<AnimationClip> {
    document
        .animations()
        .map(|animation| {
            let name = animation
                .name()
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("clip_{}", animation.index()));

            let mut channels = Vec::new();
            for channel in animation.channels() {
                let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));

                let Some(inputs) = reader.read_inputs() else {
                    continue;
                };
                let times: Vec<f32> = inputs.collect();
                if times.is_empty() {
                    continue;
                }

                let sampler_interpolation = channel.sampler().interpolation();
                let cubic = sampler_interpolation == gltf::animation::Interpolation::CubicSpline;
                let interpolation = match sampler_interpolation {
                    gltf::animation::Interpolation::Step => Interpolation::Step,
                    _ => Interpolation::Linear,
                };

                let values = match reader.read_outputs() {
                    Some(gltf::animation::util::ReadOutputs::Translations(outputs)) => {
                        ChannelValues::Translation(spline_values(
                            outputs.map(Vector3::from).collect(),
                            cubic,
                        ))
                    }
                    Some(gltf::animation::util::ReadOutputs::Rotations(outputs)) => {
                        ChannelValues::Rotation(spline_values(
                            outputs
                                .into_f32()
                                .map(|[x, y, z, w]| Quaternion::new(w, x, y, z))
                                .collect(),
                            cubic,
                        ))
                    }
                    Some(gltf::animation::util::ReadOutputs::Scales(outputs)) => {
                        ChannelValues::Scale(spline_values(
                            outputs.map(Vector3::from).collect(),
                            cubic,
                        ))
                    }
                    _ => {
                        log::debug!("skipping unsupported animation channel in clip '{}'", name);
                        continue;
                    }
                };

                channels.push(truncate_channel(AnimationChannel {
                    node: channel.target().node().index(),
                    times,
                    values,
                    interpolation,
                }));
            }

            let duration = channels
                .iter()
                .map(AnimationChannel::end_time)
                .fold(0.0f32, f32::max);

            AnimationClip {
                name,
                duration,
                channels,
            }
        })
        .collect()
}

/// Cubic-spline samplers store in-tangent, value, out-tangent triplets;
/// keep the values and let linear interpolation approximate the curve.
fn spline_values<T: Copy>(values: Vec<T>, cubic: bool) -> Vec<T> {
    if cubic {
        values.chunks(3).filter_map(|chunk| chunk.get(1)).copied().collect()
    } else {
        values
    }
}

/// Clamps times and values to their common length so sampling can index
/// freely
fn truncate_channel(mut channel: AnimationChannel) -> AnimationChannel {
    let len = match &channel.values {
        ChannelValues::Translation(v) => v.len(),
        ChannelValues::Rotation(v) => v.len(),
        ChannelValues::Scale(v) => v.len(),
    }
    .min(channel.times.len());

    channel.times.truncate(len);
    match &mut channel.values {
        ChannelValues::Translation(v) => v.truncate(len),
        ChannelValues::Rotation(v) => v.truncate(len),
        ChannelValues::Scale(v) => v.truncate(len),
    }
    channel
}

/// Finds the keyframe segment containing `t` and the blend factor inside
/// it. Clamps to the first and last keyframes outside the track's range.
fn segment(times: &[f32], t: f32) -> (usize, usize, f32) {
    if times.is_empty() {
        return (0, 0, 0.0);
    }
    if t <= times[0] {
        return (0, 0, 0.0);
    }
    let last = times.len() - 1;
    if t >= times[last] {
        return (last, last, 0.0);
    }

    let next = times.partition_point(|&time| time <= t);
    let prev = next - 1;
    let span = times[next] - times[prev];
    let blend = if span > 0.0 {
        (t - times[prev]) / span
    } else {
        0.0
    };
    (prev, next, blend)
}

fn sample_vec3(
    times: &[f32],
    values: &[Vector3<f32>],
    t: f32,
    interpolation: Interpolation,
) -> Vector3<f32> {
    let (prev, next, blend) = segment(times, t);
    match interpolation {
        Interpolation::Step => values[prev],
        Interpolation::Linear => values[prev].lerp(values[next], blend),
    }
}

fn sample_quat(
    times: &[f32],
    values: &[Quaternion<f32>],
    t: f32,
    interpolation: Interpolation,
) -> Quaternion<f32> {
    let (prev, next, blend) = segment(times, t);
    if interpolation == Interpolation::Step || prev == next {
        return values[prev];
    }

    // Take the short way around the 4D sphere
    let a = values[prev];
    let mut b = values[next];
    if a.dot(b) < 0.0 {
        b = -b;
    }
    a.slerp(b, blend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Rad;

    fn test_node() -> NodeData {
        NodeData {
            parent: None,
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            primitives: vec![],
        }
    }

    fn translation_clip() -> AnimationClip {
        AnimationClip {
            name: "move".to_string(),
            duration: 2.0,
            channels: vec![AnimationChannel {
                node: 0,
                times: vec![0.0, 1.0, 2.0],
                values: ChannelValues::Translation(vec![
                    Vector3::new(0.0, 0.0, 0.0),
                    Vector3::new(1.0, 0.0, 0.0),
                    Vector3::new(1.0, 1.0, 0.0),
                ]),
                interpolation: Interpolation::Linear,
            }],
        }
    }

    #[test]
    fn test_empty_clip_set_is_noop() {
        let mut player = AnimationPlayer::attach(&[]);
        assert!(player.is_idle());

        let mut nodes = vec![test_node()];
        player.advance(0.016, &[], &mut nodes);
        assert_eq!(nodes[0].translation, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_linear_sampling_between_keyframes() {
        let clips = vec![translation_clip()];
        let mut player = AnimationPlayer::attach(&clips);
        let mut nodes = vec![test_node()];

        player.advance(0.5, &clips, &mut nodes);
        assert!((nodes[0].translation.x - 0.5).abs() < 1e-6);
        assert!(nodes[0].translation.y.abs() < 1e-6);
    }

    #[test]
    fn test_playback_loops_at_duration() {
        let clips = vec![translation_clip()];
        let mut player = AnimationPlayer::attach(&clips);
        let mut nodes = vec![test_node()];

        player.advance(2.5, &clips, &mut nodes);
        assert!((player.clip_time(0).unwrap() - 0.5).abs() < 1e-6);
        assert!((nodes[0].translation.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sampling_clamps_outside_track() {
        let channel = AnimationChannel {
            node: 0,
            times: vec![1.0, 2.0],
            values: ChannelValues::Translation(vec![
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(2.0, 0.0, 0.0),
            ]),
            interpolation: Interpolation::Linear,
        };
        let mut nodes = vec![test_node()];

        channel.apply(0.0, &mut nodes);
        assert!((nodes[0].translation.x - 1.0).abs() < 1e-6);

        channel.apply(5.0, &mut nodes);
        assert!((nodes[0].translation.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_step_interpolation_holds_previous_key() {
        let channel = AnimationChannel {
            node: 0,
            times: vec![0.0, 1.0],
            values: ChannelValues::Translation(vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
            ]),
            interpolation: Interpolation::Step,
        };
        let mut nodes = vec![test_node()];

        channel.apply(0.9, &mut nodes);
        assert!(nodes[0].translation.x.abs() < 1e-6);
    }

    #[test]
    fn test_rotation_slerp_midpoint() {
        let start = Quaternion::new(1.0, 0.0, 0.0, 0.0);
        let end = Quaternion::from(cgmath::Matrix3::from_angle_y(Rad(
            std::f32::consts::FRAC_PI_2,
        )));
        let channel = AnimationChannel {
            node: 0,
            times: vec![0.0, 1.0],
            values: ChannelValues::Rotation(vec![start, end]),
            interpolation: Interpolation::Linear,
        };
        let mut nodes = vec![test_node()];

        channel.apply(0.5, &mut nodes);

        // Midpoint is a 45 degree rotation about Y: +X maps to
        // (sqrt(2)/2, 0, -sqrt(2)/2)
        let m = nodes[0].local_matrix();
        let mapped = m * Vector3::new(1.0, 0.0, 0.0).extend(1.0);
        let expected = std::f32::consts::FRAC_1_SQRT_2;
        assert!((mapped.x - expected).abs() < 1e-5);
        assert!((mapped.z + expected).abs() < 1e-5);
    }

    #[test]
    fn test_channel_targeting_missing_node_is_ignored() {
        let channel = AnimationChannel {
            node: 7,
            times: vec![0.0],
            values: ChannelValues::Translation(vec![Vector3::new(1.0, 0.0, 0.0)]),
            interpolation: Interpolation::Linear,
        };
        let mut nodes = vec![test_node()];
        channel.apply(0.0, &mut nodes);
        assert_eq!(nodes[0].translation, Vector3::new(0.0, 0.0, 0.0));
    }
}
