//! Card configuration
//!
//! Everything the embedding program supplies to a preview card: the model
//! path, the display texts, and the presentation profile. The config is
//! plain data; validation of the model path is the loader's job.

use cgmath::{Rad, Vector3};

/// Default normalization target: the model's largest dimension after
/// normalization, in world units.
pub const DEFAULT_TARGET_SIZE: f32 = 1.5;

/// Camera presentation profile for the card.
///
/// Two profiles exist: a straight-on front view with no model tilt, and an
/// elevated three-quarter view with a small fixed tilt. The profile is
/// chosen by configuration, never derived from asset content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraProfile {
    /// Front-facing camera at the model's height, no tilt
    #[default]
    Front,
    /// Elevated camera looking down at a three-quarter angle, with a
    /// small presentation tilt applied to the model
    ThreeQuarter,
}

impl CameraProfile {
    /// Camera eye position for this profile
    pub fn eye(&self) -> Vector3<f32> {
        match self {
            CameraProfile::Front => Vector3::new(0.0, 0.0, 4.0),
            CameraProfile::ThreeQuarter => Vector3::new(2.4, 1.9, 3.1),
        }
    }

    /// Fixed rotational tilt applied to the normalized model
    pub fn tilt(&self) -> Rad<f32> {
        match self {
            CameraProfile::Front => Rad(0.0),
            CameraProfile::ThreeQuarter => Rad(-0.18),
        }
    }
}

/// Configuration for one preview card
#[derive(Debug, Clone)]
pub struct CardConfig {
    /// Path to the glTF/GLB model file
    pub model_path: String,
    /// Title shown on the card
    pub title: String,
    /// Description shown under the title
    pub description: String,
    /// Largest model dimension after normalization
    pub target_size: f32,
    /// Presentation profile
    pub camera: CameraProfile,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            model_path: "assets/model.glb".to_string(),
            title: "Model preview".to_string(),
            description: String::new(),
            target_size: DEFAULT_TARGET_SIZE,
            camera: CameraProfile::default(),
        }
    }
}

impl CardConfig {
    /// Creates a config for the given model path with default presentation
    pub fn new(model_path: impl Into<String>) -> Self {
        Self {
            model_path: model_path.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: set the card title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder pattern: set the card description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder pattern: set the normalization target size
    pub fn with_target_size(mut self, target_size: f32) -> Self {
        self.target_size = target_size;
        self
    }

    /// Builder pattern: set the camera profile
    pub fn with_camera(mut self, camera: CameraProfile) -> Self {
        self.camera = camera;
        self
    }
}
