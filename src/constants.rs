use glam::Vec3;

// Tuning constants for the teaser page: camera, controls, lights, assets.

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 2.0, 5.0);

// Orbit controls
pub const CONTROLS_DAMPING_FACTOR: f32 = 0.05;
pub const CONTROLS_MIN_DISTANCE: f32 = 2.0;
pub const CONTROLS_MAX_DISTANCE: f32 = 10.0;
pub const CONTROLS_MIN_POLAR: f32 = 0.0;
pub const CONTROLS_MAX_POLAR: f32 = std::f32::consts::PI * 0.45;
pub const CONTROLS_ROTATE_SPEED: f32 = 1.0;
pub const CONTROLS_ZOOM_SPEED: f32 = 1.0;
pub const CONTROLS_PAN_SPEED: f32 = 1.0;
pub const ZOOM_STEP_BASE: f32 = 0.95; // per wheel notch, raised to zoom speed

// Model
pub const MODEL_ROTATION_STEP: f32 = 0.006; // radians per frame around Y

// Scene
pub const BACKGROUND_COLOR: [f32; 3] = [0.0, 0.0, 0.0];
pub const LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const AMBIENT_INTENSITY: f32 = 0.5;
pub const DIRECTIONAL_INTENSITY: f32 = 1.0;
pub const DIRECTIONAL_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);
pub const POINT_INTENSITY: f32 = 1.0;
pub const POINT_POSITION: Vec3 = Vec3::new(-5.0, 5.0, -5.0);
pub const POINT_DECAY: f32 = 2.0;
pub const MAX_POINT_LIGHTS: usize = 4;

// Directional shadow camera (orthographic box around the origin)
pub const SHADOW_MAP_SIZE: u32 = 512;
pub const SHADOW_EXTENT: f32 = 5.0;
pub const SHADOW_NEAR: f32 = 0.5;
pub const SHADOW_FAR: f32 = 500.0;

// Assets
pub const MODEL_SRC: &str = "/space_boi/scene.gltf";
pub const AUDIO_SRC: &str = "song.mp3";
pub const AUDIO_VOLUME: f64 = 0.5;

// DOM
pub const MOUNT_ID: &str = "scene-mount";
pub const BANNER_ID: &str = "status-banner";
pub const MUTE_BUTTON_ID: &str = "mute-toggle";

// User-visible strings
pub const MODEL_LOAD_ERROR: &str = "Failed to load 3D model";
pub const BANNER_LOADING_PREFIX: &str = "Loading...";
pub const BANNER_ERROR_PREFIX: &str = "Error:";
