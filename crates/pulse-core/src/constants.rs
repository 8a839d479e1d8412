// Shared tuning constants for the deformation rig. Hosts read these too, so
// keep them free of platform types.

// Band analysis (Hz upper edges, exclusive)
pub const BASS_UPPER_HZ: f32 = 90.0;
pub const MID_UPPER_HZ: f32 = 2000.0;
pub const HIGH_UPPER_HZ: f32 = 8000.0;

// Per-bucket energy weighting
pub const BASS_WEIGHT: f32 = 1.5; // slight low-end emphasis
pub const MID_WEIGHT: f32 = 1.0;
pub const HIGH_WEIGHT: f32 = 0.8; // tame the top end

// Band ratio is multiplied by this before clamping to 1
pub const BAND_GAIN: f32 = 3.0;

// Byte waveform midpoint (unsigned 8-bit PCM centre)
pub const WAVEFORM_MIDPOINT: f32 = 128.0;

// Envelope follower
pub const IMPACT_THRESHOLD: f32 = 0.13;
pub const IMPACT_LEVEL: f32 = 0.8;
pub const IMPACT_COOLDOWN: f32 = 0.1;
pub const COOLDOWN_STEP_PER_TICK: f32 = 0.01;
// Reference render rate the per-tick step was tuned at
pub const REFERENCE_TICK_HZ: f32 = 60.0;
pub const IMPACT_AMP_GAIN: f32 = 10.0; // amp_factor = 1 + level * gain
// Cooldown residue below this counts as expired (absorbs f32 drift)
pub const COOLDOWN_EPSILON: f32 = 1e-5;

// Element record layout
pub const CHANNELS_PER_ELEMENT: usize = 6;
pub const CENTER_COMPONENTS: usize = 3;
pub const DIAGONAL_CHANNELS: [usize; 3] = [0, 3, 5];

// Deformation shaping
pub const NOISE_PHASE_PER_CHANNEL: f64 = 0.2;
pub const NOISE_DEPTH: f64 = 0.4;
pub const BUBBLE_WAVE_FREQ_RATIO: f64 = 0.6;
pub const BUBBLE_WAVE_SPEED_RATIO: f64 = 1.2;
pub const BUBBLE_NOISE_PHASE_PER_CHANNEL: f64 = 0.18;
pub const BUBBLE_NOISE_SPEED_RATIO: f64 = 1.3;
pub const BUBBLE_DEPTH: f64 = 0.08;

// Controller bytes
pub const STATUS_TYPE_MASK: u8 = 0xF0;
pub const STATUS_NOTE_OFF: u8 = 0x80;
pub const STATUS_NOTE_ON: u8 = 0x90;
pub const STATUS_CONTROL_CHANGE: u8 = 0xB0;
pub const CONTROLLER_MAX: f32 = 127.0;

// Keys-device notes that select effect modes (inclusive)
pub const MODE_NOTE_FIRST: u8 = 48;
pub const MODE_NOTE_LAST: u8 = 51;

// Stage controls
pub const STAGE_KEY_STEP: f32 = 0.1;
pub const CC_ANIMATION_SPEED: u8 = 7;
pub const CC_CAMERA_X: u8 = 19;
pub const CC_CAMERA_Y: u8 = 20;
pub const CC_CAMERA_Z: u8 = 21;
pub const CC_CAMERA_YAW: u8 = 22;
pub const CC_CAMERA_PITCH: u8 = 23;
pub const OFFSET_X_RANGE: (f32, f32) = (-2.0, 2.0);
pub const OFFSET_Y_RANGE: (f32, f32) = (-1.0, 2.0);
pub const OFFSET_Z_RANGE: (f32, f32) = (-2.0, 2.0);
pub const ANIMATION_SPEED_KEY_RANGE: (f32, f32) = (0.1, 3.0);
pub const ANIMATION_SPEED_CC_RANGE: (f32, f32) = (0.8, 3.0);

// Post effects
pub const POST_AUTO_INTERVAL_SEC: f32 = 2.0;

// Scene catalog
pub const MODEL_COUNT: usize = 9;
pub const ANIMATION_COUNT: usize = 14;
pub const PAD_SLOT_BASES: [u8; 4] = [36, 52, 68, 84];
pub const PAD_SLOT_WIDTH: u8 = 16;

// Monitor gain
pub const MONITOR_VOLUME_STEP: f32 = 0.1;

// Default RNG seed for random post-effect picks
pub const DEFAULT_SEED: u64 = 42;
