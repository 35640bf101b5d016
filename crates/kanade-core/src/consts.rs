/// Default sampling window width in pixels.
pub const DEFAULT_WINDOW_WIDTH: usize = 5;

/// Default sampling window height in pixels.
pub const DEFAULT_WINDOW_HEIGHT: usize = 5;

/// Default step between successive window placements along each axis.
pub const DEFAULT_SHIFT: usize = 2;

/// Smallest window side for which a forward difference exists.
pub const MIN_WINDOW_EXTENT: usize = 2;

/// Default factor frames are shrunk by before differentiation.
pub const DEFAULT_DOWNSCALE_FACTOR: f32 = 2.5;

/// Upper end of the displayable byte range.
pub const DISPLAY_MAX: f64 = 255.0;

/// Output value used by the mid-gray degenerate-field policy.
pub const MID_GRAY: u8 = 128;

/// Minimum grid cell count (rows*cols) to split the field loop across Rayon workers.
pub const PARALLEL_CELL_THRESHOLD: usize = 4_096;

/// Default width of raw frames read from the default device stream.
pub const DEFAULT_DEVICE_WIDTH: usize = 640;

/// Default height of raw frames read from the default device stream.
pub const DEFAULT_DEVICE_HEIGHT: usize = 480;

/// Largest raw stream frame accepted, in bytes (256 MiB).
pub const MAX_RAW_FRAME_BYTES: usize = 1 << 28;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// File extensions accepted when reading a directory as an image sequence.
pub const IMAGE_SEQUENCE_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "pgm"];

/// File extensions treated as raw 8-bit grayscale streams.
pub const RAW_STREAM_EXTENSIONS: &[&str] = &["raw", "gray"];
