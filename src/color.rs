//! Named RGB colors with channels in `0.0..=1.0`.

pub type Color = [f32; 3];

pub const BLACK: Color = [0.0, 0.0, 0.0];
pub const WHITE: Color = [1.0, 1.0, 1.0];
pub const GRAY: Color = [0.5, 0.5, 0.5];
pub const RED: Color = [1.0, 0.0, 0.0];
pub const GREEN: Color = [0.0, 1.0, 0.0];
pub const BLUE: Color = [0.0, 0.0, 1.0];
pub const YELLOW: Color = [1.0, 1.0, 0.0];
pub const CYAN: Color = [0.0, 1.0, 1.0];
pub const MAGENTA: Color = [1.0, 0.0, 1.0];
pub const ORANGE: Color = [1.0, 0.5, 0.0];
