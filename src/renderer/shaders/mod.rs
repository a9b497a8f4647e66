//! GLSL ES 3.00 sources of the built-in programs.

/// Scene vertex shader: `a_position`, `a_uv`, `a_normal`.
pub const MAIN_VERTEX: &str = include_str!("main.vert.glsl");

/// Scene fragment shader writing color (0), bloom threshold (1) and pick
/// id (2).
pub const MAIN_FRAGMENT: &str = include_str!("main.frag.glsl");

/// Full-screen quad shared by every post pass.
pub const QUAD_VERTEX: &str = include_str!("quad.vert.glsl");

/// Copies `tex` to the target.
pub const QUAD_FRAGMENT: &str = include_str!("quad.frag.glsl");

/// Additive `scene + blur * u_strength`.
pub const BLEND_FRAGMENT: &str = include_str!("blend.frag.glsl");

const BLUR_TEMPLATE: &str = include_str!("blur.frag.glsl");

/// Separable 9-tap Gaussian: center weight followed by the four one-sided
/// offsets. `w[0] + 2 * (w[1] + .. + w[4]) == 1`.
pub const BLUR_WEIGHTS: [f32; 5] = [0.227_027_03, 0.194_594_6, 0.121_621_62, 0.054_054_055, 0.016_216_217];

/// The blur fragment shader with [`BLUR_WEIGHTS`] baked in.
#[must_use]
pub fn blur_fragment() -> String {
    let weights = BLUR_WEIGHTS
        .iter()
        .map(|w| format!("{w:.10}"))
        .collect::<Vec<_>>()
        .join(", ");
    BLUR_TEMPLATE.replace("BLUR_WEIGHTS", &weights)
}
