//! Numeric helpers shared by the estimation and retargeting logic.

/// Linear interpolation between `a` and `b`.
///
/// `t` should be in [0, 1] where 0 returns `a` and 1 returns `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
