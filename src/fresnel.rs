// Schlick's approximation relative to vacuum, single-surface form: r0 is the
// plain (1 - n) / (1 + n) ratio, not its square.

#[inline]
pub fn reflectance(cos_theta: f32, ior: f32) -> f32 {
    let r0 = (1.0 - ior) / (1.0 + ior);
    let m = 1.0 - cos_theta.clamp(0.0, 1.0);
    r0 + (1.0 - r0) * m.powi(5)
}
