//! sRGB <-> CIE L*a*b* (D65) conversion.
//!
//! The `*_8bit` helpers use the common 8-bit scaling: `L` in `0..=255` (`L* * 255 / 100`) and
//! `a`/`b` offset by 128, so a neutral pixel sits at `a = b = 128`.

/// CIE L*a*b* color, unscaled (`l` in `0..=100`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

// D65 reference white.
const XN: f32 = 0.950_456;
const YN: f32 = 1.0;
const ZN: f32 = 1.088_754;

const EPSILON: f32 = 216.0 / 24389.0;
const KAPPA: f32 = 24389.0 / 27.0;

pub fn srgb_to_lab(rgb: [u8; 3]) -> Lab {
    let r = srgb_to_linear(rgb[0]);
    let g = srgb_to_linear(rgb[1]);
    let b = srgb_to_linear(rgb[2]);

    let x = 0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b;
    let y = 0.212_672_9 * r + 0.715_152_2 * g + 0.072_175 * b;
    let z = 0.019_333_9 * r + 0.119_192 * g + 0.950_304_1 * b;

    let fx = lab_f(x / XN);
    let fy = lab_f(y / YN);
    let fz = lab_f(z / ZN);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Inverse of [`srgb_to_lab`]; out-of-gamut results are clamped.
pub fn lab_to_srgb(lab: Lab) -> [u8; 3] {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;

    let x = XN * lab_f_inv(fx);
    let y = YN * lab_f_inv(fy);
    let z = ZN * lab_f_inv(fz);

    let r = 3.240_454_2 * x - 1.537_138_5 * y - 0.498_531_4 * z;
    let g = -0.969_266 * x + 1.876_010_8 * y + 0.041_556 * z;
    let b = 0.055_643_4 * x - 0.204_025_9 * y + 1.057_225_2 * z;

    [linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b)]
}

/// [`srgb_to_lab`] in 8-bit scaling, as `[L, a, b]` floats.
pub fn srgb_to_lab_8bit(rgb: [u8; 3]) -> [f32; 3] {
    let lab = srgb_to_lab(rgb);
    [lab.l * 255.0 / 100.0, lab.a + 128.0, lab.b + 128.0]
}

/// Inverse of [`srgb_to_lab_8bit`].
pub fn lab_8bit_to_srgb(lab: [f32; 3]) -> [u8; 3] {
    lab_to_srgb(Lab {
        l: lab[0] * 100.0 / 255.0,
        a: lab[1] - 128.0,
        b: lab[2] - 128.0,
    })
}

fn srgb_to_linear(v: u8) -> f32 {
    let c = f32::from(v) / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> u8 {
    let c = c.clamp(0.0, 1.0);
    let v = if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

fn lab_f_inv(f: f32) -> f32 {
    let f3 = f * f * f;
    if f3 > EPSILON {
        f3
    } else {
        (116.0 * f - 16.0) / KAPPA
    }
}
