//! Color space conversion shared by the presets and the renderer

/// sRGB byte -> linear float
pub fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear RGB of an sRGB byte triple
pub fn linear_rgb(r: u8, g: u8, b: u8) -> [f32; 3] {
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)]
}
