//! Per-pixel colour adjustments with CSS filter semantics.
//!
//! Each step clamps to `[0, 255]` before the next one, as chained CSS
//! filter functions do.

const LUMA: [f64; 3] = [0.213, 0.715, 0.072];

/// Applies `brightness`, `saturate` and `contrast` in that order to the RGB
/// part of every pixel; extra channels are left untouched.
pub fn apply_color_filter(
    data: &mut [u8],
    channels: usize,
    brightness: f64,
    saturation: f64,
    contrast: f64,
) {
    if channels < 3 || is_identity(brightness, saturation, contrast) {
        return;
    }
    let matrix = saturation_matrix(saturation);

    for px in data.chunks_exact_mut(channels) {
        let mut rgb = [px[0] as f64, px[1] as f64, px[2] as f64];

        for v in &mut rgb {
            *v = (*v * brightness).clamp(0.0, 255.0);
        }

        let [r, g, b] = rgb;
        for (i, row) in matrix.iter().enumerate() {
            rgb[i] = (row[0] * r + row[1] * g + row[2] * b).clamp(0.0, 255.0);
        }

        for (i, v) in rgb.iter().enumerate() {
            px[i] = ((v - 127.5) * contrast + 127.5).round().clamp(0.0, 255.0) as u8;
        }
    }
}

fn is_identity(brightness: f64, saturation: f64, contrast: f64) -> bool {
    const EPS: f64 = 1e-9;
    (brightness - 1.0).abs() < EPS && (saturation - 1.0).abs() < EPS && (contrast - 1.0).abs() < EPS
}

/// The `feColorMatrix type="saturate"` matrix.
fn saturation_matrix(s: f64) -> [[f64; 3]; 3] {
    let mut m = [[0.0; 3]; 3];
    for (i, row) in m.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = LUMA[j] * (1.0 - s) + if i == j { s } else { 0.0 };
        }
    }
    m
}
