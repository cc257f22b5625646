use crate::shared::frame::Frame;

pub type Rgb = [u8; 3];

/// Source-over blend of `color` into the RGB part of one pixel.
pub fn blend_pixel(px: &mut [u8], color: Rgb, alpha: f64) {
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    for c in 0..3 {
        let v = px[c] as f64 * (1.0 - alpha) + color[c] as f64 * alpha;
        px[c] = v.round().clamp(0.0, 255.0) as u8;
    }
}

pub fn lerp_rgb(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 3];
    for c in 0..3 {
        out[c] = (from[c] as f64 + (to[c] as f64 - from[c] as f64) * t).round() as u8;
    }
    out
}

/// Fills the axis-aligned ellipse centred on `(cx, cy)`.
///
/// `shade` maps the normalised distance from the centre (0 at the centre,
/// 1 on the rim) to the colour and opacity painted there. Pixels are
/// sampled at their centres and the ellipse is clipped to the frame.
pub fn fill_ellipse<F>(frame: &mut Frame, cx: f64, cy: f64, rx: f64, ry: f64, shade: F)
where
    F: Fn(f64) -> (Rgb, f64),
{
    if !(rx > 0.0 && ry > 0.0) {
        return;
    }
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let channels = frame.channels() as usize;
    if width == 0 || height == 0 || channels < 3 {
        return;
    }

    let x0 = (cx - rx).floor().max(0.0) as usize;
    let y0 = (cy - ry).floor().max(0.0) as usize;
    let x1 = ((cx + rx).ceil().max(0.0) as usize).min(width);
    let y1 = ((cy + ry).ceil().max(0.0) as usize).min(height);

    let data = frame.data_mut();
    for y in y0..y1 {
        let dy = (y as f64 + 0.5 - cy) / ry;
        for x in x0..x1 {
            let dx = (x as f64 + 0.5 - cx) / rx;
            let d2 = dx * dx + dy * dy;
            if d2 > 1.0 {
                continue;
            }
            let (color, alpha) = shade(d2.sqrt());
            let offset = (y * width + x) * channels;
            blend_pixel(&mut data[offset..offset + 3], color, alpha);
        }
    }
}

/// Paints every column with `color` at the opacity `alpha_at(column_centre)`.
pub fn shade_columns<F>(frame: &mut Frame, color: Rgb, alpha_at: F)
where
    F: Fn(f64) -> f64,
{
    let width = frame.width() as usize;
    let channels = frame.channels() as usize;
    if width == 0 || channels < 3 {
        return;
    }
    let alphas: Vec<f64> = (0..width).map(|x| alpha_at(x as f64 + 0.5)).collect();
    for (i, px) in frame.data_mut().chunks_exact_mut(channels).enumerate() {
        let alpha = alphas[i % width];
        if alpha > 0.0 {
            blend_pixel(&mut px[..3], color, alpha);
        }
    }
}
