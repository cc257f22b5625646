/// Precompute a normalised 1D Gaussian kernel for the given sigma.
///
/// The kernel spans `±ceil(3σ)` taps. Returns `[1.0]` for non-positive sigma.
pub fn gaussian_kernel_for_sigma(sigma: f64) -> Vec<f32> {
    if !(sigma > 0.0) {
        return vec![1.0];
    }
    let half = (3.0 * sigma).ceil() as isize;
    let mut kernel: Vec<f64> = (-half..=half)
        .map(|i| {
            let x = i as f64;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel.iter().map(|&v| v as f32).collect()
}

/// Separable Gaussian blur over an interleaved buffer, reusing `temp`.
///
/// Edge pixels are replicated. Only the first `blur_channels` channels of
/// each pixel are filtered, so an alpha channel can be left untouched.
pub fn separable_gaussian_blur(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    blur_channels: usize,
    kernel: &[f32],
    temp: &mut Vec<f32>,
) {
    let kernel_size = kernel.len();
    if kernel_size <= 1 || width == 0 || height == 0 {
        return;
    }
    let half = kernel_size / 2;
    let blur_channels = blur_channels.min(channels);

    temp.resize(width * height * channels, 0.0);

    // Horizontal pass: data → temp
    for y in 0..height {
        for x in 0..width {
            for c in 0..blur_channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sx = (x as isize + k as isize - half as isize).clamp(0, width as isize - 1)
                        as usize;
                    sum += data[(y * width + sx) * channels + c] as f32 * w;
                }
                temp[(y * width + x) * channels + c] = sum;
            }
        }
    }

    // Vertical pass: temp → data
    for y in 0..height {
        for x in 0..width {
            for c in 0..blur_channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sy = (y as isize + k as isize - half as isize)
                        .clamp(0, height as isize - 1) as usize;
                    sum += temp[(sy * width + x) * channels + c] * w;
                }
                data[(y * width + x) * channels + c] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_sums_to_one() {
        let k = gaussian_kernel_for_sigma(1.5);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_kernel_width_follows_sigma() {
        assert_eq!(gaussian_kernel_for_sigma(0.4).len(), 5);
        assert_eq!(gaussian_kernel_for_sigma(2.0).len(), 13);
    }

    #[test]
    fn test_kernel_is_symmetric_with_peak_in_centre() {
        let k = gaussian_kernel_for_sigma(1.0);
        let mid = k.len() / 2;
        for i in 0..mid {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-6);
            assert!(k[mid] >= k[i]);
        }
    }

    #[test]
    fn test_zero_sigma_is_identity_kernel() {
        assert_eq!(gaussian_kernel_for_sigma(0.0), vec![1.0]);
        assert_eq!(gaussian_kernel_for_sigma(f64::NAN), vec![1.0]);
    }

    #[test]
    fn test_blur_uniform_image_unchanged() {
        let mut data = vec![128u8; 10 * 10 * 3];
        let mut temp = Vec::new();
        separable_gaussian_blur(&mut data, 10, 10, 3, 3, &gaussian_kernel_for_sigma(1.0), &mut temp);
        assert!(data.iter().all(|&v| (v as i32 - 128).abs() <= 1));
    }

    #[test]
    fn test_blur_spreads_bright_pixel() {
        let mut data = vec![0u8; 10 * 10 * 3];
        let centre = (5 * 10 + 5) * 3;
        data[centre..centre + 3].copy_from_slice(&[255, 255, 255]);
        let mut temp = Vec::new();
        separable_gaussian_blur(&mut data, 10, 10, 3, 3, &gaussian_kernel_for_sigma(1.0), &mut temp);
        assert!(data[centre] < 255);
        assert!(data[(5 * 10 + 6) * 3] > 0);
    }

    #[test]
    fn test_alpha_channel_untouched() {
        let mut data = vec![0u8; 6 * 6 * 4];
        for (i, px) in data.chunks_mut(4).enumerate() {
            px[0] = if i % 2 == 0 { 255 } else { 0 };
            px[3] = i as u8;
        }
        let mut temp = Vec::new();
        separable_gaussian_blur(&mut data, 6, 6, 4, 3, &gaussian_kernel_for_sigma(1.0), &mut temp);
        for (i, px) in data.chunks(4).enumerate() {
            assert_eq!(px[3], i as u8);
        }
    }
}
