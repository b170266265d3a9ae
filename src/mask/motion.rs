//! 帧差分运动掩码
use image::RgbaImage;

use super::BinaryMask;

/// 通过两帧RGB最大通道差生成运动掩码
///
/// 像素三个通道绝对差的最大值严格大于 `threshold` 时置1, Alpha通道忽略.
///
/// 前置条件: 两帧尺寸必须一致 (由调用方保证). release构建下以较短缓冲区为界.
pub fn create_motion_mask(current: &RgbaImage, previous: &RgbaImage, threshold: u8) -> BinaryMask {
    debug_assert_eq!(
        current.dimensions(),
        previous.dimensions(),
        "motion mask frames differ in size"
    );

    let (width, height) = current.dimensions();
    let mut mask = vec![0u8; width as usize * height as usize];

    let cd = current.as_raw().chunks_exact(4);
    let pd = previous.as_raw().chunks_exact(4);
    for ((c, p), out) in cd.zip(pd).zip(mask.iter_mut()) {
        let dr = c[0].abs_diff(p[0]);
        let dg = c[1].abs_diff(p[1]);
        let db = c[2].abs_diff(p[2]);
        if dr.max(dg).max(db) > threshold {
            *out = 1;
        }
    }

    BinaryMask::from_raw(width, height, mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_threshold_is_strict() {
        let prev = RgbaImage::from_pixel(2, 1, Rgba([10, 10, 10, 255]));
        let mut cur = prev.clone();
        cur.put_pixel(0, 0, Rgba([40, 10, 10, 255])); // diff == 30
        cur.put_pixel(1, 0, Rgba([10, 10, 41, 255])); // diff == 31

        let mask = create_motion_mask(&cur, &prev, 30);
        assert_eq!(mask.data(), &[0, 1]);
    }

    #[test]
    fn test_alpha_ignored() {
        let prev = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 0]));
        let cur = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
        assert!(create_motion_mask(&cur, &prev, 0).is_empty());
    }

    #[test]
    fn test_max_channel_wins() {
        let prev = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 255]));
        let cur = RgbaImage::from_pixel(1, 1, Rgba([190, 160, 45, 255]));
        assert_eq!(create_motion_mask(&cur, &prev, 59).data(), &[1]);
        assert_eq!(create_motion_mask(&cur, &prev, 60).data(), &[0]);
    }
}
