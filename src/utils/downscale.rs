/// 帧缩放到逻辑分辨率
/// 使用 fast_image_resize 高性能库, 复用内部缓冲区
use fast_image_resize as fr;
use image::RgbaImage;

use crate::error::BlobError;

/// RGBA帧缩放器
pub struct Downscaler {
    resizer: fr::Resizer,
    options: fr::ResizeOptions,
}

impl Default for Downscaler {
    fn default() -> Self {
        Self::new()
    }
}

impl Downscaler {
    pub fn new() -> Self {
        Self {
            resizer: fr::Resizer::new(),
            // 双线性插值 (固定2x2采样, 不随缩放比例扩大核)
            // 与GPU纹理线性采样一致, CPU/GPU掩码才能对齐
            options: fr::ResizeOptions::new()
                .resize_alg(fr::ResizeAlg::Interpolation(fr::FilterType::Bilinear)),
        }
    }

    /// 缩放到 (width, height); 尺寸一致时直接复制
    pub fn downscale(
        &mut self,
        frame: &RgbaImage,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, BlobError> {
        if frame.dimensions() == (width, height) {
            return Ok(frame.clone());
        }

        let src_image = fr::images::ImageRef::new(
            frame.width(),
            frame.height(),
            frame.as_raw(),
            fr::PixelType::U8x4,
        )
        .map_err(|e| BlobError::FrameBuffer(e.to_string()))?;

        let mut dst_image = fr::images::Image::new(width, height, fr::PixelType::U8x4);

        self.resizer
            .resize(&src_image, &mut dst_image, &self.options)
            .map_err(|e| BlobError::Resize(e.to_string()))?;

        RgbaImage::from_raw(width, height, dst_image.into_vec())
            .ok_or_else(|| BlobError::FrameBuffer("resized buffer size mismatch".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_same_size_is_copy() {
        let frame = RgbaImage::from_pixel(8, 6, Rgba([1, 2, 3, 255]));
        let out = Downscaler::new().downscale(&frame, 8, 6).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn test_uniform_frame_stays_uniform() {
        let frame = RgbaImage::from_pixel(64, 48, Rgba([90, 120, 30, 255]));
        let out = Downscaler::new().downscale(&frame, 16, 12).unwrap();
        assert_eq!(out.dimensions(), (16, 12));
        for p in out.pixels() {
            assert_eq!(p.0, [90, 120, 30, 255]);
        }
    }

    #[test]
    fn test_aligned_block_edges_stay_sharp() {
        // 4倍缩小, 方块边界对齐到4像素: 每个输出像素只采样块内或块外
        let mut frame = RgbaImage::from_pixel(64, 64, Rgba([10, 10, 10, 255]));
        for y in 16..48 {
            for x in 16..48 {
                frame.put_pixel(x, y, Rgba([250, 250, 250, 255]));
            }
        }
        let out = Downscaler::new().downscale(&frame, 16, 16).unwrap();
        for (x, y, p) in out.enumerate_pixels() {
            let inside = (4..12).contains(&x) && (4..12).contains(&y);
            let expected = if inside { 250 } else { 10 };
            assert_eq!(p.0[0], expected, "pixel ({}, {})", x, y);
        }
    }
}
