//! CPU后端: 缩放到逻辑分辨率, 与上一帧做差分并开运算
use image::RgbaImage;

use super::MotionBackend;
use crate::mask::{create_motion_mask, morph_open, BinaryMask};
use crate::utils::downscale::Downscaler;

/// 纯内存运动掩码后端, 持有上一帧逻辑分辨率缓冲
pub struct CpuMotionBackend {
    width: u32,
    height: u32,
    downscaler: Downscaler,
    previous: Option<RgbaImage>,
}

impl CpuMotionBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            downscaler: Downscaler::new(),
            previous: None,
        }
    }

    /// 是否已有上一帧
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

impl MotionBackend for CpuMotionBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn logical_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 尺寸变化后上一帧失效
    fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.previous = None;
        }
    }

    fn process(&mut self, frame: &RgbaImage, threshold: u8) -> Option<BinaryMask> {
        let current = match self.downscaler.downscale(frame, self.width, self.height) {
            Ok(img) => img,
            Err(e) => {
                log::warn!("⚠️  帧缩放失败, 跳过本帧: {}", e);
                return None;
            }
        };

        let mask = self
            .previous
            .as_ref()
            .map(|prev| morph_open(&create_motion_mask(&current, prev, threshold)));
        self.previous = Some(current);
        mask
    }

    fn dispose(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn frame(w: u32, h: u32, block: Option<(u32, u32, u32)>) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(w, h, Rgba([10, 10, 10, 255]));
        if let Some((x0, y0, size)) = block {
            for y in y0..y0 + size {
                for x in x0..x0 + size {
                    img.put_pixel(x, y, Rgba([250, 250, 250, 255]));
                }
            }
        }
        img
    }

    #[test]
    fn test_first_frame_warms_up() {
        let mut backend = CpuMotionBackend::new(20, 20);
        assert!(backend.process(&frame(20, 20, None), 30).is_none());
        assert!(backend.has_previous());

        let mask = backend.process(&frame(20, 20, Some((5, 5, 6))), 30).unwrap();
        assert_eq!((mask.width(), mask.height()), (20, 20));
        assert_eq!(mask.count_foreground(), 32);
    }

    #[test]
    fn test_previous_frame_updated_every_pass() {
        let mut backend = CpuMotionBackend::new(20, 20);
        let moved = frame(20, 20, Some((5, 5, 6)));
        backend.process(&frame(20, 20, None), 30);
        backend.process(&moved, 30);
        // 与自身相同, 无运动
        let mask = backend.process(&moved, 30).unwrap();
        assert!(mask.is_empty());
    }

    #[test]
    fn test_downscales_to_logical_size() {
        let mut backend = CpuMotionBackend::new(32, 18);
        backend.process(&frame(128, 72, None), 30);
        let mask = backend.process(&frame(128, 72, Some((40, 20, 32))), 30).unwrap();
        assert_eq!((mask.width(), mask.height()), (32, 18));
        assert!(mask.count_foreground() > 0);
    }

    #[test]
    fn test_resize_drops_previous() {
        let mut backend = CpuMotionBackend::new(20, 20);
        backend.process(&frame(20, 20, None), 30);
        backend.resize(10, 10);
        assert!(!backend.has_previous());
        assert_eq!(backend.logical_size(), (10, 10));
        assert!(backend.process(&frame(20, 20, None), 30).is_none());
    }
}
