//! 显示布局 (letterbox): 逻辑分辨率坐标 → 显示坐标
use crate::blob::BoundingBox;

/// 源高度未知时的宽高比
const FALLBACK_ASPECT: f64 = 16.0 / 9.0;

/// 逻辑分辨率坐标到显示坐标的变换
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub display_width: f32,
    pub display_height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Layout {
    /// 逻辑坐标点映射到显示坐标
    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.offset_x + x * self.scale_x, self.offset_y + y * self.scale_y)
    }

    /// 包围框映射到显示坐标 (x, y, w, h)
    pub fn map_rect(&self, bbox: &BoundingBox) -> (f32, f32, f32, f32) {
        let (x, y) = self.map_point(bbox.x as f32, bbox.y as f32);
        (x, y, bbox.w as f32 * self.scale_x, bbox.h as f32 * self.scale_y)
    }
}

/// 计算letterbox布局
///
/// 源比例更宽时适配宽度, 否则适配高度; 居中, 保持比例, 不裁剪.
pub fn compute_layout(
    src_w: u32,
    src_h: u32,
    display_w: u32,
    display_h: u32,
    logical_w: u32,
    logical_h: u32,
) -> Layout {
    let (dw, dh) = (display_w as f64, display_h as f64);
    let src_aspect = if src_h == 0 {
        FALLBACK_ASPECT
    } else {
        src_w as f64 / src_h as f64
    };
    let display_aspect = if dh == 0.0 { f64::INFINITY } else { dw / dh };

    let (draw_w, draw_h, offset_x, offset_y) = if src_aspect > display_aspect {
        let draw_h = dw / src_aspect;
        (dw, draw_h, 0.0, (dh - draw_h) / 2.0)
    } else {
        let draw_w = dh * src_aspect;
        (draw_w, dh, (dw - draw_w) / 2.0, 0.0)
    };

    Layout {
        display_width: display_w as f32,
        display_height: display_h as f32,
        offset_x: offset_x as f32,
        offset_y: offset_y as f32,
        scale_x: (draw_w / logical_w.max(1) as f64) as f32,
        scale_y: (draw_h / logical_h.max(1) as f64) as f32,
    }
}

/// 逻辑分辨率: 高度取配置, 宽度按源比例推算, 无法推算时回退16:9
pub fn logical_size(src_w: u32, src_h: u32, logical_height: u32) -> (u32, u32) {
    let h = logical_height.max(1);
    let fallback = (h as f64 * FALLBACK_ASPECT).round() as u32;
    if src_h == 0 {
        return (fallback, h);
    }
    let w = (h as f64 * src_w as f64 / src_h as f64).round() as u32;
    (if w == 0 { fallback } else { w }, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_wide_source_fits_width() {
        // 16:9 源 → 800x800 显示
        let l = compute_layout(1280, 720, 800, 800, 213, 120);
        assert!(approx(l.offset_x, 0.0));
        assert!(approx(l.offset_y, 175.0));
        assert!(approx(l.scale_x, 800.0 / 213.0));
        assert!(approx(l.scale_y, 450.0 / 120.0));
        assert!(approx(l.display_width, 800.0));
    }

    #[test]
    fn test_tall_source_fits_height() {
        // 4:3 源 → 1600x600 显示
        let l = compute_layout(640, 480, 1600, 600, 160, 120);
        assert!(approx(l.offset_x, 400.0));
        assert!(approx(l.offset_y, 0.0));
        assert!(approx(l.scale_x, 5.0));
        assert!(approx(l.scale_y, 5.0));
    }

    #[test]
    fn test_equal_aspect_fills_display() {
        let l = compute_layout(320, 180, 640, 360, 32, 18);
        assert!(approx(l.offset_x, 0.0));
        assert!(approx(l.offset_y, 0.0));
        assert_eq!(l.map_point(32.0, 18.0), (640.0, 360.0));
    }

    #[test]
    fn test_map_rect() {
        let l = compute_layout(640, 480, 1600, 600, 160, 120);
        let rect = l.map_rect(&BoundingBox { x: 10, y: 20, w: 4, h: 2 });
        assert_eq!(rect, (450.0, 100.0, 20.0, 10.0));
    }

    #[test]
    fn test_logical_size() {
        assert_eq!(logical_size(1280, 720, 120), (213, 120));
        assert_eq!(logical_size(640, 480, 120), (160, 120));
        assert_eq!(logical_size(640, 0, 90), (160, 90));
        assert_eq!(logical_size(1, 10_000, 120), (213, 120));
    }
}
