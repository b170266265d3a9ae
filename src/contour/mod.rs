/// 轮廓提取 (Marching Squares)
///
/// 在二值掩码上逐格行走, 输出有序折线
pub mod marching_squares;

pub use marching_squares::{extract_contours, MAX_TRACE_STEPS};

/// 亚像素点 (掩码坐标)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 一条边界折线
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
