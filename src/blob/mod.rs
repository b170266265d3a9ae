/// 连通域标记 (Connected Component Labeling)
///
/// 4邻域广度优先填充, 输出超过最小面积的斑块
pub mod labeler;

pub use labeler::label_connected_components;

/// 轴对齐包围盒 (掩码坐标)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl BoundingBox {
    /// 点是否落在包围盒内
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

/// 斑块: 每帧重新计算, 无跨帧身份
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub id: usize, // 输出顺序编号, 跨帧不稳定
    pub bounding_box: BoundingBox,
    pub centroid: (f32, f32),
    pub area: usize, // 像素数
}
