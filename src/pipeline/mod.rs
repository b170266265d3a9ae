/// 帧处理流水线 (Frame Processing Pipeline)
///
/// 运动掩码 → 开运算 → {连通域标记, 轮廓提取}
use image::RgbaImage;

use crate::blob::{label_connected_components, Blob};
use crate::contour::{extract_contours, Contour};
use crate::mask::{create_motion_mask, morph_open, BinaryMask};

/// 默认差分阈值 (0-255)
pub const DEFAULT_THRESHOLD: u8 = 30;
/// 默认最小斑块面积 (像素)
pub const DEFAULT_MIN_BLOB_AREA: usize = 15;

/// 单帧处理参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessOptions {
    pub threshold: u8,
    pub min_blob_area: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_blob_area: DEFAULT_MIN_BLOB_AREA,
        }
    }
}

/// 单帧处理结果快照
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameResult {
    pub mask: BinaryMask,
    pub blobs: Vec<Blob>,
    pub contours: Vec<Contour>,
}

/// 对两帧连续图像运行完整CPU流水线
///
/// 前置条件: 两帧尺寸一致.
pub fn process_frame(
    current: &RgbaImage,
    previous: &RgbaImage,
    options: &ProcessOptions,
) -> FrameResult {
    let mask = morph_open(&create_motion_mask(current, previous, options.threshold));
    analyze_mask(mask, options.min_blob_area)
}

/// 仅对已有掩码做标记与轮廓提取 (GPU路径产出的掩码走这里)
pub fn analyze_mask(mask: BinaryMask, min_blob_area: usize) -> FrameResult {
    let contours = extract_contours(&mask);
    let blobs = label_connected_components(&mask, min_blob_area);
    FrameResult {
        mask,
        blobs,
        contours,
    }
}
