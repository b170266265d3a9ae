/// 运动掩码模块
/// Motion mask extraction and morphology
pub mod morphology;
pub mod motion;

pub use morphology::{dilate, erode, morph_open};
pub use motion::create_motion_mask;

use crate::error::MaskError;

/// 二值掩码: width×height, 行优先, 左上角为原点, 每像素一个字节 (0 或 1)
#[derive(Clone, PartialEq, Eq, Default)]
pub struct BinaryMask {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for BinaryMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("foreground", &self.count_foreground())
            .finish()
    }
}

impl BinaryMask {
    /// 创建全零掩码
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize],
            width,
            height,
        }
    }

    /// 从已有缓冲区创建, 校验长度与取值
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self, MaskError> {
        if data.len() != width as usize * height as usize {
            return Err(MaskError::LengthMismatch {
                width,
                height,
                len: data.len(),
            });
        }
        if let Some((index, &value)) = data.iter().enumerate().find(|(_, &v)| v > 1) {
            return Err(MaskError::InvalidValue { index, value });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// 内部构造: 调用方保证不变量
    pub(crate) fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 读取像素, 越界返回0
    pub fn get(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return 0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// 写入像素
    ///
    /// 前置条件: `x < width` 且 `y < height`, 越界时panic (与 `get` 不同).
    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        assert!(
            x < self.width && y < self.height,
            "mask pixel ({}, {}) out of bounds {}x{}",
            x,
            y,
            self.width,
            self.height
        );
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = on as u8;
    }

    /// 前景像素数
    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }
}
