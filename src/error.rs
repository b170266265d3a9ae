//! 错误类型定义

use thiserror::Error;

/// 二值掩码构造错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskError {
    #[error("mask buffer length {len} does not match {width}x{height}")]
    LengthMismatch { width: u32, height: u32, len: usize },
    #[error("mask value {value} at index {index} is not 0 or 1")]
    InvalidValue { index: usize, value: u8 },
}

/// 帧处理错误 (CPU路径)
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("frame buffer error: {0}")]
    FrameBuffer(String),
    #[error("resize error: {0}")]
    Resize(String),
}

/// GPU后端初始化/执行错误
#[cfg(feature = "gpu")]
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("shader validation failed: {0}")]
    Shader(String),
    #[error("frame size {width}x{height} not supported by device")]
    FrameSize { width: u32, height: u32 },
    #[error("readback failed: {0}")]
    Readback(String),
}

/// 配置文件错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
