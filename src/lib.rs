// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 实时运动斑块追踪引擎
//!
//! 帧差 → 形态学开运算 → 连通域标记 + Marching Squares轮廓
//! 后端: CPU (默认) / GPU (feature = "gpu", wgpu)
pub mod backend; // 运动掩码后端
pub mod blob; // 连通域标记
pub mod config; // 参数配置
pub mod contour; // 轮廓提取
pub mod error; // 错误类型
pub mod input; // 帧输入
pub mod mask; // 二值掩码与形态学
pub mod pipeline; // 单帧处理流水线
pub mod scheduler; // 帧调度
pub mod utils; // 工具

pub use crate::backend::{Backend, CpuMotionBackend, MotionBackend};
#[cfg(feature = "gpu")]
pub use crate::backend::GpuMotionBackend;
pub use crate::blob::{label_connected_components, Blob, BoundingBox};
pub use crate::config::{BlobConfig, SharedConfig};
pub use crate::contour::{extract_contours, Contour, Point};
pub use crate::error::{BlobError, ConfigError, MaskError};
#[cfg(feature = "gpu")]
pub use crate::error::GpuError;
pub use crate::input::{FrameSequence, FrameSource};
pub use crate::mask::{create_motion_mask, dilate, erode, morph_open, BinaryMask};
pub use crate::pipeline::{analyze_mask, process_frame, FrameResult, ProcessOptions};
pub use crate::scheduler::{
    compute_layout, FrameOutput, FrameScheduler, Layout, SkipReason, TickOutcome,
};
