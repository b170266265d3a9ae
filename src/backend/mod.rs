/// 运动掩码后端 (Motion Backends)
///
/// - Cpu: 缩放 + 帧差 + 开运算, 纯内存实现
/// - Gpu: wgpu 渲染管线实现差分与形态学, 回读为掩码 (feature = "gpu")
///
/// 后端在会话开始时选择一次, 之后以枚举值持有, 不做逐帧动态分派.
pub mod cpu;
#[cfg(feature = "gpu")]
pub mod gpu;

pub use cpu::CpuMotionBackend;
#[cfg(feature = "gpu")]
pub use gpu::GpuMotionBackend;

use image::RgbaImage;

use crate::mask::BinaryMask;

/// 帧 → 运动掩码 能力接口
pub trait MotionBackend {
    /// 后端名称 (日志/统计)
    fn name(&self) -> &'static str;

    /// 逻辑分辨率 (掩码尺寸)
    fn logical_size(&self) -> (u32, u32);

    /// 修改逻辑分辨率
    fn resize(&mut self, width: u32, height: u32);

    /// 处理一帧; 尚无可发布结果时返回None
    fn process(&mut self, frame: &RgbaImage, threshold: u8) -> Option<BinaryMask>;

    /// 释放资源, 重复调用无副作用
    fn dispose(&mut self);
}

/// 会话持有的后端
pub enum Backend {
    #[cfg(feature = "gpu")]
    Gpu(GpuMotionBackend),
    Cpu(CpuMotionBackend),
}

impl Backend {
    /// 选择后端: 优先GPU, 不可用时回退CPU
    pub fn select(width: u32, height: u32, prefer_gpu: bool) -> Self {
        #[cfg(feature = "gpu")]
        {
            if prefer_gpu {
                if let Some(gpu) = GpuMotionBackend::new(width, height) {
                    log::info!("🚀 使用GPU后端 ({}x{})", width, height);
                    return Backend::Gpu(gpu);
                }
                log::warn!("⚠️  GPU不可用, 回退CPU后端");
            }
        }
        #[cfg(not(feature = "gpu"))]
        {
            if prefer_gpu {
                log::debug!("未启用gpu功能, 使用CPU后端");
            }
        }

        log::info!("🖥️  使用CPU后端 ({}x{})", width, height);
        Backend::Cpu(CpuMotionBackend::new(width, height))
    }

    pub fn is_gpu(&self) -> bool {
        match self {
            #[cfg(feature = "gpu")]
            Backend::Gpu(_) => true,
            Backend::Cpu(_) => false,
        }
    }
}

impl MotionBackend for Backend {
    fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "gpu")]
            Backend::Gpu(b) => b.name(),
            Backend::Cpu(b) => b.name(),
        }
    }

    fn logical_size(&self) -> (u32, u32) {
        match self {
            #[cfg(feature = "gpu")]
            Backend::Gpu(b) => b.logical_size(),
            Backend::Cpu(b) => b.logical_size(),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        match self {
            #[cfg(feature = "gpu")]
            Backend::Gpu(b) => MotionBackend::resize(b, width, height),
            Backend::Cpu(b) => MotionBackend::resize(b, width, height),
        }
    }

    fn process(&mut self, frame: &RgbaImage, threshold: u8) -> Option<BinaryMask> {
        match self {
            #[cfg(feature = "gpu")]
            Backend::Gpu(b) => MotionBackend::process(b, frame, threshold),
            Backend::Cpu(b) => MotionBackend::process(b, frame, threshold),
        }
    }

    fn dispose(&mut self) {
        match self {
            #[cfg(feature = "gpu")]
            Backend::Gpu(b) => MotionBackend::dispose(b),
            Backend::Cpu(b) => MotionBackend::dispose(b),
        }
    }
}
