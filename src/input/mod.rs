/// 帧输入 (Frame Sources)
///
/// 调度器每个tick向输入源拉取当前帧; 输入源自行决定暂停/结束状态.
/// - FrameSequence: 内存帧序列 (测试/演示用), 可循环
pub mod sequence;

pub use sequence::FrameSequence;

use image::RgbaImage;

/// 可被调度器拉取的视频帧来源
pub trait FrameSource {
    /// 源分辨率, 元数据未就绪时宽度为0
    fn dimensions(&self) -> (u32, u32);

    fn is_paused(&self) -> bool;

    fn is_ended(&self) -> bool;

    /// 当前帧; 没有可用帧时返回None
    fn current_frame(&mut self) -> Option<&RgbaImage>;
}
