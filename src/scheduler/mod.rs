/// 帧调度器 (Frame Scheduler)
///
/// 每个显示刷新tick执行一次处理:
/// 1. 读取配置快照
/// 2. 首次拿到源尺寸时选择后端 (只选一次)
/// 3. 计算letterbox布局
/// 4. 后端生成掩码 → 标记 + 轮廓 → 发布
///
/// 单线程协作模型: tick同步执行完毕后才重新计时, 不会重叠.
pub mod layout;

pub use layout::{compute_layout, logical_size, Layout};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::{Backend, MotionBackend};
use crate::config::SharedConfig;
use crate::input::FrameSource;
use crate::pipeline::{analyze_mask, FrameResult};

/// 单个tick的发布内容
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub result: FrameResult,
    pub layout: Layout,
}

/// 跳过处理的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 源尺寸未就绪或暂无帧
    NotReady,
    /// 源暂停或播放结束
    Paused,
    /// 调度器已关闭
    Stopped,
}

/// tick结果
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Skipped(SkipReason),
    /// 后端尚无上一帧, 本tick不发布
    Warming,
    Published(FrameOutput),
}

impl TickOutcome {
    pub fn output(&self) -> Option<&FrameOutput> {
        match self {
            TickOutcome::Published(output) => Some(output),
            _ => None,
        }
    }
}

/// 处理帧率统计
struct FpsCounter {
    count: u32,
    last: Instant,
    fps: f64,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            count: 0,
            last: Instant::now(),
            fps: 0.0,
        }
    }

    fn record(&mut self) {
        self.count += 1;
        let elapsed = self.last.elapsed();
        if elapsed.as_secs() >= 1 {
            self.fps = self.count as f64 / elapsed.as_secs_f64();
            self.count = 0;
            self.last = Instant::now();
            log::debug!("📊 处理FPS: {:.1}", self.fps);
        }
    }
}

pub struct FrameScheduler<S: FrameSource> {
    source: S,
    config: SharedConfig,
    backend: Option<Backend>,
    display_size: Option<(u32, u32)>,
    stats: FpsCounter,
    stopped: bool,
}

impl<S: FrameSource> FrameScheduler<S> {
    pub fn new(source: S, config: SharedConfig) -> Self {
        Self {
            source,
            config,
            backend: None,
            display_size: None,
            stats: FpsCounter::new(),
            stopped: false,
        }
    }

    /// 显示区域尺寸, 未设置时使用源尺寸
    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.display_size = Some((width, height));
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// 已选择的后端
    pub fn backend(&self) -> Option<&Backend> {
        self.backend.as_ref()
    }

    pub fn fps(&self) -> f64 {
        self.stats.fps
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// 执行一次tick
    pub fn tick(&mut self) -> TickOutcome {
        if self.stopped {
            return TickOutcome::Skipped(SkipReason::Stopped);
        }

        let config = self.config.snapshot();
        let (src_w, src_h) = self.source.dimensions();
        if src_w == 0 {
            return TickOutcome::Skipped(SkipReason::NotReady);
        }

        let backend = self.backend.get_or_insert_with(|| {
            let (lw, lh) = logical_size(src_w, src_h, config.logical_resolution);
            Backend::select(lw, lh, config.prefer_gpu)
        });

        if self.source.is_paused() || self.source.is_ended() {
            return TickOutcome::Skipped(SkipReason::Paused);
        }

        // 逻辑分辨率热更新: 只改尺寸, 不重新选择后端
        let (_, current_h) = backend.logical_size();
        if config.logical_resolution.max(1) != current_h {
            let (lw, lh) = logical_size(src_w, src_h, config.logical_resolution);
            log::info!("🔧 逻辑分辨率调整: {}x{}", lw, lh);
            backend.resize(lw, lh);
        }

        let (logical_w, logical_h) = backend.logical_size();
        let (display_w, display_h) = self.display_size.unwrap_or((src_w, src_h));
        let layout = compute_layout(src_w, src_h, display_w, display_h, logical_w, logical_h);

        let Some(frame) = self.source.current_frame() else {
            return TickOutcome::Skipped(SkipReason::NotReady);
        };
        let options = config.process_options();
        let mask = backend.process(frame, options.threshold);
        self.stats.record();

        match mask {
            Some(mask) => TickOutcome::Published(FrameOutput {
                result: analyze_mask(mask, options.min_blob_area),
                layout,
            }),
            None => TickOutcome::Warming,
        }
    }

    /// 按配置刷新率循环tick, 直到stop置位或调度器关闭
    ///
    /// 刷新率每轮重新读取; 处理耗时超过周期时立即进入下一轮.
    pub fn run<F>(&mut self, mut on_frame: F, stop: Arc<AtomicBool>)
    where
        F: FnMut(&FrameOutput),
    {
        log::info!("🚀 调度循环启动");
        while !self.stopped && !stop.load(Ordering::Relaxed) {
            let started = Instant::now();

            if let TickOutcome::Published(output) = self.tick() {
                on_frame(&output);
            }

            let period = frame_period(self.config.snapshot().refresh_hz);
            if let Some(remaining) = period.checked_sub(started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
        log::info!("⏹️  调度循环结束");
    }

    /// 停止tick并释放后端资源
    pub fn shutdown(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Some(backend) = self.backend.as_mut() {
            backend.dispose();
        }
        log::info!("🛑 调度器已关闭");
    }
}

impl<S: FrameSource> Drop for FrameScheduler<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn frame_period(refresh_hz: f64) -> Duration {
    let hz = if refresh_hz.is_finite() && refresh_hz > 0.0 {
        refresh_hz
    } else {
        60.0
    };
    Duration::from_secs_f64(1.0 / hz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlobConfig;
    use crate::input::FrameSequence;
    use image::{Rgba, RgbaImage};

    fn cpu_config() -> SharedConfig {
        SharedConfig::new(BlobConfig {
            logical_resolution: 20,
            prefer_gpu: false,
            min_blob_area: 4,
            refresh_hz: 1000.0,
            ..Default::default()
        })
    }

    /// 20x20 帧, 方块左上角在 (x, 5)
    fn square_frame(x: u32) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        for yy in 5..11 {
            for xx in x..x + 6 {
                img.put_pixel(xx, yy, Rgba([255, 255, 255, 255]));
            }
        }
        img
    }

    fn moving_square(n: u32) -> FrameSequence {
        FrameSequence::new((0..n).map(|i| square_frame(2 + i * 3)).collect())
    }

    #[test]
    fn test_first_tick_warms_second_publishes() {
        let mut scheduler = FrameScheduler::new(moving_square(3), cpu_config());

        assert_eq!(scheduler.tick(), TickOutcome::Warming);
        let outcome = scheduler.tick();
        let output = outcome.output().expect("second tick publishes");
        assert_eq!(output.result.mask.width(), 20);
        assert!(!output.result.blobs.is_empty());
        assert!(!output.result.contours.is_empty());
        // 源与显示同尺寸, 恒等变换
        assert_eq!(output.layout.map_point(3.0, 4.0), (3.0, 4.0));
    }

    #[test]
    fn test_not_ready_source_skips() {
        let mut scheduler = FrameScheduler::new(FrameSequence::default(), cpu_config());
        assert_eq!(scheduler.tick(), TickOutcome::Skipped(SkipReason::NotReady));
        assert!(scheduler.backend().is_none());
    }

    #[test]
    fn test_paused_source_skips_but_keeps_ticking() {
        let mut scheduler = FrameScheduler::new(moving_square(3), cpu_config());
        scheduler.source_mut().pause();
        for _ in 0..3 {
            assert_eq!(scheduler.tick(), TickOutcome::Skipped(SkipReason::Paused));
        }
        // 后端已选, 帧未被消费
        assert!(scheduler.backend().is_some());
        assert_eq!(scheduler.source().position(), 0);

        scheduler.source_mut().play();
        assert_eq!(scheduler.tick(), TickOutcome::Warming);
    }

    #[test]
    fn test_ended_source_skips() {
        let mut scheduler = FrameScheduler::new(moving_square(2), cpu_config());
        scheduler.tick();
        scheduler.tick();
        assert_eq!(scheduler.tick(), TickOutcome::Skipped(SkipReason::Paused));
    }

    #[test]
    fn test_backend_selected_once() {
        let config = cpu_config();
        let mut scheduler = FrameScheduler::new(moving_square(4), config.clone());
        scheduler.tick();
        assert!(!scheduler.backend().is_some_and(|b| b.is_gpu()));

        // 后续修改prefer_gpu不影响已选后端
        config.update(|c| c.prefer_gpu = true);
        scheduler.tick();
        assert_eq!(scheduler.backend().map(|b| b.name()), Some("cpu"));
    }

    #[test]
    fn test_config_read_every_tick() {
        let config = cpu_config();
        let mut scheduler = FrameScheduler::new(moving_square(3), config.clone());
        scheduler.tick();

        // 阈值拉满后不再有运动
        config.update(|c| c.threshold = 255);
        let outcome = scheduler.tick();
        let output = outcome.output().unwrap();
        assert!(output.result.mask.is_empty());
        assert!(output.result.blobs.is_empty());
    }

    #[test]
    fn test_min_blob_area_from_config() {
        let config = cpu_config();
        let mut scheduler = FrameScheduler::new(moving_square(3), config.clone());
        scheduler.tick();

        config.update(|c| c.min_blob_area = 10_000);
        let outcome = scheduler.tick();
        let output = outcome.output().unwrap();
        assert!(!output.result.mask.is_empty());
        assert!(output.result.blobs.is_empty());
    }

    #[test]
    fn test_logical_resolution_change_resizes_backend() {
        let config = cpu_config();
        let mut scheduler = FrameScheduler::new(moving_square(4), config.clone());
        scheduler.tick();
        config.update(|c| c.logical_resolution = 10);

        // 尺寸变化后上一帧失效, 重新预热
        assert_eq!(scheduler.tick(), TickOutcome::Warming);
        assert_eq!(scheduler.backend().map(|b| b.logical_size()), Some((10, 10)));
        let outcome = scheduler.tick();
        assert_eq!(outcome.output().unwrap().result.mask.width(), 10);
    }

    #[test]
    fn test_layout_uses_display_size() {
        let mut scheduler = FrameScheduler::new(moving_square(2), cpu_config());
        scheduler.set_display_size(400, 200);
        scheduler.tick();
        let outcome = scheduler.tick();
        let layout = outcome.output().unwrap().layout;
        assert_eq!(layout.offset_x, 100.0);
        assert_eq!(layout.scale_x, 10.0);
        assert_eq!(layout.scale_y, 10.0);
    }

    #[test]
    fn test_run_stops_and_shutdown_disposes() {
        let mut scheduler = FrameScheduler::new(moving_square(4).looping(true), cpu_config());
        let stop = Arc::new(AtomicBool::new(false));
        let mut published = 0;
        let handle = stop.clone();
        scheduler.run(
            |_| {
                published += 1;
                if published == 3 {
                    handle.store(true, Ordering::Relaxed);
                }
            },
            stop,
        );
        assert_eq!(published, 3);

        scheduler.shutdown();
        assert!(scheduler.is_stopped());
        assert_eq!(scheduler.tick(), TickOutcome::Skipped(SkipReason::Stopped));
    }
}
