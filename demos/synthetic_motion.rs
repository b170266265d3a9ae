/// 合成运动演示
///
/// 生成一个在画面中移动的方块序列, 交给调度器逐帧处理,
/// 打印每帧的斑块并把最后一帧的运动掩码保存为PNG.
///
/// Usage:
///   cargo run --example synthetic_motion [output.png]
///   cargo run --example synthetic_motion --features gpu
use image::{GrayImage, Luma, Rgba, RgbaImage};
use motion_blob::{
    BinaryMask, BlobConfig, FrameResult, FrameScheduler, FrameSequence, SharedConfig,
    TickOutcome,
};

const SOURCE_WIDTH: u32 = 320;
const SOURCE_HEIGHT: u32 = 180;
const FRAME_COUNT: u32 = 24;

fn synthetic_frames() -> Vec<RgbaImage> {
    (0..FRAME_COUNT)
        .map(|i| {
            let mut frame =
                RgbaImage::from_pixel(SOURCE_WIDTH, SOURCE_HEIGHT, Rgba([20, 24, 32, 255]));
            let x0 = 20 + i * 10;
            let y0 = 60 + (i % 6) * 4;
            for y in y0..(y0 + 40).min(SOURCE_HEIGHT) {
                for x in x0..(x0 + 40).min(SOURCE_WIDTH) {
                    frame.put_pixel(x, y, Rgba([230, 180, 40, 255]));
                }
            }
            frame
        })
        .collect()
}

fn mask_to_image(mask: &BinaryMask) -> GrayImage {
    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        Luma([mask.get(x as i64, y as i64) * 255])
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "motion_mask.png".to_string());

    let config = BlobConfig {
        logical_resolution: 90,
        ..Default::default()
    };
    config.print_summary();

    let mut scheduler = FrameScheduler::new(
        FrameSequence::new(synthetic_frames()),
        SharedConfig::new(config),
    );
    scheduler.set_display_size(1280, 720);

    let mut last: Option<FrameResult> = None;
    let mut frame_index = 0;
    loop {
        match scheduler.tick() {
            TickOutcome::Published(out) => {
                for blob in &out.result.blobs {
                    let (x, y, w, h) = out.layout.map_rect(&blob.bounding_box);
                    println!(
                        "frame {:>2} blob #{} area={:<4} centroid=({:.1}, {:.1}) display=({:.0}, {:.0}, {:.0}x{:.0})",
                        frame_index,
                        blob.id,
                        blob.area,
                        blob.centroid.0,
                        blob.centroid.1,
                        x,
                        y,
                        w,
                        h
                    );
                }
                println!(
                    "frame {:>2}: {} blobs, {} contours",
                    frame_index,
                    out.result.blobs.len(),
                    out.result.contours.len()
                );
                last = Some(out.result);
            }
            TickOutcome::Warming => log::info!("⏳ 预热: 等待上一帧"),
            TickOutcome::Skipped(reason) => {
                log::info!("⏹️  序列结束: {:?}", reason);
                break;
            }
        }
        frame_index += 1;
    }
    scheduler.shutdown();

    let result = last.ok_or_else(|| anyhow::anyhow!("no frame was published"))?;
    mask_to_image(&result.mask).save(&output)?;
    println!("💾 运动掩码已保存到 {}", output);
    Ok(())
}
