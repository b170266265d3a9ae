use image::RgbaImage;

use super::FrameSource;

/// 内存帧序列
/// 每次 current_frame 前进一帧, 不循环时播放完毕即结束
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    frames: Vec<RgbaImage>,
    cursor: usize,
    looping: bool,
    paused: bool,
}

impl FrameSequence {
    pub fn new(frames: Vec<RgbaImage>) -> Self {
        Self {
            frames,
            ..Default::default()
        }
    }

    /// 循环播放
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn push(&mut self, frame: RgbaImage) {
        self.frames.push(frame);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn play(&mut self) {
        self.paused = false;
    }

    /// 回到第一帧
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// 已输出的帧数 (循环时取模)
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for FrameSequence {
    fn dimensions(&self) -> (u32, u32) {
        self.frames.first().map_or((0, 0), |f| f.dimensions())
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn is_ended(&self) -> bool {
        !self.looping && self.cursor >= self.frames.len()
    }

    fn current_frame(&mut self) -> Option<&RgbaImage> {
        if self.frames.is_empty() || self.is_ended() {
            return None;
        }
        let index = self.cursor % self.frames.len();
        self.cursor = if self.looping {
            (self.cursor + 1) % self.frames.len()
        } else {
            self.cursor + 1
        };
        self.frames.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn frames(n: u8) -> Vec<RgbaImage> {
        (0..n)
            .map(|i| RgbaImage::from_pixel(4, 3, Rgba([i, 0, 0, 255])))
            .collect()
    }

    #[test]
    fn test_empty_sequence_not_ready() {
        let mut seq = FrameSequence::default();
        assert_eq!(seq.dimensions(), (0, 0));
        assert!(seq.current_frame().is_none());
    }

    #[test]
    fn test_plays_once_then_ends() {
        let mut seq = FrameSequence::new(frames(2));
        assert_eq!(seq.dimensions(), (4, 3));
        assert!(!seq.is_ended());
        assert_eq!(seq.current_frame().unwrap().get_pixel(0, 0).0[0], 0);
        assert_eq!(seq.current_frame().unwrap().get_pixel(0, 0).0[0], 1);
        assert!(seq.is_ended());
        assert!(seq.current_frame().is_none());

        seq.rewind();
        assert!(!seq.is_ended());
    }

    #[test]
    fn test_looping_wraps() {
        let mut seq = FrameSequence::new(frames(2)).looping(true);
        let values: Vec<u8> = (0..5)
            .map(|_| seq.current_frame().unwrap().get_pixel(0, 0).0[0])
            .collect();
        assert_eq!(values, vec![0, 1, 0, 1, 0]);
        assert!(!seq.is_ended());
    }

    #[test]
    fn test_pause_play() {
        let mut seq = FrameSequence::new(frames(1));
        seq.pause();
        assert!(seq.is_paused());
        seq.play();
        assert!(!seq.is_paused());
    }
}
