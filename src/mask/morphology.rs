//! 形态学去噪: 4邻域腐蚀/膨胀, 开运算
//!
//! 边界一圈像素始终清零 (不做环绕, 不做边缘复制).
use super::BinaryMask;

/// 腐蚀: 前景像素仅当自身与上下左右4邻域全为前景时保留
pub fn erode(mask: &BinaryMask) -> BinaryMask {
    apply_cross(mask, |c, l, r, t, b| c & l & r & t & b)
}

/// 膨胀: 自身或任一4邻域为前景即置为前景
pub fn dilate(mask: &BinaryMask) -> BinaryMask {
    apply_cross(mask, |c, l, r, t, b| c | l | r | t | b)
}

/// 开运算 = dilate(erode(mask)), 去除孤立噪点
pub fn morph_open(mask: &BinaryMask) -> BinaryMask {
    dilate(&erode(mask))
}

fn apply_cross(mask: &BinaryMask, op: impl Fn(u8, u8, u8, u8, u8) -> u8) -> BinaryMask {
    let (w, h) = (mask.width() as usize, mask.height() as usize);
    let data = mask.data();
    let mut out = vec![0u8; w * h];

    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let i = y * w + x;
            out[i] = op(data[i], data[i - 1], data[i + 1], data[i - w], data[i + w]);
        }
    }

    BinaryMask::from_raw(mask.width(), mask.height(), out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn random_mask(rng: &mut impl Rng, w: u32, h: u32, density: f64) -> BinaryMask {
        let data = (0..w * h).map(|_| rng.gen_bool(density) as u8).collect();
        BinaryMask::from_vec(w, h, data).unwrap()
    }

    fn cross(mask: &BinaryMask, x: i64, y: i64) -> [u8; 5] {
        [
            mask.get(x, y),
            mask.get(x - 1, y),
            mask.get(x + 1, y),
            mask.get(x, y - 1),
            mask.get(x, y + 1),
        ]
    }

    #[test]
    fn test_erode_implies_full_cross() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let m = random_mask(&mut rng, 17, 13, 0.7);
            let e = erode(&m);
            for y in 0..13 {
                for x in 0..17 {
                    if e.get(x, y) == 1 {
                        assert_eq!(cross(&m, x, y), [1; 5]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_dilate_implies_some_neighbor() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let m = random_mask(&mut rng, 15, 19, 0.1);
            let d = dilate(&m);
            for y in 0..19 {
                for x in 0..15 {
                    if d.get(x, y) == 1 {
                        assert!(cross(&m, x, y).contains(&1));
                    }
                }
            }
        }
    }

    #[test]
    fn test_border_ring_cleared() {
        let full = BinaryMask::from_vec(5, 4, vec![1; 20]).unwrap();
        let d = dilate(&full);
        for x in 0..5 {
            assert_eq!(d.get(x, 0), 0);
            assert_eq!(d.get(x, 3), 0);
        }
        for y in 0..4 {
            assert_eq!(d.get(0, y), 0);
            assert_eq!(d.get(4, y), 0);
        }
        assert_eq!(d.count_foreground(), 3 * 2);
    }

    #[test]
    fn test_open_removes_speck_keeps_block() {
        let mut m = BinaryMask::new(12, 12);
        m.set(1, 1, true);
        for y in 4..9 {
            for x in 4..9 {
                m.set(x, y, true);
            }
        }
        let opened = morph_open(&m);
        assert_eq!(opened.get(1, 1), 0);
        assert_eq!(opened.get(6, 6), 1);
        // 5x5方块: 腐蚀为3x3再膨胀回带角缺口的十字形
        assert_eq!(opened.get(4, 6), 1);
        assert_eq!(opened.get(4, 4), 0);
    }

    #[test]
    fn test_reopen_stable_on_unanimous_neighborhoods() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let m = random_mask(&mut rng, 24, 24, 0.6);
            let once = morph_open(&m);
            let twice = morph_open(&once);
            for y in 1..23 {
                for x in 1..23 {
                    let c = cross(&once, x, y);
                    if c == [1; 5] || c == [0; 5] {
                        assert_eq!(twice.get(x, y), once.get(x, y), "pixel ({x},{y})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_tiny_masks_do_not_panic() {
        for (w, h) in [(0, 0), (1, 1), (2, 1), (1, 5), (2, 2)] {
            let m = BinaryMask::from_vec(w, h, vec![1; (w * h) as usize]).unwrap();
            assert!(morph_open(&m).is_empty());
        }
    }
}
