use std::collections::VecDeque;

use super::{Blob, BoundingBox};
use crate::mask::BinaryMask;

// 4邻域偏移
const NEIGHBORS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// 对掩码做连通域标记, 返回面积 >= `min_area` 的斑块
///
/// 行优先扫描, 遇到未标记前景像素即开始一次BFS填充.
/// 不满足面积的区域整体丢弃; id按输出顺序连续编号.
pub fn label_connected_components(mask: &BinaryMask, min_area: usize) -> Vec<Blob> {
    let (w, h) = (mask.width() as usize, mask.height() as usize);
    let data = mask.data();
    let mut labels = vec![0u32; w * h]; // 0 = 未标记
    let mut next_label = 1u32;
    let mut blobs = Vec::new();
    let mut queue = VecDeque::new();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if data[idx] == 0 || labels[idx] != 0 {
                continue;
            }

            let label = next_label;
            next_label += 1;
            labels[idx] = label;
            queue.push_back(idx);

            let (mut min_x, mut max_x, mut min_y, mut max_y) = (x, x, y, y);
            let (mut sum_x, mut sum_y, mut area) = (0u64, 0u64, 0usize);

            while let Some(ci) = queue.pop_front() {
                let cx = ci % w;
                let cy = ci / w;

                area += 1;
                sum_x += cx as u64;
                sum_y += cy as u64;
                min_x = min_x.min(cx);
                max_x = max_x.max(cx);
                min_y = min_y.min(cy);
                max_y = max_y.max(cy);

                for (dx, dy) in NEIGHBORS {
                    let nx = cx as i64 + dx;
                    let ny = cy as i64 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                        continue;
                    }
                    let ni = ny as usize * w + nx as usize;
                    if data[ni] == 1 && labels[ni] == 0 {
                        labels[ni] = label;
                        queue.push_back(ni);
                    }
                }
            }

            if area >= min_area {
                blobs.push(Blob {
                    id: blobs.len(),
                    bounding_box: BoundingBox {
                        x: min_x as u32,
                        y: min_y as u32,
                        w: (max_x - min_x + 1) as u32,
                        h: (max_y - min_y + 1) as u32,
                    },
                    centroid: (
                        (sum_x as f64 / area as f64) as f32,
                        (sum_y as f64 / area as f64) as f32,
                    ),
                    area,
                });
            }
        }
    }

    blobs
}
