use super::{Contour, Point};
use crate::mask::BinaryMask;

/// 单条轮廓最大行走步数 (异常拓扑保护, 超出则截断)
pub const MAX_TRACE_STEPS: usize = 50_000;

/// 保留轮廓的最少点数
const MIN_CONTOUR_POINTS: usize = 3;

// 边编号: 0=上 1=右 2=下 3=左
const OPPOSITE_EDGE: [u8; 4] = [2, 3, 0, 1];

/// 每种情况的边配对, 下标为4位情况码 TL(8) TR(4) BR(2) BL(1)
///
/// 鞍点情况 5 (TR+BL) 与 10 (TL+BR) 使用固定配对, 不做洞连通性判别.
/// 棋盘状掩码上可能连错轮廓, 这是已知的精度限制.
pub(crate) const EDGE_PAIRS: [&[(u8, u8)]; 16] = [
    &[],               // 0
    &[(2, 3)],         // 1: BL
    &[(1, 2)],         // 2: BR
    &[(1, 3)],         // 3: BL+BR
    &[(0, 1)],         // 4: TR
    &[(0, 3), (1, 2)], // 5: TR+BL (鞍点)
    &[(0, 2)],         // 6: TR+BR
    &[(0, 3)],         // 7: TR+BR+BL
    &[(0, 3)],         // 8: TL
    &[(0, 2)],         // 9: TL+BL
    &[(0, 1), (2, 3)], // 10: TL+BR (鞍点)
    &[(0, 1)],         // 11: TL+BL+BR
    &[(1, 3)],         // 12: TL+TR
    &[(1, 2)],         // 13: TL+TR+BL
    &[(2, 3)],         // 14: TL+TR+BR
    &[],               // 15
];

/// Marching squares 轮廓提取
///
/// 单元格网格为 (w-1)x(h-1), 每格检查2x2像素角点.
/// 每条有向格边只消费一次; 回到起始格的起始边为闭合轮廓,
/// 走出网格为开放轮廓. 少于3点的路径丢弃.
pub fn extract_contours(mask: &BinaryMask) -> Vec<Contour> {
    extract_contours_capped(mask, MAX_TRACE_STEPS)
}

pub(crate) fn extract_contours_capped(mask: &BinaryMask, max_steps: usize) -> Vec<Contour> {
    let grid = CellGrid::new(mask);
    let mut contours = Vec::new();
    if grid.cw == 0 || grid.ch == 0 {
        return contours;
    }

    let mut visited = vec![false; (grid.cw * grid.ch * 4) as usize];

    for cy in 0..grid.ch {
        for cx in 0..grid.cw {
            let case = grid.case(cx, cy);
            for &(start_edge, _) in EDGE_PAIRS[case] {
                if visited[grid.edge_key(cx, cy, start_edge)] {
                    continue;
                }
                if let Some(contour) = grid.trace(cx, cy, start_edge, &mut visited, max_steps) {
                    contours.push(contour);
                }
            }
        }
    }

    contours
}

/// 单元格视图
struct CellGrid<'a> {
    mask: &'a BinaryMask,
    cw: i64,
    ch: i64,
}

impl<'a> CellGrid<'a> {
    fn new(mask: &'a BinaryMask) -> Self {
        Self {
            mask,
            cw: (mask.width() as i64 - 1).max(0),
            ch: (mask.height() as i64 - 1).max(0),
        }
    }

    /// 2x2角点打包为4位情况码
    fn case(&self, cx: i64, cy: i64) -> usize {
        let m = self.mask;
        ((m.get(cx, cy) << 3)
            | (m.get(cx + 1, cy) << 2)
            | (m.get(cx + 1, cy + 1) << 1)
            | m.get(cx, cy + 1)) as usize
    }

    fn edge_key(&self, cx: i64, cy: i64, edge: u8) -> usize {
        ((cy * self.cw + cx) * 4 + edge as i64) as usize
    }

    fn contains(&self, cx: i64, cy: i64) -> bool {
        cx >= 0 && cy >= 0 && cx < self.cw && cy < self.ch
    }

    /// 沿边界行走, 返回满足最少点数的轮廓
    fn trace(
        &self,
        start_x: i64,
        start_y: i64,
        start_edge: u8,
        visited: &mut [bool],
        max_steps: usize,
    ) -> Option<Contour> {
        let mut points = Vec::new();
        let (mut cx, mut cy, mut entry) = (start_x, start_y, start_edge);
        let mut closed = false;

        for _ in 0..max_steps {
            let case = self.case(cx, cy);
            let Some(exit) = find_exit(case, entry) else {
                break;
            };

            visited[self.edge_key(cx, cy, entry)] = true;
            visited[self.edge_key(cx, cy, exit)] = true;
            points.push(edge_midpoint(cx, cy, exit));

            let (nx, ny) = neighbor_cell(cx, cy, exit);
            if nx == start_x && ny == start_y && OPPOSITE_EDGE[exit as usize] == start_edge {
                closed = true;
                break;
            }
            if !self.contains(nx, ny) {
                break;
            }

            cx = nx;
            cy = ny;
            entry = OPPOSITE_EDGE[exit as usize];
        }

        (points.len() >= MIN_CONTOUR_POINTS).then_some(Contour { points, closed })
    }
}

/// 情况0/15没有配对, 返回None
fn find_exit(case: usize, entry: u8) -> Option<u8> {
    EDGE_PAIRS[case].iter().find_map(|&(a, b)| {
        if a == entry {
            Some(b)
        } else if b == entry {
            Some(a)
        } else {
            None
        }
    })
}

fn edge_midpoint(cx: i64, cy: i64, edge: u8) -> Point {
    let (x, y) = (cx as f32, cy as f32);
    match edge {
        0 => Point::new(x + 0.5, y),
        1 => Point::new(x + 1.0, y + 0.5),
        2 => Point::new(x + 0.5, y + 1.0),
        _ => Point::new(x, y + 0.5),
    }
}

fn neighbor_cell(cx: i64, cy: i64, edge: u8) -> (i64, i64) {
    match edge {
        0 => (cx, cy - 1),
        1 => (cx + 1, cy),
        2 => (cx, cy + 1),
        _ => (cx - 1, cy),
    }
}
