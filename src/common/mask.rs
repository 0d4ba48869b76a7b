use std::fmt::{self, Display, Formatter};
use std::ops::Deref;

use rayon::prelude::*;
use tracing::{debug, trace};

use super::bit_utils::BitStream;
use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub const ALL: [MaskPattern; 8] = [
        MaskPattern(0),
        MaskPattern(1),
        MaskPattern(2),
        MaskPattern(3),
        MaskPattern(4),
        MaskPattern(5),
        MaskPattern(6),
        MaskPattern(7),
    ];

    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid masking pattern");
        Self(pattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for MaskPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for MaskPattern {
    type Error = QRError;
    fn try_from(pattern: u8) -> QRResult<Self> {
        match pattern {
            0..=7 => Ok(Self(pattern)),
            _ => Err(QRError::InvalidMask(pattern)),
        }
    }
}

// x is the column, y is the row
mod mask_functions {
    pub fn checkerboard(x: i32, y: i32) -> bool {
        (x + y) & 1 == 0
    }

    pub fn horizontal_lines(_: i32, y: i32) -> bool {
        y & 1 == 0
    }

    pub fn vertical_lines(x: i32, _: i32) -> bool {
        x % 3 == 0
    }

    pub fn diagonal_lines(x: i32, y: i32) -> bool {
        (x + y) % 3 == 0
    }

    pub fn large_checkerboard(x: i32, y: i32) -> bool {
        ((y >> 1) + (x / 3)) & 1 == 0
    }

    pub fn fields(x: i32, y: i32) -> bool {
        ((x * y) & 1) + ((x * y) % 3) == 0
    }

    pub fn diamonds(x: i32, y: i32) -> bool {
        (((x * y) & 1) + ((x * y) % 3)) & 1 == 0
    }

    pub fn meadow(x: i32, y: i32) -> bool {
        (((x + y) & 1) + ((x * y) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_functions(self) -> fn(i32, i32) -> bool {
        debug_assert!(*self < 8, "Invalid pattern");

        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!(),
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

// Builds one candidate per mask from the same skeleton and keeps the lowest
// penalty. Ties go to the lower mask index.
pub fn apply_best_mask(skeleton: &QR, payload: &BitStream) -> QR {
    let mut candidates = MaskPattern::ALL
        .par_iter()
        .map(|&m| {
            let mut qr = skeleton.clone();
            qr.apply_mask(payload, m);
            qr
        })
        .collect::<Vec<_>>();

    let mut best = 0;
    for (i, qr) in candidates.iter().enumerate() {
        trace!("Mask {i} scored {}", qr.penalty());
        if qr.penalty() < candidates[best].penalty() {
            best = i;
        }
    }

    debug!("Selected mask {best} with penalty {}", candidates[best].penalty());
    candidates.swap_remove(best)
}

// Penalty
//------------------------------------------------------------------------------

const FINDER_LIKE: [bool; 7] = [true, false, true, true, true, false, true];

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let w = qr.width();
    let dark = qr.grid().iter().map(|m| **m == Color::Dark).collect::<Vec<_>>();
    let adj_pen = compute_adjacent_penalty(&dark, w);
    let blk_pen = compute_block_penalty(&dark, w);
    let fp_pen_h = compute_finder_pattern_penalty(&dark, w, true);
    let fp_pen_v = compute_finder_pattern_penalty(&dark, w, false);
    let bal_pen = compute_balance_penalty(&dark);
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

fn line(dark: &[bool], w: usize, i: usize, is_hor: bool) -> impl Iterator<Item = bool> + '_ {
    (0..w).map(move |j| if is_hor { dark[i * w + j] } else { dark[j * w + i] })
}

// Rule 1: each run of 5 or more same colored modules scores its length - 2
fn compute_adjacent_penalty(dark: &[bool], w: usize) -> u32 {
    let mut pen = 0;
    for i in 0..w {
        for is_hor in [true, false] {
            let mut last = None;
            let mut run = 0;
            for m in line(dark, w, i, is_hor) {
                if last == Some(m) {
                    run += 1;
                    continue;
                }
                if run >= 5 {
                    pen += run - 2;
                }
                last = Some(m);
                run = 1;
            }
            if run >= 5 {
                pen += run - 2;
            }
        }
    }
    pen
}

// Rule 2: every uniform 2x2 block scores 3
fn compute_block_penalty(dark: &[bool], w: usize) -> u32 {
    let mut pen = 0;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = dark[r * w + c];
            if clr == dark[(r + 1) * w + c]
                && clr == dark[r * w + c + 1]
                && clr == dark[(r + 1) * w + c + 1]
            {
                pen += 3;
            }
        }
    }
    pen
}

// Rule 3: every 1:1:3:1:1 pattern scores 40 per flank of 4 light modules.
// Modules beyond the symbol edge count as light.
fn compute_finder_pattern_penalty(dark: &[bool], w: usize, is_hor: bool) -> u32 {
    let mut pen = 0;
    let w = w as i32;
    for i in 0..w {
        let ln = line(dark, w as usize, i as usize, is_hor).collect::<Vec<_>>();
        let is_light = |x: i32| x < 0 || x >= w || !ln[x as usize];
        for j in 0..=w - 7 {
            if ln[j as usize..j as usize + 7] != FINDER_LIKE {
                continue;
            }
            if (j - 4..j).all(is_light) {
                pen += 40;
            }
            if (j + 7..j + 11).all(is_light) {
                pen += 40;
            }
        }
    }
    pen
}

// Rule 4: 2 points per whole percent the dark ratio strays from 50%
fn compute_balance_penalty(dark: &[bool]) -> u32 {
    let dark_cnt = dark.iter().filter(|d| **d).count();
    let tot = dark.len();
    let deviation = (dark_cnt * 100).abs_diff(tot * 50) / tot;
    (deviation * 2) as u32
}
