use std::ops::Deref;

use tracing::trace;

use super::snapshot::Stage;
use crate::common::{
    bit_utils::BitStream,
    codec::Strategy,
    iter::EncRegionIter,
    mask::{compute_total_penalty, MaskPattern},
    metadata::{
        format_info, Color, ECLevel, Metadata, Version, DARK_MODULE_COORD,
        FORMAT_INFO_BIT_LEN, FORMAT_INFO_COORDS_MAIN, FORMAT_INFO_COORDS_SIDE,
        VERSION_INFO_BIT_LEN, VERSION_INFO_COORDS_BL, VERSION_INFO_COORDS_TR,
    },
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Quiet(Color),
    Finder(Color),
    Timing(Color),
    Alignment(Color),
    Format(Color),
    Version(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Quiet(c)
            | Module::Finder(c)
            | Module::Timing(c)
            | Module::Alignment(c)
            | Module::Format(c)
            | Module::Version(c)
            | Module::Data(c) => c,
        }
    }
}

impl Module {
    pub fn state(&self) -> State {
        match self {
            Module::Empty => State::Unset,
            m => m.select(State::Light, State::Dark),
        }
    }
}

// Three valued view of a module handed to renderers
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    Unset,
    Light,
    Dark,
}

#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
    penalty: u32,
    strategy: Option<Strategy>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self {
            grid: vec![Module::Empty; w * w],
            w,
            ver,
            ecl,
            mask: None,
            penalty: 0,
            strategy: None,
        }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn penalty(&self) -> u32 {
        self.penalty
    }

    pub fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    pub(crate) fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = Some(strategy);
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::new(Some(self.ver), Some(self.ecl), self.mask)
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    pub fn state(&self, r: i16, c: i16) -> State {
        self.get(r, c).state()
    }

    // Row major
    pub fn states(&self) -> Vec<Vec<State>> {
        self.grid.chunks(self.w).map(|row| row.iter().map(Module::state).collect()).collect()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Quiet(c) => c.select('Q', 'q'),
                    Module::Finder(c) => c.select('F', 'f'),
                    Module::Timing(c) => c.select('T', 't'),
                    Module::Alignment(c) => c.select('A', 'a'),
                    Module::Format(c) => c.select('M', 'm'),
                    Module::Version(c) => c.select('V', 'v'),
                    Module::Data(c) => c.select('D', 'd'),
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        r as usize * self.w + c as usize
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }
}


// Assembly stages
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_stage(&mut self, stage: Stage) {
        match stage {
            Stage::Separators => self.draw_separators(),
            Stage::FinderPatterns => self.draw_finder_patterns(),
            Stage::TimingPatterns => self.draw_timing_pattern(),
            Stage::AlignmentPatterns => self.draw_alignment_patterns(),
            Stage::FormatArea => self.reserve_format_area(),
            Stage::VersionInfo => self.draw_version_info(),
            // Placed together with the mask by apply_mask
            Stage::Payload => {}
        }
    }

    pub fn draw_all_function_patterns(&mut self) {
        for stage in Stage::ASSEMBLY {
            self.draw_stage(stage);
        }
    }
}

// Finder pattern
//------------------------------------------------------------------------------

const FINDER_CENTERS: [(i16, i16); 3] = [(3, 3), (3, -4), (-4, 3)];

impl QR {
    // Light border between each finder and the encoding region
    fn draw_separators(&mut self) {
        for (r, c) in FINDER_CENTERS {
            let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
            let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
            for i in dr_top..=dr_bottom {
                for j in dc_left..=dc_right {
                    if matches!((i, j), (4 | -4, _) | (_, 4 | -4)) {
                        self.set(r + i, c + j, Module::Quiet(Color::Light));
                    }
                }
            }
        }
    }

    fn draw_finder_patterns(&mut self) {
        for (r, c) in FINDER_CENTERS {
            self.draw_finder_pattern_at(r, c);
        }
    }

    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        for i in -3..=3 {
            for j in -3..=3 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (3 | -3, _) | (_, 3 | -3) => Module::Finder(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Finder(Color::Light),
                        _ => Module::Finder(Color::Dark),
                    },
                );
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        let (off, last) = (6, w - 9);
        self.draw_line(off, 8, off, last);
        self.draw_line(8, off, last, off);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, Module::Timing(Color::from(j & 1 == 0)));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, Module::Timing(Color::from(i & 1 == 0)));
            }
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Alignment(Color::Dark),
                        _ => Module::Alignment(Color::Light),
                    },
                )
            }
        }
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info(0);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        for coords in [&FORMAT_INFO_COORDS_MAIN, &FORMAT_INFO_COORDS_SIDE] {
            self.draw_number(
                format_info,
                FORMAT_INFO_BIT_LEN,
                Module::Format(Color::Light),
                Module::Format(Color::Dark),
                coords,
            );
        }
        let (r, c) = DARK_MODULE_COORD;
        self.set(r, c, Module::Format(Color::Dark));
    }

    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let ver_info = self.ver.info();
        for coords in [&VERSION_INFO_COORDS_BL, &VERSION_INFO_COORDS_TR] {
            self.draw_number(
                ver_info,
                VERSION_INFO_BIT_LEN,
                Module::Version(Color::Light),
                Module::Version(Color::Dark),
                coords,
            );
        }
    }

    // Most significant bit goes to the first coordinate
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for (r, c) in coords {
            if number & mask == 0 {
                self.set(*r, *c, off_clr);
            } else {
                self.set(*r, *c, on_clr);
            }
            mask >>= 1;
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    // Stamps the format code for the mask, places the payload through the mask
    // and scores the result
    pub fn apply_mask(&mut self, payload: &BitStream, pattern: MaskPattern) {
        self.mask = Some(pattern);
        self.draw_format_info(format_info(self.ecl, pattern));
        self.draw_payload(payload, pattern);
        self.penalty = compute_total_penalty(self);
        trace!("Applied mask {pattern} with penalty {}", self.penalty);
    }

    // Remainder bits past the end of the payload are placed as zeros
    fn draw_payload(&mut self, payload: &BitStream, pattern: MaskPattern) {
        let mask_fn = pattern.mask_functions();
        let mut bits = payload.iter();
        for (r, c) in EncRegionIter::new(self.ver) {
            if !matches!(self.get(r, c), Module::Empty) {
                continue;
            }
            let bit = bits.next().unwrap_or(false);
            let flip = mask_fn(c as i32, r as i32);
            self.set(r, c, Module::Data(Color::from(bit ^ flip)));
        }
        debug_assert!(bits.next().is_none(), "Payload is longer than the encoding region");
    }

    // Data modules show the chosen mask's predicate, everything else is unset
    pub fn mask_preview(&self) -> Option<QR> {
        let mask_fn = self.mask?.mask_functions();
        let mut preview = QR::new(self.ver, self.ecl);
        preview.mask = self.mask;
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if let Module::Data(_) = self.get(r, c) {
                    let m = Module::Data(Color::from(mask_fn(c as i32, r as i32)));
                    preview.set(r, c, m);
                }
            }
        }
        Some(preview)
    }
}

#[cfg(test)]
mod encoding_region_tests {
    use super::{Module, QR};
    use crate::common::{
        bit_utils::BitStream,
        iter::EncRegionIter,
        mask::{compute_total_penalty, MaskPattern},
        metadata::{format_info, Color, ECLevel, Version, FORMAT_INFO_COORDS_MAIN},
    };

    fn skeleton(v: usize, ecl: ECLevel) -> QR {
        let mut qr = QR::new(Version::new(v), ecl);
        qr.draw_all_function_patterns();
        qr
    }

    fn payload(ver: Version) -> BitStream {
        let bytes = (0..ver.total_codewords()).map(|i| (i * 37 + 11) as u8).collect::<Vec<_>>();
        BitStream::from(&bytes)
    }

    // Reads the data modules back in placement order and strips the mask
    fn read_back(qr: &QR) -> Vec<bool> {
        let mask_fn = qr.mask().unwrap().mask_functions();
        EncRegionIter::new(qr.version())
            .filter(|&(r, c)| matches!(qr.get(r, c), Module::Data(_)))
            .map(|(r, c)| (*qr.get(r, c) == Color::Dark) ^ mask_fn(c as i32, r as i32))
            .collect()
    }

    #[test]
    fn test_codeword_round_trip() {
        for (v, m) in [(1, 0), (2, 3), (7, 5), (14, 6), (40, 7)] {
            let ver = Version::new(v);
            let bits = payload(ver);
            let mut qr = skeleton(v, ECLevel::M);
            qr.apply_mask(&bits, MaskPattern::new(m));

            let placed = read_back(&qr);
            assert_eq!(placed.len(), bits.len() + ver.remainder_bits(), "Version {v}");
            assert!(placed.iter().zip(bits.iter()).all(|(a, b)| *a == b), "Version {v}");
            assert!(placed[bits.len()..].iter().all(|b| !b), "Version {v}");
            assert!(!qr.grid().contains(&Module::Empty));
        }
    }

    #[test]
    fn test_format_info_matches_mask() {
        let mut qr = skeleton(3, ECLevel::Q);
        let bits = payload(qr.version());
        qr.apply_mask(&bits, MaskPattern::new(2));
        let read = FORMAT_INFO_COORDS_MAIN
            .iter()
            .fold(0, |acc, &(r, c)| (acc << 1) | (*qr.get(r, c) == Color::Dark) as u32);
        assert_eq!(read, format_info(ECLevel::Q, MaskPattern::new(2)));
        assert_eq!(qr.get(-8, 8), Module::Format(Color::Dark));
    }

    #[test]
    fn test_penalty_is_stored() {
        let mut qr = skeleton(5, ECLevel::H);
        let bits = payload(qr.version());
        qr.apply_mask(&bits, MaskPattern::new(4));
        assert_eq!(qr.penalty(), compute_total_penalty(&qr));
        assert!(qr.penalty() > 0);
    }

    #[test]
    fn test_function_modules_untouched() {
        for v in Version::all() {
            let skel = skeleton(*v, ECLevel::L);
            let mut qr = skel.clone();
            qr.apply_mask(&payload(v), MaskPattern::new((*v % 8) as u8));
            for (i, (a, b)) in skel.grid().iter().zip(qr.grid()).enumerate() {
                match a {
                    Module::Empty => assert!(matches!(b, Module::Data(_)), "Version {} at {i}", *v),
                    Module::Format(_) => {
                        assert!(matches!(b, Module::Format(_)), "Version {} at {i}", *v)
                    }
                    _ => assert_eq!(a, b, "Version {} at {i}", *v),
                }
            }
        }
    }

    #[test]
    fn test_mask_preview() {
        let mut qr = skeleton(1, ECLevel::L);
        assert!(qr.mask_preview().is_none());
        qr.apply_mask(&payload(qr.version()), MaskPattern::new(1));
        let preview = qr.mask_preview().unwrap();
        assert_eq!(preview.get(0, 0), Module::Empty);
        assert_eq!(preview.get(20, 20), Module::Data(Color::Dark));
        assert_eq!(preview.get(19, 20), Module::Data(Color::Light));
        let data = qr.grid().iter().filter(|m| matches!(m, Module::Data(_))).count();
        let shown = preview.grid().iter().filter(|m| matches!(m, Module::Data(_))).count();
        assert_eq!(data, shown);
    }
}
