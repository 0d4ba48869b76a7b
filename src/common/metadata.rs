use std::fmt::{self, Display, Formatter};
use std::ops::{Deref, Not};

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn select<T>(&self, light: T, dark: T) -> T {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    // Two bit indicator used by the format information
    pub const fn format_bits(self) -> u16 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<usize> for Version {
    type Error = QRError;
    fn try_from(v: usize) -> QRResult<Self> {
        match v {
            1..=40 => Ok(Self(v)),
            _ => Err(QRError::InvalidVersion(v)),
        }
    }
}

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub const fn new(v: usize) -> Self {
        debug_assert!(v >= 1 && v <= 40, "Invalid version");
        Self(v)
    }

    pub fn all() -> impl DoubleEndedIterator<Item = Version> {
        (1..=40).map(Version)
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub const fn mode_bits(self) -> usize {
        4
    }

    // Width of the character count indicator, by mode and version tier
    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        let tier = match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        let widths = match mode {
            Mode::Numeric => [10, 12, 14],
            Mode::Alphanumeric => [9, 11, 13],
            Mode::Byte => [8, 16, 16],
            Mode::Kanji => [8, 10, 12],
        };
        widths[tier]
    }

    pub fn total_codewords(self) -> usize {
        TOTAL_CODEWORDS[self.0]
    }

    pub fn remainder_bits(self) -> usize {
        raw_module_count(self.0) - (self.total_codewords() << 3)
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_PER_BLOCK[ecl as usize][self.0]
    }

    pub fn block_count(self, ecl: ECLevel) -> usize {
        BLOCK_COUNT[ecl as usize][self.0]
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ecc_per_block(ecl) * self.block_count(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    // Number of codeword errors the symbol can recover from
    pub fn ec_capacity(self, ecl: ECLevel) -> usize {
        let p = match (self.0, ecl) {
            (1, ECLevel::L) => 3,
            (2, ECLevel::L) | (1, ECLevel::M) => 2,
            (1, _) | (3, ECLevel::L) => 1,
            _ => 0,
        };
        let ec_bytes = self.block_count(ecl) * self.ecc_per_block(ecl);
        (ec_bytes - p) / 2
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.0]
    }

    pub fn info(self) -> u32 {
        VERSION_INFOS[self.0]
    }
}

const fn raw_module_count(v: usize) -> usize {
    let mut res = (16 * v + 128) * v + 64;
    if v >= 2 {
        let n = v / 7 + 2;
        res -= (25 * n - 10) * n - 55;
        if v >= 7 {
            res -= 36;
        }
    }
    res
}


// Metadata
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Metadata {
    pub version: Option<Version>,
    pub ec_level: Option<ECLevel>,
    pub mask: Option<MaskPattern>,
}

impl Metadata {
    pub fn new(
        version: Option<Version>,
        ec_level: Option<ECLevel>,
        mask: Option<MaskPattern>,
    ) -> Self {
        Self { version, ec_level, mask }
    }
}

impl Display for Metadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ver = self.version.map_or("None".to_string(), |v| v.0.to_string());
        let ecl = self.ec_level.map_or("None".to_string(), |e| format!("{e:?}"));
        let mask = self.mask.map_or("None".to_string(), |m| m.to_string());
        write!(f, "{{ Version: {ver}, Ec level: {ecl}, Mask: {mask} }}")
    }
}

#[cfg(test)]
mod metadata_tests {
    use super::{ECLevel, Metadata, Version};
    use crate::common::mask::MaskPattern;

    #[test]
    fn test_display() {
        let meta = Metadata::new(Some(Version::new(7)), Some(ECLevel::Q), Some(MaskPattern::new(3)));
        assert_eq!(meta.to_string(), "{ Version: 7, Ec level: Q, Mask: 3 }");
        let meta = Metadata::new(None, Some(ECLevel::L), None);
        assert_eq!(meta.to_string(), "{ Version: None, Ec level: L, Mask: None }");
    }
}

// Format & version info
//------------------------------------------------------------------------------

pub const FORMAT_INFO_BIT_LEN: usize = 15;

pub const VERSION_INFO_BIT_LEN: usize = 18;

const FORMAT_GENERATOR: u32 = 0x537;

const FORMAT_MASK: u32 = 0x5412;

const VERSION_GENERATOR: u32 = 0x1F25;

// Remainder of data * x^deg divided by generator, in GF(2)
const fn bch_remainder(data: u32, data_len: u32, generator: u32, deg: u32) -> u32 {
    let mut rem = data << deg;
    let mut i = data_len;
    while i > 0 {
        i -= 1;
        if rem & (1 << (i + deg)) != 0 {
            rem ^= generator << i;
        }
    }
    rem
}

const fn build_format_infos() -> [u32; 32] {
    let mut res = [0; 32];
    let mut data = 0;
    while data < 32 {
        let rem = bch_remainder(data, 5, FORMAT_GENERATOR, 10);
        res[data as usize] = ((data << 10) | rem) ^ FORMAT_MASK;
        data += 1;
    }
    res
}

const fn build_version_infos() -> [u32; 41] {
    let mut res = [0; 41];
    let mut v = 7;
    while v <= 40 {
        let rem = bch_remainder(v, 6, VERSION_GENERATOR, 12);
        res[v as usize] = (v << 12) | rem;
        v += 1;
    }
    res
}

// Indexed by (ec level bits << 3) | mask
static FORMAT_INFOS: [u32; 32] = build_format_infos();

static VERSION_INFOS: [u32; 41] = build_version_infos();

pub fn format_info(ecl: ECLevel, mask: MaskPattern) -> u32 {
    let idx = ((ecl.format_bits() as usize) << 3) | *mask as usize;
    FORMAT_INFOS[idx]
}


// Global constants
//------------------------------------------------------------------------------

// Listed MSB first, (row, col), negative indices wrap from the far edge
pub static FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

pub static FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

pub static DARK_MODULE_COORD: (i16, i16) = (-8, 8);

pub static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];

pub static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];

static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; 41] = [
    &[],
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

static TOTAL_CODEWORDS: [usize; 41] = [
    0, 26, 44, 70, 100, 134, 172, 196, 242, 292, 346, 404, 466, 532, 581, 655, 733, 815, 901, 991,
    1085, 1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185, 2323, 2465, 2611, 2761, 2876,
    3034, 3196, 3362, 3532, 3706,
];

// Indexed by [ec level][version]
static ECC_PER_BLOCK: [[usize; 41]; 4] = [
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

static BLOCK_COUNT: [[usize; 41]; 4] = [
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];
