use crate::common::bit_utils::BitStream;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    // Recognised by the symbology but never produced by the segmenter
    Kanji = 0b1000,
}

impl Mode {
    // Mode of a single character when runs are split greedily
    pub fn of(c: char) -> Self {
        match u8::try_from(c) {
            Ok(b) if Self::Numeric.contains(b) => Self::Numeric,
            Ok(b) if Self::Alphanumeric.contains(b) => Self::Alphanumeric,
            _ => Self::Byte,
        }
    }

    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    // Packs up to 3 digits or 2 alphanumerics into a single value. Bytes are
    // copied as is.
    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte | Self::Kanji => unreachable!("No chunk packing for {self:?}"),
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
            Self::Kanji => false,
        }
    }

    pub fn contains_all(&self, text: &str) -> bool {
        text.bytes().all(|b| self.contains(b))
    }

    // Bit length of the packed payload for `len` characters
    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
            Self::Kanji => len * 13,
        }
    }
}


// Segment
//------------------------------------------------------------------------------

// Maximal run of characters sharing one mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub mode: Mode,
    pub text: &'a str,
    // Char offset of the run within the input
    pub start: usize,
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, text: &'a str, start: usize) -> Self {
        Self { mode, text, start }
    }

    // Value written to the length indicator. Byte mode counts UTF-8 bytes, the
    // other modes are ASCII only so bytes and chars coincide.
    pub fn char_count(&self) -> usize {
        self.text.len()
    }
}

// Encoded segment
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSegment {
    pub mode: Mode,
    pub header: BitStream,
    pub payload: BitStream,
}

impl EncodedSegment {
    pub fn bit_len(&self) -> usize {
        self.header.len() + self.payload.len()
    }
}

// Strategy
//------------------------------------------------------------------------------

// Candidate segmentations, listed in evaluation order
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Strategy {
    Combined,
    Bytes,
    Numeric,
    Alphanumeric,
}

pub static PADDING_CODEWORDS: [u8; 2] = [0xEC, 0x11];
