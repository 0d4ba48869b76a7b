pub use encode::*;
pub use writer::build_data_codewords;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use tracing::{debug, trace};

    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{EncodedSegment, Mode, Segment, Strategy};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    // Winning segmentation together with the version it was sized for
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Segmentation {
        pub segments: Vec<EncodedSegment>,
        pub version: Version,
        pub strategy: Strategy,
    }

    impl Segmentation {
        pub fn bit_len(&self) -> usize {
            total_bit_len(&self.segments)
        }
    }

    pub fn total_bit_len(segs: &[EncodedSegment]) -> usize {
        segs.iter().map(|s| s.bit_len()).sum()
    }

    // Picks the shortest of the candidate segmentations. Without a pinned
    // version each candidate is placed in the smallest version that holds it
    // with that version's own length indicator widths.
    pub fn segment(text: &str, ecl: ECLevel, pinned: Option<Version>) -> QRResult<Segmentation> {
        if text.is_empty() {
            return Err(QRError::EmptyData);
        }

        let mut best: Option<Segmentation> = None;
        for (strategy, segs) in candidates(text) {
            let fitted = match pinned {
                Some(v) => fit_or_skip(encode_segments(&segs, v), strategy)?.map(|s| (v, s)),
                None => fit_version(&segs, ecl, strategy)?,
            };
            let Some((version, segments)) = fitted else {
                continue;
            };
            let candidate = Segmentation { segments, version, strategy };
            trace!(
                "Candidate {strategy:?}: {} segments, {} bits at version {}",
                candidate.segments.len(),
                candidate.bit_len(),
                *version
            );

            if best.as_ref().map_or(true, |b| candidate.bit_len() < b.bit_len()) {
                best = Some(candidate);
            }
        }

        let best = match (best, pinned) {
            (Some(best), None) => best,
            (Some(best), Some(_)) if best.bit_len() <= best.version.data_bit_capacity(ecl) => best,
            (_, Some(pinned)) => {
                let required = segment(text, ecl, None)?.version;
                return Err(QRError::InvalidPinnedVersion {
                    required: *required,
                    pinned: *pinned,
                });
            }
            (None, None) => return Err(QRError::CapacityExceeded),
        };

        debug!(
            "Chose {:?} segmentation: {} bits, version {}",
            best.strategy,
            best.bit_len(),
            *best.version
        );
        Ok(best)
    }

    // A char count too large for the length indicator only rules out the candidate
    fn fit_or_skip(
        res: QRResult<Vec<EncodedSegment>>,
        strategy: Strategy,
    ) -> QRResult<Option<Vec<EncodedSegment>>> {
        match res {
            Ok(segs) => Ok(Some(segs)),
            Err(QRError::CapacityExceeded) => {
                trace!("Candidate {strategy:?} overflows a length indicator");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    // First and last version of each tier sharing length indicator widths
    const VERSION_TIERS: [(usize, usize); 3] = [(1, 9), (10, 26), (27, 40)];

    // The version 40 encoding has the widest headers, so the version it
    // resolves to bounds the search. Each tier up to that bound is then tried
    // with its own widths.
    fn fit_version(
        segs: &[Segment],
        ecl: ECLevel,
        strategy: Strategy,
    ) -> QRResult<Option<(Version, Vec<EncodedSegment>)>> {
        let Some(probe) = fit_or_skip(encode_segments(segs, Version::MAX), strategy)? else {
            return Ok(None);
        };
        let Some(upper) = resolve_version(total_bit_len(&probe), ecl) else {
            trace!("Candidate {strategy:?} fits no version");
            return Ok(None);
        };

        for (first, last) in VERSION_TIERS {
            let first = Version::new(first);
            if first > upper {
                break;
            }
            let Some(encoded) = fit_or_skip(encode_segments(segs, first), strategy)? else {
                continue;
            };
            match resolve_version(total_bit_len(&encoded), ecl) {
                Some(v) if *v <= last => return Ok(Some((v.max(first), encoded))),
                _ => trace!("Candidate {strategy:?} does not fit versions {}..={last}", *first),
            }
        }
        Ok(None)
    }

    // Smallest version whose data codewords hold the given bit length
    pub fn resolve_version(bits: usize, ecl: ECLevel) -> Option<Version> {
        let words = bits.div_ceil(8);
        Version::all().find(|v| words <= v.data_codewords(ecl))
    }

    fn candidates(text: &str) -> Vec<(Strategy, Vec<Segment<'_>>)> {
        let mut res = vec![
            (Strategy::Combined, split_runs(text)),
            (Strategy::Bytes, vec![Segment::new(Mode::Byte, text, 0)]),
        ];
        if Mode::Numeric.contains_all(text) {
            res.push((Strategy::Numeric, vec![Segment::new(Mode::Numeric, text, 0)]));
        }
        if Mode::Alphanumeric.contains_all(text) {
            res.push((Strategy::Alphanumeric, vec![Segment::new(Mode::Alphanumeric, text, 0)]));
        }
        res
    }

    // Splits text into maximal runs, preferring numeric over alphanumeric over
    // byte for every character
    pub fn split_runs(text: &str) -> Vec<Segment<'_>> {
        let mut segs = Vec::new();
        let mut chars = text.char_indices().enumerate();
        let Some((_, (_, first))) = chars.next() else {
            return segs;
        };

        let (mut run_mode, mut run_byte, mut run_char) = (Mode::of(first), 0, 0);
        for (ci, (bi, c)) in chars {
            let mode = Mode::of(c);
            if mode != run_mode {
                segs.push(Segment::new(run_mode, &text[run_byte..bi], run_char));
                (run_mode, run_byte, run_char) = (mode, bi, ci);
            }
        }
        segs.push(Segment::new(run_mode, &text[run_byte..], run_char));
        segs
    }

    pub fn encode_segments(segs: &[Segment], ver: Version) -> QRResult<Vec<EncodedSegment>> {
        segs.iter().map(|s| encode_segment(s, ver)).collect()
    }

    pub fn encode_segment(seg: &Segment, ver: Version) -> QRResult<EncodedSegment> {
        let len_bits = ver.char_cnt_bits(seg.mode);
        let char_cnt = seg.char_count();
        if char_cnt >= (1 << len_bits) {
            return Err(QRError::CapacityExceeded);
        }

        let mut header = BitStream::new(ver.mode_bits() + len_bits);
        header.push_bits(seg.mode as u8, ver.mode_bits());
        header.push_bits(char_cnt as u32, len_bits);

        let data = seg.text.as_bytes();
        let mut payload = BitStream::new(seg.mode.encoded_len(data.len()));
        match seg.mode {
            Mode::Numeric => push_numeric_data(data, &mut payload),
            Mode::Alphanumeric => push_alphanumeric_data(data, &mut payload),
            Mode::Byte => push_byte_data(data, &mut payload),
            Mode::Kanji => return Err(QRError::UnsupportedMode(Mode::Kanji)),
        }

        Ok(EncodedSegment { mode: seg.mode, header, payload })
    }

    fn push_numeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(3) {
            let len = Mode::Numeric.encoded_len(chunk.len());
            out.push_bits(Mode::Numeric.encode_chunk(chunk), len);
        }
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(2) {
            let len = Mode::Alphanumeric.encoded_len(chunk.len());
            out.push_bits(Mode::Alphanumeric.encode_chunk(chunk), len);
        }
    }

    fn push_byte_data(data: &[u8], out: &mut BitStream) {
        out.extend(data);
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{EncodedSegment, PADDING_CODEWORDS};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    use super::total_bit_len;

    // Concatenates segments, then terminates and pads up to the data capacity
    pub fn build_data_codewords(
        segs: &[EncodedSegment],
        ver: Version,
        ecl: ECLevel,
    ) -> QRResult<BitStream> {
        let bcap = ver.data_bit_capacity(ecl);
        if total_bit_len(segs) > bcap {
            return Err(QRError::CapacityExceeded);
        }

        let mut bs = BitStream::new(bcap);
        for seg in segs {
            push_segment(seg, &mut bs);
        }
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        Ok(bs)
    }

    fn push_segment(seg: &EncodedSegment, out: &mut BitStream) {
        out.append(&seg.header);
        out.append(&seg.payload);
    }

    fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0, term_len);
        }
    }

    fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            let padding_bits_len = 8 - offset;
            out.push_bits(0, padding_bits_len);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        let offset = out.len() & 7;
        debug_assert!(
            offset == 0,
            "Bit offset should be zero before padding codewords: {}",
            offset
        );

        let remain_byte_capacity = out.remaining() >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

}
