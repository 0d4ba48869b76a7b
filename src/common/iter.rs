use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

const VERT_TIMING_COL: i16 = 6;

// Walks two-column strips from the bottom-right corner, alternating upward
// and downward, and hops over the vertical timing column. Every module is
// yielded, function modules included.
pub struct EncRegionIter {
    r: i16,
    c: i16,
    width: i16,
}

impl EncRegionIter {
    pub const fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { r: w - 1, c: w - 1, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.c < 0 {
            return None;
        }
        let adjusted_col = if self.c <= VERT_TIMING_COL { self.c + 1 } else { self.c };
        let res = (self.r, self.c);
        let col_type = (self.width - adjusted_col) % 4;
        match col_type {
            2 if self.r > 0 => {
                self.r -= 1;
                self.c += 1;
            }
            0 if self.r < self.width - 1 => {
                self.r += 1;
                self.c += 1;
            }
            0 | 2 if self.c == VERT_TIMING_COL + 1 => {
                self.c -= 2;
            }
            _ => {
                self.c -= 1;
            }
        }
        Some(res)
    }
}

#[cfg(test)]
mod iter_tests {
    use std::collections::HashSet;

    use super::EncRegionIter;
    use crate::common::metadata::Version;

    #[test]
    fn test_start_of_walk() {
        let coords = EncRegionIter::new(Version::new(1)).take(6).collect::<Vec<_>>();
        assert_eq!(coords, [(20, 20), (20, 19), (19, 20), (19, 19), (18, 20), (18, 19)]);
    }

    #[test]
    fn test_strip_turns_downward() {
        let coords = EncRegionIter::new(Version::new(1)).skip(40).take(4).collect::<Vec<_>>();
        assert_eq!(coords, [(0, 20), (0, 19), (0, 18), (0, 17)]);
    }

    #[test]
    fn test_covers_every_module_except_timing_column() {
        for v in [1, 2, 7, 14, 40] {
            let ver = Version::new(v);
            let w = ver.width() as i16;
            let coords = EncRegionIter::new(ver).collect::<Vec<_>>();
            let unique = coords.iter().copied().collect::<HashSet<_>>();
            assert_eq!(coords.len(), unique.len(), "Version {v}");
            assert_eq!(coords.len() as i16, w * (w - 1), "Version {v}");
            assert!(coords.iter().all(|&(_, c)| c != 6));
            assert_eq!(coords.last(), Some(&(w - 1, 0)));
        }
    }
}
