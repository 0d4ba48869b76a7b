use qrforge::*;

// Reads data modules in placement order straight from the public grid and
// strips the mask
fn read_data_bits(qr: &QR) -> Vec<bool> {
    let w = qr.width() as i16;
    let mask_fn = qr.mask().unwrap().mask_functions();
    let mut bits = Vec::new();
    let mut right = w - 1;
    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        let upward = (right + 1) & 2 == 0;
        for vert in 0..w {
            let r = if upward { w - 1 - vert } else { vert };
            for c in [right, right - 1] {
                if let Module::Data(clr) = qr.get(r, c) {
                    bits.push((clr == Color::Dark) ^ mask_fn(c as i32, r as i32));
                }
            }
        }
        right -= 2;
    }
    bits
}

fn to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8).map(|c| c.iter().fold(0, |acc, &b| (acc << 1) | b as u8)).collect()
}

fn read_format(qr: &QR, coords: &[(i16, i16)]) -> u32 {
    coords.iter().fold(0, |acc, &(r, c)| (acc << 1) | (*qr.get(r, c) == Color::Dark) as u32)
}

const FORMAT_MAIN: [(i16, i16); 15] = [
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

const FORMAT_SIDE: [(i16, i16); 15] = [
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

#[cfg(test)]
mod qr_tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_numeric_codewords_in_symbol() {
        let qr = encode("01234567", ECLevel::M, Some(1), None).unwrap();
        let bytes = to_bytes(&read_data_bits(&qr));
        assert_eq!(bytes.len(), 26);
        assert_eq!(
            bytes[..16],
            [
                0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
                0xEC, 0x11
            ]
        );
    }

    #[test]
    fn test_alphanumeric_codewords_in_symbol() {
        // 0010 000000101 00111001110 11100111001 000010 0000 + pad
        let qr = encode("AC-42", ECLevel::H, Some(1), None).unwrap();
        let bytes = to_bytes(&read_data_bits(&qr));
        assert_eq!(bytes[..9], [0x20, 0x29, 0xCE, 0xE7, 0x21, 0x00, 0xEC, 0x11, 0xEC]);
    }

    #[test_case(ECLevel::L, 0b01)]
    #[test_case(ECLevel::M, 0b00)]
    #[test_case(ECLevel::Q, 0b11)]
    #[test_case(ECLevel::H, 0b10)]
    fn test_format_info_copies(ecl: ECLevel, ecl_bits: u32) {
        for m in 0..8 {
            let qr = encode("FORMAT", ecl, None, Some(m)).unwrap();
            let main = read_format(&qr, &FORMAT_MAIN);
            let side = read_format(&qr, &FORMAT_SIDE);
            assert_eq!(main, side);
            let unmasked = main ^ 0x5412;
            assert_eq!(unmasked >> 13, ecl_bits);
            assert_eq!((unmasked >> 10) & 0b111, m as u32);
        }
    }

    #[test]
    fn test_structure() {
        for v in [1, 2, 6, 7, 20, 40] {
            let qr = encode("STRUCTURE", ECLevel::L, Some(v), None).unwrap();
            let w = qr.width() as i16;
            assert_eq!(qr.width(), 17 + 4 * v);
            assert!(qr.states().iter().flatten().all(|s| *s != State::Unset));

            for (r, c) in [(0, 0), (0, w - 7), (w - 7, 0)] {
                for i in 0..7 {
                    for j in 0..7 {
                        let ring = i.max(j).max(6 - i).max(6 - j) - 3;
                        let exp = if ring == 2 { State::Light } else { State::Dark };
                        assert_eq!(qr.state(r + i, c + j), exp, "Version {v} at {r} {c}");
                    }
                }
            }
            for i in 8..w - 8 {
                let exp = if i % 2 == 0 { State::Dark } else { State::Light };
                assert_eq!(qr.state(6, i), exp);
                assert_eq!(qr.state(i, 6), exp);
            }
            assert_eq!(qr.get(w - 8, 8), Module::Format(Color::Dark));
        }
    }

    #[test]
    fn test_version_boundary() {
        let qr = encode(&"1".repeat(41), ECLevel::L, None, None).unwrap();
        assert_eq!(*qr.version(), 1);
        let qr = encode(&"1".repeat(42), ECLevel::L, None, None).unwrap();
        assert_eq!(*qr.version(), 2);
    }

    #[test_case("1", 34)]
    #[test_case("A", 20)]
    #[test_case("a", 14)]
    fn test_exact_capacity_medium(unit: &str, fill: usize) {
        let full = unit.repeat(fill);
        assert_eq!(*encode(&full, ECLevel::M, None, None).unwrap().version(), 1);
        assert!(encode(&full, ECLevel::M, Some(1), None).is_ok());

        let over = unit.repeat(fill + 1);
        assert_eq!(*encode(&over, ECLevel::M, None, None).unwrap().version(), 2);
        assert_eq!(
            encode(&over, ECLevel::M, Some(1), None).unwrap_err(),
            QRError::InvalidPinnedVersion { required: 2, pinned: 1 }
        );
    }

    #[test]
    fn test_auto_matches_smallest_pinned() {
        let text = "a".repeat(17);
        assert!(encode(&text, ECLevel::L, Some(1), None).is_ok());
        assert_eq!(*encode(&text, ECLevel::L, None, None).unwrap().version(), 1);
    }

    #[test]
    fn test_numeric_is_not_longer_than_bytes() {
        let qr = encode(&"9".repeat(100), ECLevel::M, None, None).unwrap();
        assert_ne!(qr.strategy(), Some(Strategy::Bytes));
        assert_eq!(*qr.version(), 3);
    }

    #[test]
    fn test_errors() {
        assert_eq!(encode("", ECLevel::L, None, None).unwrap_err(), QRError::EmptyData);
        assert_eq!(
            encode(&"a".repeat(2954), ECLevel::L, None, None).unwrap_err(),
            QRError::CapacityExceeded
        );
        assert_eq!(
            encode(&"a".repeat(300), ECLevel::L, Some(2), None).unwrap_err(),
            QRError::InvalidPinnedVersion { required: 11, pinned: 2 }
        );
        assert_eq!(encode("a", ECLevel::L, Some(41), None).unwrap_err(), QRError::InvalidVersion(41));
        assert_eq!(encode("a", ECLevel::L, None, Some(9)).unwrap_err(), QRError::InvalidMask(9));
    }

    #[test]
    fn test_mask_preview() {
        let qr = encode("PREVIEW", ECLevel::M, None, Some(2)).unwrap();
        let preview = qr.mask_preview().unwrap();
        let w = qr.width() as i16;
        for r in 0..w {
            for c in 0..w {
                match qr.get(r, c) {
                    Module::Data(_) => {
                        let exp = if c % 3 == 0 { State::Dark } else { State::Light };
                        assert_eq!(preview.state(r, c), exp);
                    }
                    _ => assert_eq!(preview.state(r, c), State::Unset),
                }
            }
        }
    }
}

#[cfg(test)]
mod qr_proptests {
    use prop::string::string_regex;
    use proptest::prelude::*;
    use qrforge::{encode, ECLevel};

    use super::read_data_bits;

    pub fn ec_level_strategy() -> BoxedStrategy<ECLevel> {
        prop_oneof![Just(ECLevel::L), Just(ECLevel::M), Just(ECLevel::Q), Just(ECLevel::H)].boxed()
    }

    pub fn text_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            string_regex("[0-9]{1,300}").unwrap(),
            string_regex("[0-9A-Z $%*+./:-]{1,300}").unwrap(),
            string_regex("\\PC{1,150}").unwrap(),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn proptest_level_monotonicity(text in text_strategy()) {
            let versions = ECLevel::ALL
                .map(|ecl| *encode(&text, ecl, None, None).unwrap().version());
            prop_assert!(versions.windows(2).all(|w| w[0] <= w[1]), "{:?}", versions);
        }

        #[test]
        fn proptest_idempotent(text in text_strategy(), ecl in ec_level_strategy()) {
            let a = encode(&text, ecl, None, None).unwrap();
            let b = encode(&text, ecl, None, None).unwrap();
            prop_assert_eq!(a.states(), b.states());
            prop_assert_eq!(a.mask(), b.mask());
        }

        #[test]
        fn proptest_auto_mask_is_lowest(text in text_strategy(), ecl in ec_level_strategy()) {
            let auto = encode(&text, ecl, None, None).unwrap();
            for m in 0..8 {
                let pinned = encode(&text, ecl, None, Some(m)).unwrap();
                prop_assert_eq!(pinned.version(), auto.version());
                prop_assert!(auto.penalty() <= pinned.penalty());
                if pinned.penalty() == auto.penalty() {
                    prop_assert!(*auto.mask().unwrap() <= m);
                }
            }
        }

        #[test]
        fn proptest_capacity_fill(text in text_strategy(), ecl in ec_level_strategy()) {
            let qr = encode(&text, ecl, None, None).unwrap();
            let ver = qr.version();
            let bits = read_data_bits(&qr);
            prop_assert_eq!(bits.len(), ver.total_codewords() * 8 + ver.remainder_bits());
        }
    }
}
