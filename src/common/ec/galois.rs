// Galois field GF(256) with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
//------------------------------------------------------------------------------

const PRIMITIVE: u16 = 0x11D;

pub const MAX_EC_CODEWORDS: usize = 30;

const EXP: [u8; 256] = build_exp_table();

const LOG: [u8; 256] = build_log_table(&EXP);

// EXP_TABLE[i] = a^i, wrapping at 255
pub static EXP_TABLE: [u8; 256] = EXP;

// LOG_TABLE[a^i] = i, LOG_TABLE[0] is undefined and left as 0
pub static LOG_TABLE: [u8; 256] = LOG;

// Log form coefficients of prod (x - a^i) for i < n, leading term omitted
static GENERATOR_POLYNOMIALS: [[u8; MAX_EC_CODEWORDS]; MAX_EC_CODEWORDS + 1] =
    build_generator_polynomials();

pub fn generator_polynomial(ecc_count: usize) -> &'static [u8] {
    debug_assert!(
        (1..=MAX_EC_CODEWORDS).contains(&ecc_count),
        "Unsupported ecc count: {ecc_count}"
    );
    &GENERATOR_POLYNOMIALS[ecc_count][..ecc_count]
}

const fn build_exp_table() -> [u8; 256] {
    let mut res = [0; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        res[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    res[255] = res[0];
    res
}

const fn build_log_table(exp: &[u8; 256]) -> [u8; 256] {
    let mut res = [0; 256];
    let mut i = 0;
    while i < 255 {
        res[exp[i] as usize] = i as u8;
        i += 1;
    }
    res
}

const fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = (LOG[a as usize] as usize + LOG[b as usize] as usize) % 255;
    EXP[log_sum]
}

const fn build_generator_polynomials() -> [[u8; MAX_EC_CODEWORDS]; MAX_EC_CODEWORDS + 1] {
    let mut res = [[0; MAX_EC_CODEWORDS]; MAX_EC_CODEWORDS + 1];
    let mut n = 1;
    while n <= MAX_EC_CODEWORDS {
        // Coefficients from highest degree down, poly[0] is the monic leading term
        let mut poly = [0_u8; MAX_EC_CODEWORDS + 1];
        poly[0] = 1;
        let mut i = 0;
        while i < n {
            let root = EXP[i];
            let mut j = i + 1;
            while j > 0 {
                poly[j] ^= gf_mul(poly[j - 1], root);
                j -= 1;
            }
            i += 1;
        }

        let mut k = 0;
        while k < n {
            res[n][k] = LOG[poly[k + 1] as usize];
            k += 1;
        }
        n += 1;
    }
    res
}
