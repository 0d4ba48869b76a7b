use rayon::prelude::*;

use crate::common::{
    ec::{generator_polynomial, EXP_TABLE, LOG_TABLE},
    metadata::{ECLevel, Version},
};

// ECC: Error Correction Codeword generator
pub fn ecc(data: &[u8], version: Version, ec_level: ECLevel) -> (Vec<&[u8]>, Vec<Vec<u8>>) {
    let data_blocks = blockify(data, version.block_count(ec_level));

    let ecc_size_per_block = version.ecc_per_block(ec_level);
    let ecc_blocks =
        data_blocks.par_iter().map(|b| ecc_per_block(b, ecc_size_per_block)).collect::<Vec<_>>();

    (data_blocks, ecc_blocks)
}

// Splits data into `count` blocks. The last `len % count` blocks carry one
// extra codeword.
pub fn blockify(data: &[u8], count: usize) -> Vec<&[u8]> {
    debug_assert!(count > 0, "Block count must be positive");

    let short_size = data.len() / count;
    let long_count = data.len() % count;
    let short_count = count - long_count;
    let total_short_size = short_size * short_count;

    let mut data_blocks = Vec::with_capacity(count);
    if short_size > 0 {
        data_blocks.extend(data[..total_short_size].chunks(short_size));
    }
    if long_count > 0 {
        data_blocks.extend(data[total_short_size..].chunks(short_size + 1));
    }
    data_blocks
}

// Performs polynomial long division with data polynomial(num)
// and generator polynomial(den) to compute remainder polynomial,
// the coefficients of which are the ecc
pub fn ecc_per_block(block: &[u8], ecc_count: usize) -> Vec<u8> {
    let len = block.len();
    let gen_poly = generator_polynomial(ecc_count);

    let mut res = block.to_vec();
    res.resize(len + ecc_count, 0);

    for i in 0..len {
        let lead_coeff = res[i] as usize;
        if lead_coeff == 0 {
            continue;
        }

        let log_lead_coeff = LOG_TABLE[lead_coeff] as usize;
        for (u, v) in res[i + 1..].iter_mut().zip(gen_poly.iter()) {
            let mut log_sum = *v as usize + log_lead_coeff;
            debug_assert!(log_sum < 510, "Log sum has crossed 510: {log_sum}");
            if log_sum >= 255 {
                log_sum -= 255;
            }
            *u ^= EXP_TABLE[log_sum];
        }
    }

    res.split_off(len)
}
