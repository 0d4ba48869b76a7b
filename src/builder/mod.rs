mod ec;
mod qr;
mod snapshot;

pub use qr::{Module, State, QR};
pub use snapshot::{Stage, StageSink};

use std::ops::Deref;

use tracing::{debug, trace};

use crate::common::{
    bit_utils::BitStream,
    codec::{build_data_codewords, segment},
    error::QRResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Metadata, Version},
};

pub struct QRBuilder<'a> {
    text: &'a str,
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, version: None, ec_level: ECLevel::M, mask: None }
    }

    pub fn text(&mut self, text: &'a str) -> &mut Self {
        self.text = text;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.version, Some(self.ec_level), self.mask)
    }
}

#[cfg(test)]
mod qrbuilder_util_tests {
    use super::QRBuilder;
    use crate::common::{
        mask::MaskPattern,
        metadata::{ECLevel, Version},
    };

    #[test]
    fn test_metadata() {
        let mut qr_builder = QRBuilder::new("Hello, world!");
        qr_builder.version(Version::new(1)).ec_level(ECLevel::L).mask(MaskPattern::new(2));
        assert_eq!(qr_builder.metadata().to_string(), "{ Version: 1, Ec level: L, Mask: 2 }");
        qr_builder.unset_version().unset_mask();
        assert_eq!(
            qr_builder.metadata().to_string(),
            "{ Version: None, Ec level: L, Mask: None }"
        );
    }
}

impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        self.assemble(None)
    }

    // Same as build, and hands a copy of the symbol to the sink after every
    // stage
    pub fn build_with_snapshots(&self, sink: &mut impl StageSink) -> QRResult<QR> {
        self.assemble(Some(sink))
    }

    fn assemble(&self, mut sink: Option<&mut dyn StageSink>) -> QRResult<QR> {
        debug!("Generating QR {}...", self.metadata());

        // Encode data optimally
        debug!("Encoding data...");
        let seg = segment(self.text, self.ec_level, self.version)?;
        let version = seg.version;
        let data = build_data_codewords(&seg.segments, version, self.ec_level)?;

        debug!("Constructing payload with ecc & interleaving...");
        let (data_blocks, ecc_blocks) = ec::ecc(data.data(), version, self.ec_level);
        for (i, (d, e)) in data_blocks.iter().zip(&ecc_blocks).enumerate() {
            trace!("Block {i}: data {} | ecc {}", to_hex(d), to_hex(e));
        }
        let mut payload = BitStream::new(version.total_codewords() << 3);
        payload.extend(&interleave(&data_blocks));
        payload.extend(&interleave(&ecc_blocks));

        debug!("Drawing function patterns...");
        let mut qr = QR::new(version, self.ec_level);
        qr.set_strategy(seg.strategy);
        for stage in Stage::ASSEMBLY {
            qr.draw_stage(stage);
            if let Some(sink) = sink.as_mut() {
                sink.on_stage(stage, qr.clone());
            }
        }

        let qr = match self.mask {
            Some(m) => {
                debug!("Applying mask {m}...");
                qr.apply_mask(&payload, m);
                qr
            }
            None => {
                debug!("Finding & applying best mask...");
                apply_best_mask(&qr, &payload)
            }
        };
        if let Some(sink) = sink {
            sink.on_stage(Stage::Payload, qr.clone());
        }

        Self::report(&qr, data.len() >> 3);
        Ok(qr)
    }

    fn report(qr: &QR, data_len: usize) {
        let version = qr.version();
        let ec_capacity = version.ec_capacity(qr.ec_level());
        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        let light_modules = total_modules - dark_modules;

        debug!("QR generated {}", qr.metadata());
        debug!("Strategy: {:?}, Penalty: {}", qr.strategy(), qr.penalty());
        debug!("Data capacity: {data_len}, Error Capacity: {ec_capacity}");
        debug!(
            "Dark Cells: {dark_modules}, Light Cells: {light_modules}, Balance: {}",
            dark_modules * 100 / total_modules
        );
    }
}

// Column major read of the blocks, shorter blocks drop out once exhausted
pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect::<Vec<_>>().join(" ")
}
