use super::QR;

// Assembly stages, in the order they are drawn
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Stage {
    Separators,
    FinderPatterns,
    TimingPatterns,
    AlignmentPatterns,
    FormatArea,
    VersionInfo,
    Payload,
}

impl Stage {
    pub const ASSEMBLY: [Stage; 6] = [
        Stage::Separators,
        Stage::FinderPatterns,
        Stage::TimingPatterns,
        Stage::AlignmentPatterns,
        Stage::FormatArea,
        Stage::VersionInfo,
    ];
}

// Receives an owned copy of the symbol after each stage. The builder keeps
// drawing on its own grid, so a snapshot never changes after hand-off.
pub trait StageSink {
    fn on_stage(&mut self, stage: Stage, snapshot: QR);
}

impl<F: FnMut(Stage, QR)> StageSink for F {
    fn on_stage(&mut self, stage: Stage, snapshot: QR) {
        self(stage, snapshot)
    }
}

