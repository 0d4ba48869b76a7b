use std::error::Error;

use qrforge::{Palette, QRBuilder, Stage, QR};

fn main() -> Result<(), Box<dyn Error>> {
    let mut snapshots: Vec<(Stage, QR)> = Vec::new();
    let qr = QRBuilder::new("https://example.com/stages")
        .build_with_snapshots(&mut |stage: Stage, snap: QR| snapshots.push((stage, snap)))?;

    // Unset modules show up in the palette's marker color
    let palette = Palette::default();
    for (i, (stage, snap)) in snapshots.iter().enumerate() {
        let path = format!("stage_{i}_{stage:?}.png").to_lowercase();
        snap.render_with(8, 2, &palette).save(&path)?;
        println!("{stage:?} saved to: {path}");
    }

    if let (Some(preview), Some(mask)) = (qr.mask_preview(), qr.mask()) {
        preview.render_with(8, 2, &palette).save("mask_preview.png")?;
        println!("Mask {mask} preview saved to: mask_preview.png");
    }

    Ok(())
}
