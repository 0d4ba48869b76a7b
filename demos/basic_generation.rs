use std::error::Error;

use qrforge::{ECLevel, MaskPattern, Palette, QRBuilder, Version, QUIET_ZONE};

fn main() -> Result<(), Box<dyn Error>> {
    // Simplest usage - provide only text, all other settings are automatically chosen
    let qr = QRBuilder::new("Hello, World!").build()?;
    println!("{}", qr.to_str(1));

    let img = qr.render(4); // 4px per module
    img.save("simple_qr.png")?;
    println!("Simple QR code saved to: simple_qr.png");

    let data = "This example shows all available configuration options for QR code generation.";
    let qr = QRBuilder::new(data)
        .version(Version::new(5))  // QR version (size) - if not provided, finds smallest version to fit data
        .ec_level(ECLevel::H)      // Error correction level - if not provided, defaults to ECLevel::M
        .mask(MaskPattern::new(2)) // Mask pattern - if not provided, finds best mask based on penalty score
        .build()?;

    // Fit into a 512px square with inverted colors
    let palette = Palette::default().inverted();
    let img = qr.render_to_fit(512, QUIET_ZONE, &palette)?;
    img.save("configured_qr.png")?;

    println!("Configured QR code saved to: configured_qr.png");
    println!("QR metadata: {}", qr.metadata());
    println!("Strategy: {:?}, Penalty: {}", qr.strategy(), qr.penalty());

    Ok(())
}
