use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::builder::{State, QR};
use crate::common::error::{QRError, QRResult};

// Width of the light border around the symbol, in modules
pub const QUIET_ZONE: u32 = 4;

// Palette
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Palette {
    pub dark: Rgb<u8>,
    pub light: Rgb<u8>,
    // Shown for modules nothing has been drawn on yet
    pub unset: Rgb<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self { dark: Rgb([0, 0, 0]), light: Rgb([255, 255, 255]), unset: Rgb([255, 0, 0]) }
    }
}

impl Palette {
    pub fn inverted(self) -> Self {
        Self { dark: self.light, light: self.dark, unset: self.unset }
    }

    fn pick(&self, state: State) -> Rgb<u8> {
        match state {
            State::Unset => self.unset,
            State::Light => self.light,
            State::Dark => self.dark,
        }
    }
}

// Render
//------------------------------------------------------------------------------

impl QR {
    pub fn render(&self, module_sz: u32) -> GrayImage {
        let qz_sz = QUIET_ZONE * module_sz;
        let qr_sz = self.width() as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = GrayImage::new(total_sz, total_sz);
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.put_pixel(j, i, Luma([255]));
                    continue;
                }
                let r = (i - qz_sz) / module_sz;
                let c = (j - qz_sz) / module_sz;

                let pixel = match self.state(r as i16, c as i16) {
                    State::Dark => Luma([0]),
                    State::Light | State::Unset => Luma([255]),
                };
                canvas.put_pixel(j, i, pixel);
            }
        }

        canvas
    }

    pub fn render_with(&self, module_sz: u32, quiet_zone: u32, palette: &Palette) -> RgbImage {
        let qz_sz = quiet_zone * module_sz;
        let qr_sz = self.width() as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        RgbImage::from_fn(total_sz, total_sz, |j, i| {
            if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                return palette.light;
            }
            let r = (i - qz_sz) / module_sz;
            let c = (j - qz_sz) / module_sz;
            palette.pick(self.state(r as i16, c as i16))
        })
    }

    // Largest integer module size whose image fits in target_px
    pub fn render_to_fit(
        &self,
        target_px: u32,
        quiet_zone: u32,
        palette: &Palette,
    ) -> QRResult<RgbImage> {
        let modules = self.width() as u32 + 2 * quiet_zone;
        let module_sz = target_px / modules;
        if module_sz == 0 {
            return Err(QRError::RenderTargetTooSmall { target: target_px, required: modules });
        }
        Ok(self.render_with(module_sz, quiet_zone, palette))
    }

    // Terminal friendly rendering, one char per module column
    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = QUIET_ZONE as usize * module_sz;
        let qr_sz = self.width() * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::with_capacity(total_sz * (total_sz + 1) * 3);
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push('█');
                    continue;
                }
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;

                canvas.push(match self.state(r, c) {
                    State::Dark => ' ',
                    State::Light => '█',
                    State::Unset => '?',
                });
            }
            canvas.push('\n');
        }

        canvas
    }
}

#[cfg(test)]
mod render_tests {
    use image::{Luma, Rgb};

    use super::{Palette, QUIET_ZONE};
    use crate::builder::{Module, QRBuilder, QR};
    use crate::common::{
        error::QRError,
        metadata::{Color, ECLevel, Version},
    };

    #[test]
    fn test_render_dimensions() {
        let qr = QRBuilder::new("render").build().unwrap();
        let img = qr.render(3);
        let exp = (qr.width() as u32 + 2 * QUIET_ZONE) * 3;
        assert_eq!(img.dimensions(), (exp, exp));
        assert_eq!(*img.get_pixel(0, 0), Luma([255]));
        // Top left finder corner sits just inside the quiet zone
        assert_eq!(*img.get_pixel(QUIET_ZONE * 3, QUIET_ZONE * 3), Luma([0]));
    }

    #[test]
    fn test_render_matches_modules() {
        let qr = QRBuilder::new("MODULES").ec_level(ECLevel::Q).build().unwrap();
        let img = qr.render(1);
        let w = qr.width() as i16;
        for r in 0..w {
            for c in 0..w {
                let px = img.get_pixel(c as u32 + QUIET_ZONE, r as u32 + QUIET_ZONE);
                let exp = if *qr.get(r, c) == Color::Dark { 0 } else { 255 };
                assert_eq!(*px, Luma([exp]), "Module {r} {c}");
            }
        }
    }

    #[test]
    fn test_render_with_palette() {
        let mut qr = QR::new(Version::new(1), ECLevel::L);
        qr.set(0, 0, Module::Finder(Color::Dark));
        qr.set(0, 1, Module::Finder(Color::Light));
        let pal = Palette::default();
        let img = qr.render_with(2, 1, &pal);
        assert_eq!(img.dimensions(), (46, 46));
        assert_eq!(*img.get_pixel(0, 0), pal.light);
        assert_eq!(*img.get_pixel(2, 2), pal.dark);
        assert_eq!(*img.get_pixel(4, 2), pal.light);
        assert_eq!(*img.get_pixel(6, 2), pal.unset);

        let inv = pal.inverted();
        let img = qr.render_with(2, 1, &inv);
        assert_eq!(*img.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(2, 2), Rgb([255, 255, 255]));
        assert_eq!(*img.get_pixel(6, 2), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_render_to_fit() {
        let qr = QRBuilder::new("fit").version(Version::new(1)).build().unwrap();
        let img = qr.render_to_fit(300, 4, &Palette::default()).unwrap();
        // 29 modules across, 10 px each
        assert_eq!(img.dimensions(), (290, 290));
    }

    #[test]
    fn test_render_to_fit_too_small() {
        let qr = QRBuilder::new("fit").version(Version::new(1)).build().unwrap();
        let res = qr.render_to_fit(28, 4, &Palette::default());
        assert_eq!(res.unwrap_err(), QRError::RenderTargetTooSmall { target: 28, required: 29 });
    }

    #[test]
    fn test_to_str() {
        let qr = QRBuilder::new("str").version(Version::new(1)).build().unwrap();
        let s = qr.to_str(1);
        let lines = s.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 29);
        assert!(lines.iter().all(|l| l.chars().count() == 29));
        assert!(lines[0].chars().all(|c| c == '█'));
        assert_eq!(&lines[4].chars().skip(4).take(8).collect::<String>(), "       █");
        assert!(!s.contains('?'));
    }
}
