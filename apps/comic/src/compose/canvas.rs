//! `DrawTarget` adapter so embedded-graphics primitives and mono fonts can
//! paint straight onto an `image::RgbaImage`.

use std::convert::Infallible;

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use image::{Rgba, RgbaImage};

pub struct CanvasTarget<'a> {
    image: &'a mut RgbaImage,
}

impl<'a> CanvasTarget<'a> {
    pub fn new(image: &'a mut RgbaImage) -> Self {
        Self { image }
    }
}

impl OriginDimensions for CanvasTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for CanvasTarget<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = (self.image.width(), self.image.height());
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x >= w || y >= h {
                continue;
            }
            self.image
                .put_pixel(x, y, Rgba([color.r(), color.g(), color.b(), 255]));
        }
        Ok(())
    }
}

/// Converts parsed RGBA bytes into the drawing color (alpha is dropped).
pub fn rgb(color: [u8; 4]) -> Rgb888 {
    Rgb888::new(color[0], color[1], color[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_draw_clips_out_of_bounds_pixels() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let mut target = CanvasTarget::new(&mut image);
        Rectangle::new(Point::new(-2, -2), Size::new(4, 4))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::WHITE))
            .draw(&mut target)
            .unwrap();

        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(image.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));
        assert_eq!(image.get_pixel(2, 2), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_size_matches_image() {
        let mut image = RgbaImage::new(7, 3);
        let target = CanvasTarget::new(&mut image);
        assert_eq!(target.size(), Size::new(7, 3));
    }
}
