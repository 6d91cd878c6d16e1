//! A minimal RGBA image used to draw debug views of an atlas layout.

use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Rgba8,
}

impl ImageFormat {
    fn stride(&self) -> u32 {
        match self {
            ImageFormat::Rgba8 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scales the color channels, leaving alpha alone.
    pub fn darken(&self, factor: f32) -> Self {
        let scale = |channel: u8| (channel as f32 * factor) as u8;

        Self::new(scale(self.r), scale(self.g), scale(self.b), self.a)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Image {
    size: (u32, u32),
    data: Vec<u8>,
    format: ImageFormat,
}

impl Image {
    pub fn new_filled_rgba8(size: (u32, u32), pixel: Pixel) -> Self {
        let format = ImageFormat::Rgba8;
        let data = [pixel.r, pixel.g, pixel.b, pixel.a]
            .iter()
            .copied()
            .cycle()
            .take(Self::buffer_len(size, format))
            .collect();

        Self { size, data, format }
    }

    fn buffer_len(size: (u32, u32), format: ImageFormat) -> usize {
        size.0 as usize * size.1 as usize * format.stride() as usize
    }

    fn pixel_offset(&self, pos: (u32, u32)) -> usize {
        let stride = self.format.stride() as usize;

        stride * (pos.0 as usize + pos.1 as usize * self.size.0 as usize)
    }

    pub fn encode_png<W: Write>(&self, output: W) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(output, self.size.0, self.size.1);

        match self.format {
            ImageFormat::Rgba8 => {
                encoder.set_color(png::ColorType::RGBA);
                encoder.set_depth(png::BitDepth::Eight);
            }
        }

        let mut output_writer = encoder.write_header()?;
        output_writer.write_image_data(&self.data)?;

        // On drop, output_writer will write the last chunk of the PNG file.
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Fills the pixels in `[min, max)`, clipped to the image.
    pub fn fill_rect(&mut self, min: (u32, u32), max: (u32, u32), pixel: Pixel) {
        let max = (max.0.min(self.size.0), max.1.min(self.size.1));

        for y in min.1..max.1 {
            for x in min.0..max.0 {
                self.set_pixel((x, y), pixel);
            }
        }
    }

    /// Draws a one pixel border just inside `[min, max)`, clipped to the image.
    pub fn outline_rect(&mut self, min: (u32, u32), max: (u32, u32), pixel: Pixel) {
        let max = (max.0.min(self.size.0), max.1.min(self.size.1));

        if min.0 >= max.0 || min.1 >= max.1 {
            return;
        }

        self.fill_rect(min, (max.0, min.1 + 1), pixel);
        self.fill_rect((min.0, max.1 - 1), max, pixel);
        self.fill_rect(min, (min.0 + 1, max.1), pixel);
        self.fill_rect((max.0 - 1, min.1), max, pixel);
    }

    pub fn set_pixel(&mut self, pos: (u32, u32), pixel: Pixel) {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        let start = self.pixel_offset(pos);

        self.data[start] = pixel.r;
        self.data[start + 1] = pixel.g;
        self.data[start + 2] = pixel.b;
        self.data[start + 3] = pixel.a;
    }
}

#[cfg(test)]
impl Image {
    pub fn get_pixel(&self, pos: (u32, u32)) -> Pixel {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        let start = self.pixel_offset(pos);

        Pixel {
            r: self.data[start],
            g: self.data[start + 1],
            b: self.data[start + 2],
            a: self.data[start + 3],
        }
    }
}
