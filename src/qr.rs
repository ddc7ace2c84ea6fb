// src/qr.rs
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, GrayImage, ImageBuffer, ImageEncoder, Luma};
use qrcode::{Color, EcLevel, QrCode};

use crate::error::EncodingError;
use crate::request::{ImageFormat, ValidatedRequest};

/// Ширина пустой рамки вокруг кода, в модулях
pub const QUIET_ZONE: u32 = 4;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Готовое изображение и его формат
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl EncodedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QrService;

impl QrService {
    pub fn new() -> Self {
        Self
    }

    /// Сгенерировать QR код размером ровно `size x size` пикселей
    pub fn encode(&self, request: &ValidatedRequest) -> Result<EncodedImage, EncodingError> {
        let code = QrCode::with_error_correction_level(request.contents.as_bytes(), EcLevel::L)?;
        let img = render(&code, request.size)?;

        let mut bytes = Vec::new();
        match request.format {
            ImageFormat::Png => PngEncoder::new(&mut bytes).write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                ColorType::L8,
            )?,
            ImageFormat::Jpeg => JpegEncoder::new(&mut bytes).write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                ColorType::L8,
            )?,
        }

        log::debug!(
            "Generated {} QR code: version {:?}, {}x{} px, {} bytes",
            request.format,
            code.version(),
            request.size,
            request.size,
            bytes.len()
        );

        Ok(EncodedImage {
            bytes,
            format: request.format,
        })
    }
}

/// Растеризация: модуль масштабируется целым множителем, рамка и остаток
/// уходят в отступ, код центрируется.
fn render(code: &QrCode, size: u32) -> Result<GrayImage, EncodingError> {
    let modules = code.width() as u32;
    let full = modules + 2 * QUIET_ZONE;
    if full > size {
        return Err(EncodingError::DoesNotFit { modules: full, size });
    }

    let scale = size / full;
    let offset = (size - modules * scale) / 2;

    let mut img: GrayImage = ImageBuffer::from_pixel(size, size, LIGHT);

    for y in 0..modules {
        for x in 0..modules {
            if code[(x as usize, y as usize)] != Color::Dark {
                continue;
            }
            let left = offset + x * scale;
            let top = offset + y * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(left + dx, top + dy, DARK);
                }
            }
        }
    }

    Ok(img)
}
