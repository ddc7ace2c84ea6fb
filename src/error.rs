// src/error.rs

/// Ошибка пользовательского ввода. Текст ошибки уходит клиенту как есть.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid 'size' parameter. Allowed range is 100..1000.")]
    Size,

    #[error("Invalid 'type' parameter. Allowed values are 'png' or 'jpeg'.")]
    Type,
}

/// Ошибка генерации или сохранения изображения
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("{0}")]
    Symbology(#[from] qrcode::types::QrError),

    #[error("QR code with {modules} modules does not fit into {size}x{size} pixels")]
    DoesNotFit { modules: u32, size: u32 },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
