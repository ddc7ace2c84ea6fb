// src/request.rs
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::ValidationError;

pub const DEFAULT_SIZE: u32 = 250;
pub const SIZE_RANGE: RangeInclusive<i64> = 100..=1000;

/// Сырые параметры запроса `/qr` и `/qr/save`
#[derive(Debug, Default, Clone, Deserialize)]
pub struct QrQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub size: Option<i64>,
    #[serde(rename = "type", default)]
    pub image_type: Option<String>,
    pub contents: Option<String>,
}

// `?size=` значит "не задано", пустой `type` остаётся строкой и не проходит проверку
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" => Ok(ImageFormat::Jpeg),
            _ => Err(ValidationError::Type),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Проверенный запрос: размер в допустимом диапазоне, формат из закрытого списка
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub size: u32,
    pub format: ImageFormat,
    pub contents: String,
}

/// Подставить значения по умолчанию и проверить параметры.
/// Размер проверяется раньше формата, возвращается только первая ошибка.
pub fn validate(query: QrQuery) -> Result<ValidatedRequest, ValidationError> {
    let size = query.size.unwrap_or(DEFAULT_SIZE as i64);
    if !SIZE_RANGE.contains(&size) {
        return Err(ValidationError::Size);
    }

    let format = match query.image_type.as_deref() {
        Some(value) => value.parse()?,
        None => ImageFormat::default(),
    };

    Ok(ValidatedRequest {
        size: size as u32,
        format,
        contents: query.contents.unwrap_or_default(),
    })
}
