use chrono::{DateTime, Local};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::EncodingError;
use crate::qr::EncodedImage;

/// Сохранение сгенерированных QR кодов на диск
#[derive(Debug, Clone)]
pub struct StorageService {
    dir: PathBuf,
}

impl StorageService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Записать изображение в файл `qr_<yyyyMMdd_HHmmss>.<ext>`, вернуть полный путь
    pub async fn save(&self, image: &EncodedImage) -> Result<PathBuf, EncodingError> {
        self.save_at(image, Local::now()).await
    }

    pub async fn save_at(
        &self,
        image: &EncodedImage,
        at: DateTime<Local>,
    ) -> Result<PathBuf, EncodingError> {
        // create_dir_all не падает, если каталог уже создан параллельным запросом
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(file_name(image, at));
        let dir = self.dir.clone();
        let target = path.clone();
        let bytes = image.bytes.clone();
        tokio::task::spawn_blocking(move || write_whole(&dir, &target, &bytes))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;

        log::debug!("QR code written to {} ({} bytes)", path.display(), image.bytes.len());
        Ok(path)
    }
}

/// Пишем во временный файл рядом и переименовываем: по итоговому пути
/// всегда лежит одно целое изображение.
fn write_whole(dir: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".qr_")
        .suffix(".part")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Имя файла по времени создания. В пределах одной секунды имена совпадают,
/// последняя запись побеждает.
pub fn file_name(image: &EncodedImage, at: DateTime<Local>) -> String {
    format!("qr_{}.{}", at.format("%Y%m%d_%H%M%S"), image.format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ImageFormat;
    use chrono::TimeZone;

    fn image(format: ImageFormat) -> EncodedImage {
        EncodedImage {
            bytes: vec![1, 2, 3, 4],
            format,
        }
    }

    #[test]
    fn file_name_uses_timestamp_and_extension() {
        let at = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(file_name(&image(ImageFormat::Png), at), "qr_20240307_090501.png");
        assert_eq!(file_name(&image(ImageFormat::Jpeg), at), "qr_20240307_090501.jpeg");
    }

    #[tokio::test]
    async fn save_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageService::new(tmp.path().join("nested").join("qr"));

        let path = storage.save(&image(ImageFormat::Png)).await.unwrap();

        assert!(path.starts_with(storage.dir()));
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn save_into_existing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageService::new(tmp.path());

        let first = storage.save(&image(ImageFormat::Jpeg)).await.unwrap();
        let second = storage.save(&image(ImageFormat::Jpeg)).await.unwrap();

        assert!(first.exists());
        assert!(second.exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_in_one_second_leave_a_whole_file() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageService::new(tmp.path());
        let at = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();

        let long = EncodedImage {
            bytes: vec![0xAA; 64 * 1024],
            format: ImageFormat::Png,
        };
        let short = EncodedImage {
            bytes: vec![0x55; 100],
            format: ImageFormat::Png,
        };

        for _ in 0..20 {
            let (a, b) = tokio::join!(storage.save_at(&long, at), storage.save_at(&short, at));
            let (a, b) = (a.unwrap(), b.unwrap());
            assert_eq!(a, b);

            let written = std::fs::read(&a).unwrap();
            assert!(written == long.bytes || written == short.bytes);
        }

        // временные файлы не остаются
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn save_reports_io_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        std::fs::write(&blocker, b"file").unwrap();

        let storage = StorageService::new(blocker.join("qr"));
        let err = storage.save(&image(ImageFormat::Png)).await.unwrap_err();

        assert!(matches!(err, EncodingError::Io(_)));
    }
}
