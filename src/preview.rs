//! 写真ファイルの読み込みとプレビュー生成
//!
//! ローカルファイルを読み込んでData URLのプレビューを作る。ネットワークは使わない。
//! プレビューは表示専用で、アップロードには元のバイト列を使う。

use crate::error::{Result, TallerError};
use std::path::Path;
use taller_common::preview::{mime_from_extension, to_data_url};
use tracing::debug;

/// 選択された写真
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePreview {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub data_url: String,
}

impl ImagePreview {
    /// ファイルを読み込んでプレビューを生成
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(TallerError::ImageLoad(format!(
                "No se encontró el archivo: {}",
                path.display()
            )));
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "foto".to_string());

        Self::from_bytes(file_name, bytes)
    }

    /// バイト列からプレビューを生成（画像以外は拒否）
    pub fn from_bytes(file_name: String, bytes: Vec<u8>) -> Result<Self> {
        let mime = detect_mime(&file_name, &bytes).ok_or_else(|| {
            TallerError::ImageLoad(format!("{} no es una imagen", file_name))
        })?;

        let data_url = to_data_url(&mime, &bytes);
        debug!(file_name = %file_name, mime = %mime, size = bytes.len(), "Image preview ready");

        Ok(Self {
            file_name,
            mime,
            bytes,
            data_url,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// 中身から判別し、だめなら拡張子から推定
fn detect_mime(file_name: &str, bytes: &[u8]) -> Option<String> {
    if let Ok(format) = image::guess_format(bytes) {
        return Some(format.to_mime_type().to_string());
    }

    let by_ext = mime_from_extension(file_name);
    by_ext.starts_with("image/").then(|| by_ext.to_string())
}
