//! 画像プレビュー用のData URL
//!
//! プレビューは表示専用。バックエンドへは元のバイト列をそのまま送る。

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// バイト列を `data:<mime>;base64,...` に変換
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// 拡張子からMIMEタイプを推定（中身から判別できない場合の予備）
pub fn mime_from_extension(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}
