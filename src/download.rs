//! 受付票（PDF）の保存
//!
//! 一時ファイル（`.part`）に書き出してからリネームする。失敗時は一時ファイルを消す。

use crate::error::Result;
use std::path::{Path, PathBuf};
use taller_common::receipt_file_name;
use tracing::{debug, warn};

pub async fn save_receipt(dir: &Path, placas: &str, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let target = dir.join(receipt_file_name(placas));
    let partial = target.with_extension("pdf.part");

    let written = match tokio::fs::write(&partial, bytes).await {
        Ok(()) => tokio::fs::rename(&partial, &target).await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        warn!(path = %partial.display(), error = %e, "Could not save receipt");
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e.into());
    }

    debug!(path = %target.display(), size = bytes.len(), "Receipt saved");
    Ok(target)
}
