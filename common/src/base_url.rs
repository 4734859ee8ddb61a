//! ベースURL
//!
//! API呼び出しと画像URLの解決に同じ値を使う。バックエンドが返す画像URLは
//! `/uploads/images/...` 形式の相対パスなので、ここでオリジンを前置する。

use crate::error::{Error, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// 末尾のスラッシュを除去して検証
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().trim_end_matches('/');
        let rest = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .ok_or_else(|| Error::InvalidUrl(raw.to_string()))?;

        if rest.is_empty() || rest.contains(char::is_whitespace) {
            return Err(Error::InvalidUrl(raw.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// APIパスを結合（`/api/vehicles` → `http://host/api/vehicles`）
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.0, path)
        } else {
            format!("{}/{}", self.0, path)
        }
    }

    /// 画像URLを解決（絶対URLはそのまま）
    pub fn asset(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
            url.to_string()
        } else {
            self.join(url)
        }
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
