//! Taller Autos
//!
//! 整備工場の管理クライアント。車両の入庫登録、不具合の記録、受付票の発行を
//! REST APIを通して行う。画面はヘッドレスで、ターミナル表示は `render` と `shell` が担う。

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod logging;
pub mod preview;
pub mod render;
pub mod shell;
pub mod views;
