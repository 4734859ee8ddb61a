//! Taller Autos Common Library
//!
//! CLIとテスト用フェイクサーバで共有される型とユーティリティ

pub mod base_url;
pub mod draft;
pub mod error;
pub mod filter;
pub mod generation;
pub mod preview;
pub mod receipt;
pub mod requests;
pub mod route;
pub mod timestamp;
pub mod types;

pub use base_url::BaseUrl;
pub use draft::{year_options, DefectDraft, IntakeDraft, OwnerField, ServiceDraft, VehicleField, VehicleFields};
pub use error::{Error, Result};
pub use filter::{brand_options, empty_message, StatusTab, TabCounts, VehicleFilter};
pub use generation::{Generation, Ticket};
pub use receipt::receipt_file_name;
pub use requests::{
    ApiErrorBody, DefectCreate, ListParams, OwnerAssignment, OwnerCreate, ServiceHistoryCreate,
    UploadResponse, VehicleCreate, VehicleUpdate,
};
pub use route::Route;
pub use types::{Defect, DefectKind, Detection, Id, Owner, ServiceHistory, Vehicle, VehicleStatus};
