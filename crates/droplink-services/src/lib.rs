//! Business services: upload/download orchestration and the expiry reaper.

mod cleanup;
mod purge;
mod qr;
mod transfer;

pub use cleanup::CleanupService;
pub use qr::qr_data_url;
pub use transfer::{TransferService, UploadReceipt, UploadedFile};
