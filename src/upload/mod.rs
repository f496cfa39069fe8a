// upload module - image compression and storage upload helper

pub mod client;
pub mod compress;

pub use client::{UploadClient, UploadError};
pub use compress::{compress_or_original, CompressOptions};
