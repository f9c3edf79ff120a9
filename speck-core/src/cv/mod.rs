mod binarize;
mod blob;
mod extractor;
mod pool;
mod slots;

pub use binarize::Threshold;
pub use binarize::is_nonzero;

pub use blob::Blob;

pub use slots::SlotSet;

pub use pool::SlotPool;

pub use extractor::{BlobExtractor, ScanReport, ScanStatus, extract_blobs};
