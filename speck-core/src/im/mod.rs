mod buffer;
mod image;
mod raster;

pub use buffer::SpeckBuffer;
pub use image::SpeckImage;

pub use raster::Raster;
