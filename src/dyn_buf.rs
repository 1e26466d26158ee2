mod buffer;
mod inner;

pub use buffer::DynBuf;
