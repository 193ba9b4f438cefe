pub mod dir;
pub mod fixture;

pub use dir::SourceDir;
