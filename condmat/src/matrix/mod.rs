mod dims;
mod debug;
mod owned;
mod approx;

pub use dims::*;
pub use owned::*;
