pub mod backend;
pub mod config;
pub mod driver;
pub mod dtype;
pub mod error;
pub mod fixtures;
pub mod generator;
pub mod linalg;
pub mod matrix;
pub mod schedule;
pub mod util;

pub use error::{Error, Result};

extern crate matrixmultiply;
extern crate num_traits;
extern crate rand;
extern crate rand_distr;
