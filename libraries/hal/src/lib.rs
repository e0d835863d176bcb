extern crate nalgebra;

mod imu;
mod types;

pub use imu::*;
pub use types::*;
