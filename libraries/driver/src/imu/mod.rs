// Inertial sensor drivers
//
// Each chip exposes the capability traits from `hal` that match what it
// physically measures. Combined chips implement more than one.

pub mod l3g;
pub mod lis3mdl;
pub mod lsm303d;
pub mod lsm6;

pub use self::l3g::L3g;
pub use self::lis3mdl::Lis3mdl;
pub use self::lsm303d::Lsm303d;
pub use self::lsm6::Lsm6;
