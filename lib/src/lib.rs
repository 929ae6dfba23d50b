mod codec;
mod error;
mod heap;
mod point;
mod reduce;
mod visvalingam;

pub use codec::*;
pub use error::*;
pub use point::*;
pub use reduce::*;
pub use visvalingam::*;
