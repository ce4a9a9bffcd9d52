mod buffer;
mod constants;
mod fake;
mod pods;

pub use buffer::*;
pub use constants::*;
pub use fake::*;
pub use pods::*;
