pub mod definitions;
pub mod error;
pub mod file_type;
pub mod tags;

pub use error::*;
pub use file_type::*;
pub use tags::*;
