pub mod alloc;
pub mod error;
pub mod fmt;
pub mod hash;
pub mod panic;
pub mod range;
pub mod result;
