mod hash_table;
mod iter;
mod node;
mod position;
mod tests;

pub use hash_table::*;
pub use iter::*;
pub(crate) use node::*;
pub use position::*;
