mod iter;
mod linked_list;
mod node;
mod position;

pub use iter::*;
pub use linked_list::*;
pub(crate) use node::*;
pub use position::*;
