//! Linked collection types. Primarily revolves around [`LinkedList`] and its accompanying
//! [`ListPosition`] type.

pub mod list;

#[doc(inline)]
pub use list::{LinkedList, ListPosition};
