mod arena;
mod node;
mod raw_rbtree;

pub(crate) use arena::Handle;
pub(crate) use raw_rbtree::RawRBTree;
