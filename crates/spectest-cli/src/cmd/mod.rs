pub mod complete;
pub mod completion;
pub mod list;
