pub mod get;
pub mod path;
pub mod set;
pub mod show;
