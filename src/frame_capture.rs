pub mod adapter;
pub mod convert;
pub mod frame;
pub mod point;
