pub mod document;
pub mod impl_file;
pub mod impl_in_memory;
pub mod interface;
pub mod record;
