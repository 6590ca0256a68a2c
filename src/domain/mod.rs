pub mod page;
pub mod sample;
