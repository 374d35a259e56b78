pub mod errors;
pub mod page;
pub mod table;

pub use table::Table;
