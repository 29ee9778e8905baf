pub mod export;

pub use export::{WriteOutcome, write_table, write_table_to};
