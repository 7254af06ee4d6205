pub mod errors;
pub mod parser;
pub mod writer;

pub use errors::FormatError;
pub use parser::parse_agp;
pub use writer::{write_agp, write_agp_string};
