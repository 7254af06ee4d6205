pub mod driver;
pub mod errors;
pub mod lexer;

pub use driver::run_script;
pub use errors::ScriptError;
pub use lexer::Tokens;
