pub mod process;
pub mod template;

pub use process::{exit_code, for_each_line, quote_argument, Process, ProcessCreator};
pub use template::substitute;
