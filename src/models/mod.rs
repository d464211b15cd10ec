mod envelope;
mod error_data;
mod exception_data;
mod key_value;
mod stack_trace;

pub use envelope::*;
pub use error_data::*;
pub use exception_data::*;
pub use key_value::*;
pub use stack_trace::*;
