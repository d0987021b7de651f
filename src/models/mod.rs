pub mod enums;
pub mod evaluation;

pub use enums::*;
pub use evaluation::*;
