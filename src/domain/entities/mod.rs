pub mod enquiry;
pub mod response;

pub use enquiry::*;
pub use response::*;
