//! Protocol types shared between the slicing SDK and its callers.

mod record;
mod request_option;
mod wire;

pub use record::*;
pub use request_option::*;
pub use wire::*;
