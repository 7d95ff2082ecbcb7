//! The payload module contains the components responsible for decoding and
//! presenting register values: the base-10 floating point format and the
//! register output model.

pub mod float;
pub mod register;

pub use float::{FloatCodec, IntOrFloat};
pub use register::{warn_registers_unknowns, RegisterOutput};
