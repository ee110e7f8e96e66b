pub mod attribution;
pub mod lifecycle;
pub mod rotation;
pub mod validate;
pub mod winner;
