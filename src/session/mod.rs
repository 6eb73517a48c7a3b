pub mod result;
pub mod typing;
