pub mod constellation;
pub mod expressive;
