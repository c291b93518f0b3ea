pub mod housing;
pub mod tax;
