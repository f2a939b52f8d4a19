pub mod security;

pub use security::{security_gate, SecurityPolicy};
