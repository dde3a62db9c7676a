mod health;
mod issuer;

pub use health::health_check;
pub use issuer::whoami;
