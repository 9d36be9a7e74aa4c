pub mod examples;
pub mod health;
pub mod index;
pub mod respond;
