pub mod health;
pub mod registrations;
