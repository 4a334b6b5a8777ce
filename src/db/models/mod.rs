mod appointment;
mod barber;
mod blackout;
mod customer;
mod service;

pub use appointment::*;
pub use barber::*;
pub use blackout::*;
pub use customer::*;
pub use service::*;
