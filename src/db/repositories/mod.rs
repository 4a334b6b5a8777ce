mod appointment_repository;
mod blackout_repository;
mod directory_repository;

pub use appointment_repository::AppointmentRepository;
pub use blackout_repository::BlackoutRepository;
pub use directory_repository::DirectoryRepository;
