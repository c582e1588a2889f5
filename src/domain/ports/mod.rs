pub mod enquiry_repository;
pub mod notifier;
pub mod time_service;
