pub mod data_repository;
pub mod task;
