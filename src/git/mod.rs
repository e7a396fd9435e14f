pub mod remote;
pub mod repo;
pub mod tracking;
