pub mod envelope;
pub mod feedback;
pub mod resource;
pub mod tag;
pub mod to_study;
pub mod user;
