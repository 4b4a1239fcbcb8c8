mod job_repository;
mod post_repository;
mod profile_repository;
mod reel_repository;

pub use job_repository::JobRepository;
pub use post_repository::PostRepository;
pub use profile_repository::ProfileRepository;
pub use reel_repository::ReelRepository;
