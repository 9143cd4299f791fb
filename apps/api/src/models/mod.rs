pub mod job;
pub mod profile;

pub use job::{
    CompanySize, ExperienceLevel, JobRecord, JobSource, LocationType, SalaryRange,
};
pub use profile::{CandidateProfile, LocationPreference, ProfileError, ProfileRequest};
