//! HTTP clients for the upstream feedback and company APIs

mod companies;
mod reviews;

pub use companies::{CompanyClient, CompanyDirectoryEntry, CompanyProfile};
pub use reviews::ReviewsClient;
