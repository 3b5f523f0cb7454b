mod branch_response;
mod page;
mod pull_request_response;

pub use branch_response::BranchResponse;
pub use page::Page;
pub use pull_request_response::PullRequestResponse;
