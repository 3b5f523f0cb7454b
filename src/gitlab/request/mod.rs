mod branch_request;
mod merge_request_request;

pub use branch_request::BranchRequest;
pub use merge_request_request::MergeRequestRequest;
