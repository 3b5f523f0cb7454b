mod branch_response;
mod merge_request_response;

pub use branch_response::BranchResponse;
pub use merge_request_response::MergeRequestResponse;
