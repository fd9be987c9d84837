//! In-memory integration tests.
//!
//! Tests are organized into modules by functionality:
//! - `draft_store_tests`: Draft collection insert, replace and remove
//! - `work_bucket_tests`: Bucket loading for a person's works end to end
//! - `share_flow_tests`: Company hierarchy feeding a share session

mod in_memory {
    pub mod helpers;

    mod draft_store_tests;
    mod share_flow_tests;
    mod work_bucket_tests;
}
