//! Router-level tests driving the HTTP API with in-memory adapters.
//!
//! - `issue_route_tests`: reporting, listing, status changes and deletion
//! - `product_route_tests`: catalog reads and staff-only writes
//! - `user_route_tests`: profile lookup, sign-out and health

mod http_api {
    pub mod helpers;

    mod issue_route_tests;
    mod product_route_tests;
    mod user_route_tests;
}
