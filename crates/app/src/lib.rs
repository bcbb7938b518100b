//! `stepwise-app`
//!
//! Application shell of the training editor: the route table mapping URL
//! paths to pages, and the `stepwise` binary wiring router, client and
//! stores together.

pub mod router;

pub use router::{Page, Route, RouteError, RouteMatch, Router};
