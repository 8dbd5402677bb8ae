//! Command implementations for the flip CLI, organized by area:
//!
//! - **populate**: catalog construction and price refresh
//! - **derive**: alternate-recipe derivation
//! - **scan**: profit reports
//! - **query**: item lookup, search, cost breakdown
//! - **maintenance**: snapshot status and cleanup

pub mod derive;
pub mod maintenance;
pub mod populate;
pub mod query;
pub mod scan;

pub use derive::derive;
pub use maintenance::{clean, status};
pub use populate::{init, prices};
pub use query::{cost, info, search};
pub use scan::{best, scan, use_item};
