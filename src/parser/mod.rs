//! Parsers for rendered page snapshots.
//!
//! Both parsers work on the HTML returned by the browser after rendering, not
//! on live driver elements, so they are pure and testable against fixtures.

pub mod event;
pub mod links;
pub mod strategy;

pub use event::extract_event;
pub use links::discover_links;
