//! Transport adapter and route building.

pub mod client;
pub mod route;

pub use client::{CustomerPage, GroupPage, HttpClient, SegmentPage};
pub use route::{PathParam, ResolvedRoute, Route};
