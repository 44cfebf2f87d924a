//! Per-resource endpoint groups, borrowed from a [`SquareClient`](crate::SquareClient).

pub mod cards;
pub mod customers;
pub mod groups;
pub mod segments;

pub use cards::{Cards, CreateCard};
pub use customers::{CreateCustomer, Customers, ListCustomers, UpdateCustomer};
pub use groups::Groups;
pub use segments::Segments;
