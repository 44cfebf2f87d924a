//! Typed resources hydrated from wire JSON.

pub mod address;
pub mod card;
pub mod customer;
pub mod enums;
pub mod group;
pub mod segment;

pub use address::{Address, Country};
pub use card::Card;
pub use customer::{Birthday, Customer, CustomerPreferences};
pub use enums::{CardBrand, CardPrepaidType, CreationSource};
pub use group::Group;
pub use segment::Segment;
