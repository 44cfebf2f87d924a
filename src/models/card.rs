use serde::Deserialize;

use crate::models::{Address, CardBrand, CardPrepaidType};

/// A card on file for a customer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Card {
    pub id: Option<String>,
    pub billing_address: Option<Address>,
    /// First six digits of the card number.
    pub bin: Option<String>,
    pub card_brand: Option<CardBrand>,
    pub card_type: Option<String>,
    pub cardholder_name: Option<String>,
    pub exp_month: Option<u32>,
    pub exp_year: Option<u32>,
    pub fingerprint: Option<String>,
    pub last_4: Option<String>,
    pub prepaid_type: Option<CardPrepaidType>,
}
