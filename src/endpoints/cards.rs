use serde::Serialize;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::{Address, Card};

/// Card operations, scoped to a customer profile.
#[derive(Debug, Clone, Copy)]
pub struct Cards<'a> {
    http: &'a HttpClient,
}

impl<'a> Cards<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Stores a card on file for the customer.
    pub async fn create(&self, customer_id: &str, card: CreateCard) -> Result<Card, ApiError> {
        self.http.create_card(customer_id, &card).await
    }

    /// Removes a card on file from the customer.
    pub async fn delete(&self, customer_id: &str, card_id: &str) -> Result<(), ApiError> {
        self.http.delete_card(customer_id, card_id).await
    }
}

/// Fields for storing a card on file.
///
/// The card nonce comes from the payment form and is mandatory, so it is a
/// constructor argument rather than an optional field.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCard {
    card_nonce: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,
}

impl CreateCard {
    pub fn new(card_nonce: impl Into<String>) -> Self {
        Self {
            card_nonce: card_nonce.into(),
            billing_address: None,
            cardholder_name: None,
        }
    }

    pub fn billing_address(mut self, address: Address) -> Self {
        self.billing_address = Some(address);
        self
    }

    pub fn cardholder_name(mut self, name: impl Into<String>) -> Self {
        self.cardholder_name = Some(name.into());
        self
    }
}
