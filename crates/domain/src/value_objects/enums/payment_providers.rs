use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    MercadoPago,
    Asaas,
    PagHiper,
}

impl PaymentProvider {
    pub fn from_str(input: &str) -> Option<Self> {
        match input {
            "mercadopago" => Some(PaymentProvider::MercadoPago),
            "asaas" => Some(PaymentProvider::Asaas),
            "paghiper" => Some(PaymentProvider::PagHiper),
            _ => None,
        }
    }
}

impl Display for PaymentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let provider = match self {
            PaymentProvider::MercadoPago => "mercadopago",
            PaymentProvider::Asaas => "asaas",
            PaymentProvider::PagHiper => "paghiper",
        };
        write!(f, "{}", provider)
    }
}
