//! Registry of Stripe resources a sync rule may target.
//!
//! Rules name their target by the SDK identifier (`customers`,
//! `invoiceItems`, ...). Each identifier resolves to a fixed create endpoint
//! when the config is loaded, so a typo never reaches the hook.

use crate::error::ResourceError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ResourceKind {
    Customers,
    Products,
    Prices,
    Coupons,
    PromotionCodes,
    Invoices,
    InvoiceItems,
    PaymentIntents,
    SetupIntents,
    PaymentMethods,
    Subscriptions,
    Plans,
    TaxRates,
    ShippingRates,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 14] = [
        ResourceKind::Customers,
        ResourceKind::Products,
        ResourceKind::Prices,
        ResourceKind::Coupons,
        ResourceKind::PromotionCodes,
        ResourceKind::Invoices,
        ResourceKind::InvoiceItems,
        ResourceKind::PaymentIntents,
        ResourceKind::SetupIntents,
        ResourceKind::PaymentMethods,
        ResourceKind::Subscriptions,
        ResourceKind::Plans,
        ResourceKind::TaxRates,
        ResourceKind::ShippingRates,
    ];

    /// Identifier used in sync rules.
    pub fn sdk_name(&self) -> &'static str {
        match self {
            ResourceKind::Customers => "customers",
            ResourceKind::Products => "products",
            ResourceKind::Prices => "prices",
            ResourceKind::Coupons => "coupons",
            ResourceKind::PromotionCodes => "promotionCodes",
            ResourceKind::Invoices => "invoices",
            ResourceKind::InvoiceItems => "invoiceItems",
            ResourceKind::PaymentIntents => "paymentIntents",
            ResourceKind::SetupIntents => "setupIntents",
            ResourceKind::PaymentMethods => "paymentMethods",
            ResourceKind::Subscriptions => "subscriptions",
            ResourceKind::Plans => "plans",
            ResourceKind::TaxRates => "taxRates",
            ResourceKind::ShippingRates => "shippingRates",
        }
    }

    /// REST path of the create endpoint.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Customers => "/v1/customers",
            ResourceKind::Products => "/v1/products",
            ResourceKind::Prices => "/v1/prices",
            ResourceKind::Coupons => "/v1/coupons",
            ResourceKind::PromotionCodes => "/v1/promotion_codes",
            ResourceKind::Invoices => "/v1/invoices",
            ResourceKind::InvoiceItems => "/v1/invoiceitems",
            ResourceKind::PaymentIntents => "/v1/payment_intents",
            ResourceKind::SetupIntents => "/v1/setup_intents",
            ResourceKind::PaymentMethods => "/v1/payment_methods",
            ResourceKind::Subscriptions => "/v1/subscriptions",
            ResourceKind::Plans => "/v1/plans",
            ResourceKind::TaxRates => "/v1/tax_rates",
            ResourceKind::ShippingRates => "/v1/shipping_rates",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sdk_name())
    }
}

// Matching ignores case and underscores so both `invoiceItems` and
// `invoice_items` resolve.
fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for ResourceKind {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        ResourceKind::ALL
            .into_iter()
            .find(|kind| normalize(kind.sdk_name()) == wanted)
            .ok_or_else(|| ResourceError::UnsupportedResource(s.to_string()))
    }
}

impl TryFrom<String> for ResourceKind {
    type Error = ResourceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for ResourceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.sdk_name())
    }
}
