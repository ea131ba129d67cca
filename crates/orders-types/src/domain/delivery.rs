//! Delivery-platform order shapes. Plain data, nothing in the workspace acts on them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryOrder {
    pub order_id: String,
    pub store_id: String,
    pub order_time: String,
    pub estimated_pickup_time: String,
    pub utc_offset_minutes: String,
    pub payment_method: String,
    pub currency: String,
    pub order_code: String,
    pub allergy_info: String,
    pub special_requirements: String,
    pub estimated_total_price: f64,
    pub delivery_fee: Option<f64>,
    pub minimum_basket_surcharge: Option<f64>,
    pub customer_cash_payment_amount: f64,
    pub courier: Courier,
    pub customer: Customer,
    pub products: Vec<DeliveredProduct>,
    pub delivery_address: DeliveryAddress,
    pub bundled_orders: Vec<String>,
    pub pick_up_code: String,
    pub is_picked_up_by_customer: bool,
    pub cutlery_requested: bool,
    pub partner_discounts_products: f64,
    pub partner_discounted_products_total: f64,
    pub total_customer_to_pay: Option<f64>,
    pub loyalty_card: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Courier {
    pub name: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub name: String,
    pub phone_number: String,
    pub hash: String,
    pub invoicing_details: InvoicingDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoicingDetails {
    pub company_name: String,
    pub company_address: String,
    pub tax_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveredProduct {
    pub id: String,
    pub purchased_product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub attributes: Vec<DeliveredAttribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveredAttribute {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryAddress {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}
