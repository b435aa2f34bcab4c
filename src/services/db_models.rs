use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::Queryable;
use serde::{Deserialize, Serialize};

use crate::types::AppError;

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: BigDecimal,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct MenuGroup {
    pub id: i64,
    pub name: String,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct OrderTable {
    pub id: i64,
    pub table_group_id: Option<i64>,
    pub number_of_guests: i32,
    pub empty: bool,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct TableGroup {
    pub id: i64,
    pub created_date: NaiveDateTime,
}

/// Row of the `orders` table. Named `ClientOrder` because a plain `Order`
/// would collide with diesel's `order` clause in the query code.
#[derive(Queryable, Debug, Clone, Serialize)]
pub struct ClientOrder {
    pub id: i64,
    pub order_table_id: i64,
    pub order_status: String,
    pub ordered_time: NaiveDateTime,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct OrderLineItem {
    pub seq: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

/// Lifecycle of an order. Statuses other than `Completion` block
/// dissolving the table group the order's table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Cooking,
    Meal,
    Completion,
}

impl OrderStatus {
    pub const ACTIVE: [OrderStatus; 2] = [OrderStatus::Cooking, OrderStatus::Meal];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Cooking => "COOKING",
            OrderStatus::Meal => "MEAL",
            OrderStatus::Completion => "COMPLETION",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "COOKING" => Ok(OrderStatus::Cooking),
            "MEAL" => Ok(OrderStatus::Meal),
            "COMPLETION" => Ok(OrderStatus::Completion),
            other => Err(AppError::Validation(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_its_string_form() {
        for status in [
            OrderStatus::Cooking,
            OrderStatus::Meal,
            OrderStatus::Completion,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(matches!(
            OrderStatus::parse("SERVED"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn completion_is_not_active() {
        assert!(!OrderStatus::ACTIVE.contains(&OrderStatus::Completion));
    }
}
