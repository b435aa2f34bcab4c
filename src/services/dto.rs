use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::services::db_models::{ClientOrder, MenuGroup, OrderLineItem, OrderTable, Product, TableGroup};

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub price: BigDecimal,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id,
            name: product.name,
            price: product.price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MenuGroupResponse {
    pub id: i64,
    pub name: String,
}

impl From<MenuGroup> for MenuGroupResponse {
    fn from(menu_group: MenuGroup) -> Self {
        MenuGroupResponse {
            id: menu_group.id,
            name: menu_group.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderTableResponse {
    pub id: i64,
    pub table_group_id: Option<i64>,
    pub number_of_guests: i32,
    pub empty: bool,
}

impl From<OrderTable> for OrderTableResponse {
    fn from(table: OrderTable) -> Self {
        OrderTableResponse {
            id: table.id,
            table_group_id: table.table_group_id,
            number_of_guests: table.number_of_guests,
            empty: table.empty,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TableGroupResponse {
    pub id: i64,
    pub created_date: NaiveDateTime,
    pub order_tables: Vec<OrderTableResponse>,
}

impl TableGroupResponse {
    pub fn of(group: TableGroup, members: Vec<OrderTable>) -> Self {
        TableGroupResponse {
            id: group.id,
            created_date: group.created_date,
            order_tables: members.into_iter().map(OrderTableResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderLineItemResponse {
    pub seq: i64,
    pub product_id: i64,
    pub quantity: i64,
}

impl From<OrderLineItem> for OrderLineItemResponse {
    fn from(item: OrderLineItem) -> Self {
        OrderLineItemResponse {
            seq: item.seq,
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i64,
    pub order_table_id: i64,
    pub order_status: String,
    pub ordered_time: NaiveDateTime,
    pub order_line_items: Vec<OrderLineItemResponse>,
}

impl OrderResponse {
    pub fn of(order: ClientOrder, line_items: Vec<OrderLineItem>) -> Self {
        OrderResponse {
            id: order.id,
            order_table_id: order.order_table_id,
            order_status: order.order_status,
            ordered_time: order.ordered_time,
            order_line_items: line_items
                .into_iter()
                .map(OrderLineItemResponse::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_group_response_carries_all_members() {
        let group = TableGroup {
            id: 7,
            created_date: chrono::Utc::now().naive_utc(),
        };
        let members = vec![
            OrderTable {
                id: 1,
                table_group_id: Some(7),
                number_of_guests: 2,
                empty: false,
            },
            OrderTable {
                id: 2,
                table_group_id: Some(7),
                number_of_guests: 4,
                empty: false,
            },
        ];

        let resp = TableGroupResponse::of(group, members);

        assert_eq!(resp.id, 7);
        assert_eq!(resp.order_tables.len(), 2);
        assert!(resp
            .order_tables
            .iter()
            .all(|t| t.table_group_id == Some(7) && !t.empty));
    }

    #[test]
    fn order_table_response_preserves_ungrouped_state() {
        let table = OrderTable {
            id: 3,
            table_group_id: None,
            number_of_guests: 0,
            empty: true,
        };

        let resp = OrderTableResponse::from(table);

        assert_eq!(resp.table_group_id, None);
        assert!(resp.empty);
    }
}
