use actix::Message;
use bigdecimal::BigDecimal;

use crate::services::dto::{
    MenuGroupResponse, OrderResponse, OrderTableResponse, ProductResponse, TableGroupResponse,
};
use crate::types::AppError;

#[derive(Message)]
#[rtype(result = "Result<ProductResponse, AppError>")]
pub struct CreateProduct {
    pub name: String,
    pub price: BigDecimal,
}

#[derive(Message)]
#[rtype(result = "Result<Vec<ProductResponse>, AppError>")]
pub struct FetchProducts;

#[derive(Message)]
#[rtype(result = "Result<ProductResponse, AppError>")]
pub struct FetchProduct(pub i64);

#[derive(Message)]
#[rtype(result = "Result<MenuGroupResponse, AppError>")]
pub struct CreateMenuGroup {
    pub name: String,
}

#[derive(Message)]
#[rtype(result = "Result<Vec<MenuGroupResponse>, AppError>")]
pub struct FetchMenuGroups;

#[derive(Message)]
#[rtype(result = "Result<OrderTableResponse, AppError>")]
pub struct CreateTable {
    pub number_of_guests: i32,
    pub empty: bool,
}

#[derive(Message)]
#[rtype(result = "Result<Vec<OrderTableResponse>, AppError>")]
pub struct FetchTables;

#[derive(Message)]
#[rtype(result = "Result<OrderTableResponse, AppError>")]
pub struct FetchTable(pub i64);

#[derive(Message)]
#[rtype(result = "Result<OrderTableResponse, AppError>")]
pub struct ChangeTableEmpty {
    pub table_id: i64,
    pub empty: bool,
}

#[derive(Message)]
#[rtype(result = "Result<OrderTableResponse, AppError>")]
pub struct ChangeGuestCount {
    pub table_id: i64,
    pub number_of_guests: i32,
}

#[derive(Message)]
#[rtype(result = "Result<TableGroupResponse, AppError>")]
pub struct GroupTables {
    pub order_table_ids: Vec<i64>,
}

#[derive(Message)]
#[rtype(result = "Result<(), AppError>")]
pub struct UngroupTables(pub i64);

pub struct OrderLineItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Message)]
#[rtype(result = "Result<OrderResponse, AppError>")]
pub struct CreateOrder {
    pub order_table_id: i64,
    pub order_line_items: Vec<OrderLineItemRequest>,
}

#[derive(Message)]
#[rtype(result = "Result<Vec<OrderResponse>, AppError>")]
pub struct FetchOrders;

#[derive(Message)]
#[rtype(result = "Result<OrderResponse, AppError>")]
pub struct ChangeOrderStatus {
    pub order_id: i64,
    pub order_status: String,
}
