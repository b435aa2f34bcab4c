use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::Insertable;
use serde::Serialize;

use crate::schema::menu_groups;
use crate::schema::order_line_items;
use crate::schema::order_tables;
use crate::schema::orders;
use crate::schema::products;
use crate::schema::table_groups;

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = products)]
pub struct NewProduct {
    pub name: String,
    pub price: BigDecimal,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = menu_groups)]
pub struct NewMenuGroup {
    pub name: String,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = order_tables)]
pub struct NewOrderTable {
    pub number_of_guests: i32,
    pub empty: bool,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = table_groups)]
pub struct NewTableGroup {
    pub created_date: NaiveDateTime,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub order_table_id: i64,
    pub order_status: String,
    pub ordered_time: NaiveDateTime,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = order_line_items)]
pub struct NewOrderLineItem {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}
