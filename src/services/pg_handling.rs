use std::collections::HashSet;

use actix::Handler;
use diesel::dsl::exists;
use diesel::{
    r2d2::{ConnectionManager, Pool, PooledConnection},
    ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl,
};

use crate::services::db_models::{
    ClientOrder, MenuGroup, OrderLineItem, OrderStatus, OrderTable, Product, TableGroup,
};
use crate::services::db_utils::PgActor;
use crate::services::dto::{
    MenuGroupResponse, OrderResponse, OrderTableResponse, ProductResponse, TableGroupResponse,
};
use crate::services::insertable::{
    NewMenuGroup, NewOrder, NewOrderLineItem, NewOrderTable, NewProduct, NewTableGroup,
};
use crate::services::messages::{
    ChangeGuestCount, ChangeOrderStatus, ChangeTableEmpty, CreateMenuGroup, CreateOrder,
    CreateProduct, CreateTable, FetchMenuGroups, FetchOrders, FetchProduct, FetchProducts,
    FetchTable, FetchTables, GroupTables, UngroupTables,
};
use crate::types::{AppError, Name, Price, MINIMUM_GROUP_TABLES};

fn establish_connection(
    pool: &Pool<ConnectionManager<PgConnection>>,
) -> Result<PooledConnection<ConnectionManager<PgConnection>>, AppError> {
    match pool.get() {
        Ok(val) => Ok(val),
        Err(err) => Err(AppError::Pool(err.to_string())),
    }
}

fn check_guest_count(number_of_guests: i32) -> Result<(), AppError> {
    if number_of_guests < 0 {
        return Err(AppError::Validation(
            "number of guests must not be negative".to_owned(),
        ));
    }
    Ok(())
}

// Duplicate ids are rejected rather than deduplicated, so the persisted
// member count always equals the requested count.
fn check_group_request(order_table_ids: &[i64]) -> Result<(), AppError> {
    if order_table_ids.len() < MINIMUM_GROUP_TABLES {
        return Err(AppError::Validation(format!(
            "at least {MINIMUM_GROUP_TABLES} tables are required to form a group"
        )));
    }

    let distinct: HashSet<i64> = order_table_ids.iter().copied().collect();
    if distinct.len() != order_table_ids.len() {
        return Err(AppError::Validation(
            "group request contains duplicate table ids".to_owned(),
        ));
    }

    Ok(())
}

fn check_group_candidates(requested: usize, tables: &[OrderTable]) -> Result<(), AppError> {
    if tables.len() < requested {
        return Err(AppError::NotFound(
            "some of the requested order tables are not registered".to_owned(),
        ));
    }

    for table in tables {
        if !table.empty {
            return Err(AppError::Conflict(format!(
                "table {} is not empty and cannot be grouped",
                table.id
            )));
        }
        if table.table_group_id.is_some() {
            return Err(AppError::Conflict(format!(
                "table {} already belongs to a table group",
                table.id
            )));
        }
    }

    Ok(())
}

fn check_not_grouped(table: &OrderTable) -> Result<(), AppError> {
    if table.table_group_id.is_some() {
        return Err(AppError::Conflict(format!(
            "table {} belongs to a table group and cannot change its empty state",
            table.id
        )));
    }
    Ok(())
}

fn check_not_empty(table: &OrderTable) -> Result<(), AppError> {
    if table.empty {
        return Err(AppError::Conflict(format!("table {} is empty", table.id)));
    }
    Ok(())
}

fn active_statuses() -> [&'static str; 2] {
    OrderStatus::ACTIVE.map(|status| status.as_str())
}

impl Handler<CreateProduct> for PgActor {
    type Result = Result<ProductResponse, AppError>;

    fn handle(&mut self, msg: CreateProduct, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::products::dsl::products;

        let name = Name::new(&msg.name)?;
        let price = Price::new(msg.price)?;

        let mut conn = establish_connection(&self.0)?;

        let product = diesel::insert_into(products)
            .values(NewProduct {
                name: name.into_inner(),
                price: price.into_inner(),
            })
            .get_result::<Product>(&mut conn)?;

        Ok(product.into())
    }
}

impl Handler<FetchProducts> for PgActor {
    type Result = Result<Vec<ProductResponse>, AppError>;

    fn handle(&mut self, _msg: FetchProducts, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::products::dsl::products;
        use crate::schema::products::id;

        let mut conn = establish_connection(&self.0)?;

        let rows = products.order(id.asc()).get_results::<Product>(&mut conn)?;

        Ok(rows.into_iter().map(ProductResponse::from).collect())
    }
}

impl Handler<FetchProduct> for PgActor {
    type Result = Result<ProductResponse, AppError>;

    fn handle(&mut self, msg: FetchProduct, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::products::dsl::products;

        let mut conn = establish_connection(&self.0)?;

        let product = products
            .find(msg.0)
            .first::<Product>(&mut conn)
            .optional()?
            .ok_or_else(|| AppError::NotFound(format!("product {} is not registered", msg.0)))?;

        Ok(product.into())
    }
}

impl Handler<CreateMenuGroup> for PgActor {
    type Result = Result<MenuGroupResponse, AppError>;

    fn handle(&mut self, msg: CreateMenuGroup, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::menu_groups::dsl::menu_groups;

        let name = Name::new(&msg.name)?;

        let mut conn = establish_connection(&self.0)?;

        let menu_group = diesel::insert_into(menu_groups)
            .values(NewMenuGroup {
                name: name.into_inner(),
            })
            .get_result::<MenuGroup>(&mut conn)?;

        Ok(menu_group.into())
    }
}

impl Handler<FetchMenuGroups> for PgActor {
    type Result = Result<Vec<MenuGroupResponse>, AppError>;

    fn handle(&mut self, _msg: FetchMenuGroups, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::menu_groups::dsl::menu_groups;
        use crate::schema::menu_groups::id;

        let mut conn = establish_connection(&self.0)?;

        let rows = menu_groups
            .order(id.asc())
            .get_results::<MenuGroup>(&mut conn)?;

        Ok(rows.into_iter().map(MenuGroupResponse::from).collect())
    }
}

impl Handler<CreateTable> for PgActor {
    type Result = Result<OrderTableResponse, AppError>;

    fn handle(&mut self, msg: CreateTable, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_tables::dsl::order_tables;

        check_guest_count(msg.number_of_guests)?;

        let mut conn = establish_connection(&self.0)?;

        let table = diesel::insert_into(order_tables)
            .values(NewOrderTable {
                number_of_guests: msg.number_of_guests,
                empty: msg.empty,
            })
            .get_result::<OrderTable>(&mut conn)?;

        Ok(table.into())
    }
}

impl Handler<FetchTables> for PgActor {
    type Result = Result<Vec<OrderTableResponse>, AppError>;

    fn handle(&mut self, _msg: FetchTables, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_tables::dsl::order_tables;
        use crate::schema::order_tables::id;

        let mut conn = establish_connection(&self.0)?;

        let rows = order_tables
            .order(id.asc())
            .get_results::<OrderTable>(&mut conn)?;

        Ok(rows.into_iter().map(OrderTableResponse::from).collect())
    }
}

impl Handler<FetchTable> for PgActor {
    type Result = Result<OrderTableResponse, AppError>;

    fn handle(&mut self, msg: FetchTable, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_tables::dsl::order_tables;

        let mut conn = establish_connection(&self.0)?;

        let table = order_tables
            .find(msg.0)
            .first::<OrderTable>(&mut conn)
            .optional()?
            .ok_or_else(|| AppError::NotFound(format!("table {} is not registered", msg.0)))?;

        Ok(table.into())
    }
}

impl Handler<ChangeTableEmpty> for PgActor {
    type Result = Result<OrderTableResponse, AppError>;

    fn handle(&mut self, msg: ChangeTableEmpty, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_tables::{dsl::order_tables, empty};
        use crate::schema::orders::{dsl::orders, order_status, order_table_id};

        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let table = order_tables
                .find(msg.table_id)
                .first::<OrderTable>(trx_conn)
                .optional()?
                .ok_or_else(|| {
                    AppError::NotFound(format!("table {} is not registered", msg.table_id))
                })?;

            check_not_grouped(&table)?;

            let has_active_order = diesel::select(exists(
                orders
                    .filter(order_table_id.eq(msg.table_id))
                    .filter(order_status.eq_any(active_statuses())),
            ))
            .get_result::<bool>(trx_conn)?;

            if has_active_order {
                return Err(AppError::Conflict(format!(
                    "table {} has orders in progress",
                    table.id
                )));
            }

            let updated = diesel::update(order_tables.find(msg.table_id))
                .set(empty.eq(msg.empty))
                .get_result::<OrderTable>(trx_conn)?;

            Ok(updated.into())
        })
    }
}

impl Handler<ChangeGuestCount> for PgActor {
    type Result = Result<OrderTableResponse, AppError>;

    fn handle(&mut self, msg: ChangeGuestCount, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_tables::{dsl::order_tables, number_of_guests};

        check_guest_count(msg.number_of_guests)?;

        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let table = order_tables
                .find(msg.table_id)
                .first::<OrderTable>(trx_conn)
                .optional()?
                .ok_or_else(|| {
                    AppError::NotFound(format!("table {} is not registered", msg.table_id))
                })?;

            check_not_empty(&table)?;

            let updated = diesel::update(order_tables.find(msg.table_id))
                .set(number_of_guests.eq(msg.number_of_guests))
                .get_result::<OrderTable>(trx_conn)?;

            Ok(updated.into())
        })
    }
}

impl Handler<GroupTables> for PgActor {
    type Result = Result<TableGroupResponse, AppError>;

    fn handle(&mut self, msg: GroupTables, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_tables::{
            dsl::order_tables, empty, id as table_pk, table_group_id,
        };
        use crate::schema::table_groups::dsl::table_groups;

        check_group_request(&msg.order_table_ids)?;

        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let candidates = order_tables
                .filter(table_pk.eq_any(&msg.order_table_ids))
                .get_results::<OrderTable>(trx_conn)?;

            check_group_candidates(msg.order_table_ids.len(), &candidates)?;

            let group = diesel::insert_into(table_groups)
                .values(NewTableGroup {
                    created_date: chrono::Utc::now().naive_utc(),
                })
                .get_result::<TableGroup>(trx_conn)?;

            // Grouping seats every member table.
            diesel::update(order_tables.filter(table_pk.eq_any(&msg.order_table_ids)))
                .set((table_group_id.eq(Some(group.id)), empty.eq(false)))
                .execute(trx_conn)?;

            let members = order_tables
                .filter(table_group_id.eq(Some(group.id)))
                .order(table_pk.asc())
                .get_results::<OrderTable>(trx_conn)?;

            tracing::info!(group_id = group.id, tables = ?msg.order_table_ids, "grouped tables");

            Ok(TableGroupResponse::of(group, members))
        })
    }
}

impl Handler<UngroupTables> for PgActor {
    type Result = Result<(), AppError>;

    fn handle(&mut self, msg: UngroupTables, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_tables::{dsl::order_tables, id as table_pk, table_group_id};
        use crate::schema::orders::{dsl::orders, order_status, order_table_id};

        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let members = order_tables
                .filter(table_group_id.eq(Some(msg.0)))
                .get_results::<OrderTable>(trx_conn)?;

            // Nothing references the group anymore, ungrouping is a no-op.
            if members.is_empty() {
                return Ok(());
            }

            let member_ids: Vec<i64> = members.iter().map(|table| table.id).collect();

            let has_active_order = diesel::select(exists(
                orders
                    .filter(order_table_id.eq_any(&member_ids))
                    .filter(order_status.eq_any(active_statuses())),
            ))
            .get_result::<bool>(trx_conn)?;

            if has_active_order {
                return Err(AppError::Conflict(
                    "cannot ungroup tables with orders in progress".to_owned(),
                ));
            }

            // The group row stays behind as an inert record, only the
            // membership is dissolved.
            diesel::update(order_tables.filter(table_pk.eq_any(&member_ids)))
                .set(table_group_id.eq(None::<i64>))
                .execute(trx_conn)?;

            tracing::info!(group_id = msg.0, tables = ?member_ids, "ungrouped tables");

            Ok(())
        })
    }
}

impl Handler<CreateOrder> for PgActor {
    type Result = Result<OrderResponse, AppError>;

    fn handle(&mut self, msg: CreateOrder, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_line_items::{dsl::order_line_items, order_id};
        use crate::schema::order_tables::dsl::order_tables;
        use crate::schema::orders::dsl::orders;
        use crate::schema::products::{dsl::products, id as product_pk};

        if msg.order_line_items.is_empty() {
            return Err(AppError::Validation(
                "an order must contain at least one line item".to_owned(),
            ));
        }

        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let product_ids: Vec<i64> = msg
                .order_line_items
                .iter()
                .map(|item| item.product_id)
                .collect();

            let registered = products
                .filter(product_pk.eq_any(&product_ids))
                .count()
                .get_result::<i64>(trx_conn)?;

            if registered != product_ids.len() as i64 {
                return Err(AppError::NotFound(
                    "some of the ordered products are not registered".to_owned(),
                ));
            }

            let table = order_tables
                .find(msg.order_table_id)
                .first::<OrderTable>(trx_conn)
                .optional()?
                .ok_or_else(|| {
                    AppError::NotFound(format!("table {} is not registered", msg.order_table_id))
                })?;

            check_not_empty(&table)?;

            let order = diesel::insert_into(orders)
                .values(NewOrder {
                    order_table_id: table.id,
                    order_status: OrderStatus::Cooking.as_str().to_owned(),
                    ordered_time: chrono::Utc::now().naive_utc(),
                })
                .get_result::<ClientOrder>(trx_conn)?;

            for item in &msg.order_line_items {
                diesel::insert_into(order_line_items)
                    .values(NewOrderLineItem {
                        order_id: order.id,
                        product_id: item.product_id,
                        quantity: item.quantity,
                    })
                    .execute(trx_conn)?;
            }

            let line_items = order_line_items
                .filter(order_id.eq(order.id))
                .get_results::<OrderLineItem>(trx_conn)?;

            tracing::info!(order_id = order.id, table_id = table.id, "created order");

            Ok(OrderResponse::of(order, line_items))
        })
    }
}

impl Handler<FetchOrders> for PgActor {
    type Result = Result<Vec<OrderResponse>, AppError>;

    fn handle(&mut self, _msg: FetchOrders, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_line_items::dsl::order_line_items;
        use crate::schema::orders::dsl::orders;
        use crate::schema::orders::id;

        let mut conn = establish_connection(&self.0)?;

        let rows = orders.order(id.asc()).get_results::<ClientOrder>(&mut conn)?;
        let items = order_line_items.get_results::<OrderLineItem>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let order_items = items
                    .iter()
                    .filter(|item| item.order_id == row.id)
                    .cloned()
                    .collect();
                OrderResponse::of(row, order_items)
            })
            .collect())
    }
}

impl Handler<ChangeOrderStatus> for PgActor {
    type Result = Result<OrderResponse, AppError>;

    fn handle(&mut self, msg: ChangeOrderStatus, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_line_items::{dsl::order_line_items, order_id};
        use crate::schema::orders::{dsl::orders, order_status};

        let next_status = OrderStatus::parse(&msg.order_status)?;

        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let order = orders
                .find(msg.order_id)
                .first::<ClientOrder>(trx_conn)
                .optional()?
                .ok_or_else(|| {
                    AppError::NotFound(format!("order {} is not registered", msg.order_id))
                })?;

            if order.order_status == OrderStatus::Completion.as_str() {
                return Err(AppError::Conflict(format!(
                    "order {} is already completed",
                    order.id
                )));
            }

            let updated = diesel::update(orders.find(msg.order_id))
                .set(order_status.eq(next_status.as_str()))
                .get_result::<ClientOrder>(trx_conn)?;

            let line_items = order_line_items
                .filter(order_id.eq(updated.id))
                .get_results::<OrderLineItem>(trx_conn)?;

            Ok(OrderResponse::of(updated, line_items))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(id: i64, table_group_id: Option<i64>, empty: bool) -> OrderTable {
        OrderTable {
            id,
            table_group_id,
            number_of_guests: 0,
            empty,
        }
    }

    #[test]
    fn group_request_needs_at_least_two_tables() {
        assert!(matches!(
            check_group_request(&[]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            check_group_request(&[1]),
            Err(AppError::Validation(_))
        ));
        assert!(check_group_request(&[1, 2]).is_ok());
    }

    #[test]
    fn group_request_rejects_duplicate_ids() {
        assert!(matches!(
            check_group_request(&[1, 1]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            check_group_request(&[1, 2, 1]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn missing_candidates_are_reported_as_not_found() {
        let fetched = vec![table(1, None, true)];

        assert!(matches!(
            check_group_candidates(2, &fetched),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn occupied_candidate_blocks_grouping() {
        let fetched = vec![table(1, None, true), table(2, None, false)];

        assert!(matches!(
            check_group_candidates(2, &fetched),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn already_grouped_candidate_blocks_grouping() {
        let fetched = vec![table(1, Some(9), true), table(2, Some(9), true)];

        assert!(matches!(
            check_group_candidates(2, &fetched),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn empty_ungrouped_candidates_are_accepted() {
        let fetched = vec![table(1, None, true), table(2, None, true)];

        assert!(check_group_candidates(2, &fetched).is_ok());
    }

    #[test]
    fn grouped_table_cannot_change_empty_state() {
        assert!(matches!(
            check_not_grouped(&table(1, Some(5), true)),
            Err(AppError::Conflict(_))
        ));
        assert!(check_not_grouped(&table(1, None, true)).is_ok());
    }

    #[test]
    fn empty_table_cannot_seat_guests() {
        assert!(matches!(
            check_not_empty(&table(1, None, true)),
            Err(AppError::Conflict(_))
        ));
        assert!(check_not_empty(&table(1, None, false)).is_ok());
    }

    #[test]
    fn negative_guest_count_is_rejected() {
        assert!(matches!(
            check_guest_count(-1),
            Err(AppError::Validation(_))
        ));
        assert!(check_guest_count(0).is_ok());
        assert!(check_guest_count(4).is_ok());
    }

    #[test]
    fn active_statuses_exclude_completion() {
        let statuses = active_statuses();

        assert_eq!(statuses, ["COOKING", "MEAL"]);
        assert!(!statuses.contains(&OrderStatus::Completion.as_str()));
    }
}
