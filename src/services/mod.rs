use actix_web::{get, HttpResponse, Responder};

pub mod db_models;
pub mod db_utils;
pub mod dto;
pub mod insertable;
pub mod messages;
pub mod pg_handling;

#[get("/")]
pub async fn home_page() -> impl Responder {
    HttpResponse::Ok().body("Restaurant point-of-sale back end")
}

// sub-route "/products"
pub mod product_route {
    use actix_web::web::{Data, Json, Path};
    use actix_web::{get, post, HttpResponse, Responder, ResponseError};
    use bigdecimal::BigDecimal;
    use serde::Deserialize;

    use crate::services::db_utils::AppState;
    use crate::services::messages::{CreateProduct, FetchProduct, FetchProducts};

    #[derive(Deserialize)]
    pub struct CreateProductBody {
        pub name: String,
        pub price: BigDecimal,
    }

    #[post("/create")]
    pub async fn create_product(state: Data<AppState>, body: Json<CreateProductBody>) -> impl Responder {
        match state.pg_db.send(CreateProduct {
            name: body.name.clone(),
            price: body.price.clone(),
        }).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}"))
        }
    }

    #[get("/all")]
    pub async fn fetch_products(state: Data<AppState>) -> impl Responder {
        match state.pg_db.send(FetchProducts).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to retrieve products: {err}"))
        }
    }

    #[get("/{id}")]
    pub async fn get_product(state: Data<AppState>, path: Path<i64>) -> impl Responder {
        match state.pg_db.send(FetchProduct(path.into_inner())).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to fetch product: {err}"))
        }
    }
}

// sub-route "/menu-groups"
pub mod menu_group_route {
    use actix_web::web::{Data, Json};
    use actix_web::{get, post, HttpResponse, Responder, ResponseError};
    use serde::Deserialize;

    use crate::services::db_utils::AppState;
    use crate::services::messages::{CreateMenuGroup, FetchMenuGroups};

    #[derive(Deserialize)]
    pub struct CreateMenuGroupBody {
        pub name: String,
    }

    #[post("/create")]
    pub async fn create_menu_group(state: Data<AppState>, body: Json<CreateMenuGroupBody>) -> impl Responder {
        match state.pg_db.send(CreateMenuGroup { name: body.name.clone() }).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}"))
        }
    }

    #[get("/all")]
    pub async fn fetch_menu_groups(state: Data<AppState>) -> impl Responder {
        match state.pg_db.send(FetchMenuGroups).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to retrieve menu groups: {err}"))
        }
    }
}

// sub-route "/tables"
pub mod table_route {
    use actix_web::web::{Data, Json, Path};
    use actix_web::{get, post, put, HttpResponse, Responder, ResponseError};
    use serde::Deserialize;

    use crate::services::db_utils::AppState;
    use crate::services::messages::{
        ChangeGuestCount, ChangeTableEmpty, CreateTable, FetchTable, FetchTables,
    };

    #[derive(Deserialize)]
    pub struct CreateTableBody {
        pub number_of_guests: Option<i32>,
        pub empty: Option<bool>,
    }

    #[derive(Deserialize)]
    pub struct ChangeEmptyBody {
        pub empty: bool,
    }

    #[derive(Deserialize)]
    pub struct ChangeGuestsBody {
        pub number_of_guests: i32,
    }

    #[post("/create")]
    pub async fn create_table(state: Data<AppState>, body: Json<CreateTableBody>) -> impl Responder {
        match state.pg_db.send(CreateTable {
            number_of_guests: body.number_of_guests.unwrap_or(0),
            empty: body.empty.unwrap_or(true),
        }).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}"))
        }
    }

    #[get("/all")]
    pub async fn fetch_tables(state: Data<AppState>) -> impl Responder {
        match state.pg_db.send(FetchTables).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to retrieve tables: {err}"))
        }
    }

    #[get("/{id}")]
    pub async fn get_table(state: Data<AppState>, path: Path<i64>) -> impl Responder {
        match state.pg_db.send(FetchTable(path.into_inner())).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to fetch table: {err}"))
        }
    }

    #[put("/{id}/empty")]
    pub async fn change_empty(state: Data<AppState>, path: Path<i64>, body: Json<ChangeEmptyBody>) -> impl Responder {
        match state.pg_db.send(ChangeTableEmpty {
            table_id: path.into_inner(),
            empty: body.empty,
        }).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}"))
        }
    }

    #[put("/{id}/guests")]
    pub async fn change_number_of_guests(state: Data<AppState>, path: Path<i64>, body: Json<ChangeGuestsBody>) -> impl Responder {
        match state.pg_db.send(ChangeGuestCount {
            table_id: path.into_inner(),
            number_of_guests: body.number_of_guests,
        }).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}"))
        }
    }
}

// sub-route "/table-groups"
pub mod table_group_route {
    use actix_web::web::{Data, Json, Path};
    use actix_web::{delete, post, HttpResponse, Responder, ResponseError};
    use serde::Deserialize;

    use crate::services::db_utils::AppState;
    use crate::services::messages::{GroupTables, UngroupTables};

    #[derive(Deserialize)]
    pub struct GroupTablesBody {
        pub order_table_ids: Vec<i64>,
    }

    #[post("/create")]
    pub async fn group_tables(state: Data<AppState>, body: Json<GroupTablesBody>) -> impl Responder {
        match state.pg_db.send(GroupTables {
            order_table_ids: body.order_table_ids.clone(),
        }).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}"))
        }
    }

    #[delete("/{id}")]
    pub async fn ungroup_tables(state: Data<AppState>, path: Path<i64>) -> impl Responder {
        let group_id = path.into_inner();

        match state.pg_db.send(UngroupTables(group_id)).await {
            Ok(Ok(_)) => HttpResponse::Ok().json(format!("Table group {group_id} is dissolved")),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}"))
        }
    }
}

// sub-route "/orders"
pub mod order_route {
    use actix_web::web::{Data, Json, Path};
    use actix_web::{get, post, put, HttpResponse, Responder, ResponseError};
    use serde::Deserialize;

    use crate::services::db_utils::AppState;
    use crate::services::messages::{
        ChangeOrderStatus, CreateOrder, FetchOrders, OrderLineItemRequest,
    };

    #[derive(Deserialize)]
    pub struct OrderLineItemBody {
        pub product_id: i64,
        pub quantity: i64,
    }

    #[derive(Deserialize)]
    pub struct CreateOrderBody {
        pub order_table_id: i64,
        pub order_line_items: Vec<OrderLineItemBody>,
    }

    #[derive(Deserialize)]
    pub struct ChangeStatusBody {
        pub order_status: String,
    }

    #[post("/create")]
    pub async fn create_order(state: Data<AppState>, body: Json<CreateOrderBody>) -> impl Responder {
        let line_items = body.order_line_items.iter()
            .map(|item| OrderLineItemRequest {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect();

        match state.pg_db.send(CreateOrder {
            order_table_id: body.order_table_id,
            order_line_items: line_items,
        }).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}"))
        }
    }

    #[get("/all")]
    pub async fn fetch_orders(state: Data<AppState>) -> impl Responder {
        match state.pg_db.send(FetchOrders).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to retrieve orders: {err}"))
        }
    }

    #[put("/{id}/status")]
    pub async fn change_order_status(state: Data<AppState>, path: Path<i64>, body: Json<ChangeStatusBody>) -> impl Responder {
        match state.pg_db.send(ChangeOrderStatus {
            order_id: path.into_inner(),
            order_status: body.order_status.clone(),
        }).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => err.error_response(),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}"))
        }
    }
}
