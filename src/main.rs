use std::env;

use actix::{Addr, SyncArbiter};
use actix_cors::Cors;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

use services::db_utils::{get_db_pool, AppState, PgActor};

mod schema;
mod services;
mod types;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

fn init_pg_db() -> Addr<PgActor> {
    let db_url = env::var("PG_DATABASE_URL").expect("PG_DATABASE_URL must be set");
    let pool = get_db_pool(&db_url).expect("failed to build the connection pool");

    SyncArbiter::start(5, move || PgActor(pool.clone()))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let pg_db = init_pg_db();
    let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_owned());

    tracing::info!(%bind_address, "starting point-of-sale back end");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(Data::new(AppState { pg_db: pg_db.clone() }))
            .service(services::home_page)
            .service(
                web::scope("/products")
                    .service(services::product_route::create_product)
                    .service(services::product_route::fetch_products)
                    .service(services::product_route::get_product)
            )
            .service(
                web::scope("/menu-groups")
                    .service(services::menu_group_route::create_menu_group)
                    .service(services::menu_group_route::fetch_menu_groups)
            )
            .service(
                web::scope("/tables")
                    .service(services::table_route::create_table)
                    .service(services::table_route::fetch_tables)
                    .service(services::table_route::change_empty)
                    .service(services::table_route::change_number_of_guests)
                    .service(services::table_route::get_table)
            )
            .service(
                web::scope("/table-groups")
                    .service(services::table_group_route::group_tables)
                    .service(services::table_group_route::ungroup_tables)
            )
            .service(
                web::scope("/orders")
                    .service(services::order_route::create_order)
                    .service(services::order_route::fetch_orders)
                    .service(services::order_route::change_order_status)
            )
    })
        .bind(bind_address)?
        .run()
        .await
}
