// storefront/src/web/routes.rs

use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .service(web::scope("/api/v1").route("/health", web::get().to(health_check_handler)))
    // Storefront pages
    .service(
      web::scope("/checkout/{store_id}/success")
        .route(
          "",
          web::get().to(crate::web::handlers::checkout_handlers::order_success_handler),
        )
        .route(
          "/verify",
          web::post().to(crate::web::handlers::checkout_handlers::verify_order_handler),
        ),
    );
}
