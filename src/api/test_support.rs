use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::test::TestRequest;

use crate::{
    auth::jwt::generate_access_token,
    config::Config,
    model::employee::{Employee, fixtures},
    store::{MemoryStore, Store},
};

/// Builds the full application over the given store, the way `main` does.
macro_rules! test_app {
    ($store:expr) => {{
        let config = crate::config::Config::for_tests();
        let store: std::sync::Arc<dyn crate::store::Store> = $store;
        crate::auth::seed_admin(store.as_ref(), &config.admin_username, &config.admin_password)
            .await
            .unwrap();
        let limiters = crate::routes::Limiters::new(&config).unwrap();
        let printer = crate::payroll::render::PayslipPrinter::new(
            config.render_options(),
            Box::new(crate::payroll::pdf::PdfSink),
        );
        let prefix = config.api_prefix.clone();

        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::from(store))
                .app_data(actix_web::web::Data::new(config))
                .app_data(actix_web::web::Data::new(printer))
                .configure(|cfg| crate::routes::configure(cfg, &prefix, limiters)),
        )
        .await
    }};
}
pub(crate) use test_app;

/// The rate limiter keys on the peer address, which test requests lack by default.
pub fn peer() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 40_000))
}

pub fn token() -> String {
    let config = Config::for_tests();
    generate_access_token(&config.admin_username, &config.jwt_secret, 60).unwrap()
}

/// Test request from the loopback peer carrying a valid bearer token.
pub fn authed(req: TestRequest) -> TestRequest {
    req.peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {}", token())))
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// Stores an active employee with the standard fixture salary.
pub async fn seeded_employee(store: &MemoryStore, employee_no: &str) -> Employee {
    let employee = Employee::new(fixtures::new_employee(employee_no));
    store.insert_employee(&employee).await.unwrap();
    employee
}
