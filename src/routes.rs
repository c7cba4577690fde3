use std::sync::Arc;

use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::{Result, anyhow};

use crate::{
    api::{dashboard, employee, payslip, promotion},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};

type Limiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per-client-IP rate limiters, built once and shared by every worker.
#[derive(Clone)]
pub struct Limiters {
    login: Limiter,
    protected: Limiter,
}

impl Limiters {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            login: build_limiter(config.rate_login_per_min)?,
            protected: build_limiter(config.rate_protected_per_min)?,
        })
    }
}

/// Replenishes one request every `60s / requests_per_min`, bursting up to the full minute quota.
fn build_limiter(requests_per_min: u32) -> Result<Limiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit of {requests_per_min}/min"))?;

    Ok(Arc::new(Governor::new(&cfg)))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str, limiters: Limiters) {
    cfg.service(
        web::scope(api_prefix)
            // Public
            .service(
                web::resource("/auth/login")
                    .wrap(limiters.login)
                    .route(web::post().to(handlers::login)),
            )
            // Protected
            .service(
                web::scope("")
                    .wrap(from_fn(auth_middleware)) // authentication
                    .wrap(limiters.protected) // rate limiting
                    .service(
                        web::scope("/employees")
                            // /employees
                            .service(
                                web::resource("")
                                    .route(web::post().to(employee::create_employee))
                                    .route(web::get().to(employee::list_employees)),
                            )
                            // /employees/{id}
                            .service(
                                web::resource("/{id}")
                                    .route(web::get().to(employee::get_employee))
                                    .route(web::put().to(employee::update_employee))
                                    .route(web::delete().to(employee::delete_employee)),
                            ),
                    )
                    .service(
                        web::scope("/promotions")
                            .service(
                                web::resource("")
                                    .route(web::post().to(promotion::create_promotion))
                                    .route(web::get().to(promotion::list_promotions)),
                            )
                            // /promotions/{employee_id}
                            .service(
                                web::resource("/{employee_id}")
                                    .route(web::get().to(promotion::employee_promotions)),
                            ),
                    )
                    .service(
                        web::scope("/payslips")
                            .service(
                                web::resource("")
                                    .route(web::get().to(payslip::list_payslips)),
                            )
                            .service(
                                web::resource("/generate")
                                    .route(web::post().to(payslip::generate_payslip)),
                            )
                            // /payslips/download/{id}
                            .service(
                                web::resource("/download/{id}")
                                    .route(web::get().to(payslip::download_payslip)),
                            )
                            // /payslips/{id}
                            .service(
                                web::resource("/{id}")
                                    .route(web::get().to(payslip::get_payslip))
                                    .route(web::delete().to(payslip::delete_payslip)),
                            ),
                    )
                    .service(
                        web::resource("/dashboard/stats")
                            .route(web::get().to(dashboard::dashboard_stats)),
                    ),
            ),
    );
}
