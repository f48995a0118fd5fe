use crate::config::Config;
use crate::routes;
use crate::state::AppState;
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing::info;

pub struct Server {
    config: Arc<Config>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        info!("Starting EcoTrace API");
        info!("Version: {}", env!("CARGO_PKG_VERSION"));
        info!("Host: {}", self.config.service.host);
        info!("Port: {}", self.config.service.port);

        // Load the model bundle, postcode table, and log paths once
        let state = web::Data::new(AppState::from_config(&self.config)?);
        info!("Application state initialized");

        let bind_addr = format!("{}:{}", self.config.service.host, self.config.service.port);
        info!("Binding to {}", bind_addr);

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .app_data(state.clone())
                .wrap(cors)
                .configure(routes::configure)
        })
        .workers(self.config.service.workers)
        .bind(&bind_addr)?
        .run()
        .await?;

        Ok(())
    }
}
