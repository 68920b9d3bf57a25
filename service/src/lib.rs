use config::Config;
use events::EventPublisher;
use log::info;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::sync::Arc;
use tokio::time::Duration;

pub mod config;
pub mod logging;

pub async fn init_database(config: &Config) -> Result<DatabaseConnection, DbErr> {
    info!(
        "Database pool config: max_connections={}, min_connections={}, \
         connect_timeout={}s, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
        config.db_max_connections,
        config.db_min_connections,
        config.db_connect_timeout_secs,
        config.db_acquire_timeout_secs,
        config.db_idle_timeout_secs,
        config.db_max_lifetime_secs,
    );

    let mut opt = ConnectOptions::new::<&str>(config.database_url());
    opt.max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime_secs))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Info);

    let db = Database::connect(opt).await?;

    Ok(db)
}

// Shared by both services. Needs to implement Clone to be able to be passed
// into Router as State.
#[derive(Clone)]
pub struct AppState {
    pub database_connection: Arc<DatabaseConnection>,
    pub config: Config,
    pub event_publisher: Arc<EventPublisher>,
    pub sse_manager: Arc<sse::Manager>,
    pub room_manager: Arc<rooms::Manager>,
}

impl AppState {
    /// Builds the state and wires the domain event publisher to both fan-out
    /// managers, so anything a domain operation publishes reaches the SSE
    /// subscribers and the WebSocket rooms held here.
    pub fn new(app_config: Config, db: &Arc<DatabaseConnection>) -> Self {
        let sse_manager = Arc::new(sse::Manager::new());
        let room_manager = Arc::new(rooms::Manager::new());

        let event_publisher = EventPublisher::new()
            .with_handler(Arc::new(sse::domain_event_handler::SseDomainEventHandler::new(
                Arc::clone(&sse_manager),
            )))
            .with_handler(Arc::new(
                rooms::domain_event_handler::RoomDomainEventHandler::new(Arc::clone(
                    &room_manager,
                )),
            ));

        Self {
            database_connection: Arc::clone(db),
            config: app_config,
            event_publisher: Arc::new(event_publisher),
            sse_manager,
            room_manager,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.database_connection.as_ref()
    }
}
