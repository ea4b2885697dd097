// Application context (AppContext)

use crate::core::config::Config;
use crate::core::tracing_init::Logging;
use crate::stores::user_store::UserStore;

/// Everything a session needs, built once at startup
///
/// Holds the logging handle explicitly instead of relying on a logger
/// configured as a side effect somewhere else.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// User data file
    pub store: UserStore,

    /// Logging pipeline installed for this process
    pub logging: Logging,

    /// Configuration
    pub config: Config,
}

impl AppContext {
    pub fn new(config: Config, logging: Logging) -> Self {
        Self {
            store: UserStore::new(config.storage.data_file.clone()),
            logging,
            config,
        }
    }
}
