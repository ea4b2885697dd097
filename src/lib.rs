pub mod core {
    pub mod config;
    pub mod error;
    pub mod log_format;
    pub mod rolling;
    pub mod state;
    pub mod tracing_init;
}

pub mod models {
    pub mod user;
}

pub mod stores {
    pub mod user_store;
}

pub mod session {
    pub mod login;
    pub mod menu;
    pub mod register;
    pub mod terminal;
}

pub mod utils {
    pub mod digest;
}

pub mod demo;
