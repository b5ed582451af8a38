pub mod errors;
pub mod modules;
pub mod server;

pub(crate) mod macros {
    pub mod storage_error_handler;
}

pub mod routes {
    pub mod api {
        pub mod auth;
        pub mod migrate;
        pub mod race;
        pub mod session;
        pub mod standings;
        pub mod trainer;
    }
}
