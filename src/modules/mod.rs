pub mod auth;
pub mod config;
pub mod migration;
pub mod storage;

pub mod models {
    pub mod race;
    pub mod session;
    pub mod trainer;
}

pub mod helpers {
    pub mod general;
    pub mod logging;
    pub mod math;
    pub mod matrix;
    pub mod points;
    pub mod standings;
}
