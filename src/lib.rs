// Library for tests to access modules

pub mod config;
pub mod counter_repo;
pub mod formatting;
pub mod logging;
pub mod models;
pub mod sampler;
pub mod sink;
pub mod version;
pub mod worker;
