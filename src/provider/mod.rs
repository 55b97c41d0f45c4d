pub use self::{database::DatabasePool, http::ExchangeRates, http::HTTP};

mod database;
mod http;
