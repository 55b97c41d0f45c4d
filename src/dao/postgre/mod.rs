pub use self::{
    path::get_path,
    types::{DBRow, DataBase, PoolOption, PoolType, QueryResult},
};

mod app_version;
mod currency;
mod feedback;
mod page;
mod path;
mod popular_service;
mod push_subscription;
mod subscription;
mod types;
mod user;
