pub use self::postgre::{
    get_path, DBRow, DataBase, PoolOption, PoolType, QueryResult,
};

pub mod postgre;
