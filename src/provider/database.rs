use crate::{
    configuration::Config,
    dao::{PoolOption, PoolType},
    error::Error,
    model::{
        AppVersion, CurrencyRate, Feedback, Page, PopularService,
        PushSubscription, Subscription, Table, User,
    },
};

#[derive(Debug)]
pub struct DatabasePool {
    pub user: Table<User>,
    pub subscription: Table<Subscription>,
    pub push_subscription: Table<PushSubscription>,
    pub page: Table<Page>,
    pub popular_service: Table<PopularService>,
    pub feedback: Table<Feedback>,
    pub currency: Table<CurrencyRate>,
    pub app_version: Table<AppVersion>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let pool = PoolOption::new()
            .max_connections(20)
            .connect(config.database_url.as_str())
            .await?;

        Ok(DatabasePool {
            pool: pool.clone(),
            user: Table::new(pool.clone()),
            subscription: Table::new(pool.clone()),
            push_subscription: Table::new(pool.clone()),
            page: Table::new(pool.clone()),
            popular_service: Table::new(pool.clone()),
            feedback: Table::new(pool.clone()),
            currency: Table::new(pool.clone()),
            app_version: Table::new(pool),
        })
    }

    pub fn get_pool(&self) -> &PoolType {
        &self.pool
    }
}
