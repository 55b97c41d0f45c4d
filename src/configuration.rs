use std::{env, fs, ops::Deref, sync::Arc};

use crate::{
    dao::get_path,
    error::Error,
    provider::{DatabasePool, HTTP},
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub database: DatabasePool,
    pub http: HTTP,
}

impl State {
    pub async fn new(
        config: Config,
        database: DatabasePool,
        http: HTTP,
    ) -> Result<State, Error> {
        Self::init_migrations(&database).await?;
        Ok(Self {
            config,
            database,
            http,
        })
    }

    pub async fn init_migrations(database: &DatabasePool) -> Result<(), Error> {
        let files = vec![
            "users.sql",
            "subscriptions.sql",
            "push_subscriptions.sql",
            "pages.sql",
            "popular_services.sql",
            "feedback.sql",
            "currencies.sql",
            "app_versions.sql",
        ];

        let dir = env!("CARGO_MANIFEST_DIR");

        for file in files {
            let path = get_path(dir, file);
            let data = fs::read_to_string(path)?;
            sqlx::raw_sql(data.as_str()).execute(&database.pool).await?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: String,
    pub timeout: u64,
    pub max_tasks: usize,
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
    pub admin_secret: String,
    pub mail_to: String,
    pub vapid_private_key: Vec<u8>,
    pub vapid_public_key: Vec<u8>,
    pub status_codes_to_delete: Vec<u16>,
    pub notify_hour: u32,
    pub rates_app_id: String,
    pub rates_refresh_hours: i64,
}

fn parse_config_vapid_keys() -> Result<(Vec<u8>, Vec<u8>), Error> {
    let directory = env!("CARGO_MANIFEST_DIR");
    let private_key_dir = format!("{}/cert/vapid_private.pem", directory);
    let public_key_dir = format!("{}/cert/vapid_public.b64", directory);

    let private_key = fs::read(private_key_dir)?;
    let public_key = fs::read(public_key_dir)?;

    Ok((private_key, public_key))
}

pub fn get_configuration() -> Result<Config, Error> {
    let database_url = env::var("DATABASE_URL")?;
    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let timeout = env::var("TIMEOUT")?.parse()?;
    let max_tasks = env::var("MAX_TASKS")?.parse()?;

    let allowed_origins = env::var("ALLOWED_ORIGINS")?
        .split(',')
        .map(|item| item.to_owned())
        .collect::<Vec<String>>();

    let static_dir = format!(
        "{}/{}",
        env!("CARGO_MANIFEST_DIR"),
        env::var("STATIC_DIRECTORY")?
    );

    let jwt_secret = env::var("JWT_SECRET")?;
    let jwt_expiry_days: i64 = env::var("JWT_EXPIRY_DAYS")?.parse()?;
    let admin_secret = env::var("ADMIN_SECRET")?;
    let mail_to = env::var("MAIL_TO")?;

    let codes = env::var("STATUS_CODES_TO_DELETE")?
        .split(',')
        .map(|item| item.to_string())
        .collect::<Vec<String>>();
    let mut status_codes_to_delete = vec![];

    for code in codes {
        status_codes_to_delete.push(code.parse::<u16>()?);
    }

    let notify_hour: u32 = env::var("NOTIFY_HOUR")?.parse()?;

    if notify_hour > 23 {
        return Err(Error::ConfigurationError(format!(
            "NOTIFY_HOUR must be 0-23, got {}",
            notify_hour
        )));
    }

    let rates_app_id = env::var("OPENEXCHANGERATES_APP_ID")?;
    let rates_refresh_hours: i64 = env::var("RATES_REFRESH_HOURS")?.parse()?;

    let (vapid_private_key, vapid_public_key) = parse_config_vapid_keys()?;

    let config = Config {
        database_url,
        server_host,
        port,
        allowed_origins,
        static_dir,
        timeout,
        max_tasks,
        jwt_secret,
        jwt_expiry_days,
        admin_secret,
        mail_to,
        vapid_private_key,
        vapid_public_key,
        status_codes_to_delete,
        notify_hour,
        rates_app_id,
        rates_refresh_hours,
    };

    Ok(config)
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    let config_string = fs::read_to_string(path)?;
    parse_config_string(config_string)?;

    Ok(())
}

fn parse_config_string(config: String) -> Result<(), Error> {
    let params: Vec<Option<(&str, &str)>> = config
        .split('\n')
        .map(|s| {
            let element = s.find('=');
            if let Some(e) = element {
                return Some(s.split_at(e));
            }
            None
        })
        .map(|value| {
            if let Some((k, v)) = value {
                return Some((k, &v[1..]));
            }
            None
        })
        .collect();

    for (key, value) in params.into_iter().flatten() {
        std::env::set_var(key, value);
    }

    Ok(())
}
