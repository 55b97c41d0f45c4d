use actix_cors::Cors;
use actix_files::Files;
use actix_web::{dev::Server, http::header, middleware, web, App, HttpServer};

use crate::{
    configuration::{AppState, State},
    controller::{
        admin, auth, categories, feedback, health, pages, popular_services,
        push, subscriptions, user, version,
    },
    error::Error,
};

pub async fn server_task(app_state: &AppState<State>) -> Result<(), Error> {
    let app = app_state.clone();
    tokio::spawn(async move {
        let server = init_server(app)?;
        server.await?;
        Ok(())
    })
    .await?
}

fn init_server(app_state: AppState<State>) -> Result<Server, Error> {
    let host = app_state.config.server_host.to_owned();
    let port = app_state.config.port;

    let server = HttpServer::new(move || {
        let app = app_state.clone();
        let static_dir = app_state.config.static_dir.to_owned();
        let allowed_cors = String::from("*");
        let cors_access_all =
            app.config.allowed_origins.contains(&allowed_cors);
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                if cors_access_all {
                    return true;
                }
                let allowed = &app.config.allowed_origins;
                if let Ok(origin) = origin.to_str() {
                    return allowed.contains(&origin.to_owned());
                }
                false
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT])
            .allowed_header(header::CONTENT_TYPE)
            .allowed_header("x-admin-secret");

        App::new()
            .wrap(cors)
            .wrap(middleware::Compress::default())
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().limit(16384))
            .service(
                web::scope("/api")
                    .service(health::index)
                    .service(version::index)
                    .service(auth::register)
                    .service(auth::login)
                    .service(user::get_profile)
                    .service(user::update_profile)
                    .service(user::currencies)
                    .service(user::get_currency)
                    .service(user::set_currency)
                    .service(subscriptions::index)
                    .service(subscriptions::create)
                    .service(subscriptions::get_one)
                    .service(subscriptions::update)
                    .service(subscriptions::remove)
                    .service(categories::index)
                    .service(push::subscribe)
                    .service(push::unsubscribe)
                    .service(pages::index)
                    .service(popular_services::index)
                    .service(feedback::index)
                    .service(admin::notify_due_subscriptions)
                    .service(admin::list_users)
                    .service(admin::delete_user)
                    .service(admin::upsert_page)
                    .service(admin::create_popular_service)
                    .service(admin::update_popular_service)
                    .service(admin::delete_popular_service)
                    .service(admin::publish_version)
                    .service(admin::broadcast),
            )
            .service(Files::new("/", static_dir).index_file("index.html"))
    })
    .bind((host, port))?
    .disable_signals()
    .run();
    Ok(server)
}
