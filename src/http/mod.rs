mod health;
mod library;
mod live;
mod views;

#[cfg(test)]
mod tests;

use actix_web::web;

pub(crate) fn configure(config: &mut web::ServiceConfig) {
    config
        .service(web::resource("/health").route(web::get().to(health::health_check)))
        .service(web::resource("/views").route(web::post().to(views::open_view)))
        .service(
            web::resource("/views/{view}")
                .route(web::get().to(views::get_snapshot))
                .route(web::delete().to(views::close_view)),
        )
        .service(web::resource("/views/{view}/request").route(web::put().to(views::request_sources)))
        .service(web::resource("/views/{view}/select").route(web::post().to(views::select_candidate)))
        .service(web::resource("/live").route(web::get().to(live::list_live_matches)))
        .service(
            web::resource("/library/history")
                .route(web::get().to(library::get_history))
                .route(web::post().to(library::record_view))
                .route(web::delete().to(library::clear_history)),
        )
        .service(
            web::resource("/library/wishlist")
                .route(web::get().to(library::get_wishlist))
                .route(web::post().to(library::add_to_wishlist)),
        )
        .service(
            web::resource("/library/wishlist/{catalog}/{resource_id:.*}")
                .route(web::delete().to(library::remove_from_wishlist)),
        )
        .service(
            web::resource("/preferences/theme")
                .route(web::get().to(library::get_theme))
                .route(web::put().to(library::set_theme)),
        );
}
