use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::resource::Resource;
use crate::resource::account::{Addresses, Companies, Points, Settings};
use crate::resource::blog::{BlogCategories, BlogPosts, BlogTags};
use crate::resource::configs::Configs;
use crate::resource::content::{Badges, Banners, Boards, Categories, Comments, Popups};
use crate::resource::fcm::{FcmAlarms, FcmMessages, FcmTokens};
use crate::resource::shop::{ShopItems, ShopOrders, ShopReviews};
use crate::resource::user::Users;
use crate::state::AppState;

/// Where a resource is mounted, as far as the API document needs to know.
#[derive(Debug, Clone, Copy)]
pub struct ResourceDoc {
    pub path: &'static str,
    pub name: &'static str,
    pub has_status: bool,
}

pub struct Mount {
    pub doc: ResourceDoc,
    router: Router<AppState>,
}

/// CRUD routes for one resource. The status route exists only for
/// resources that declare statuses.
pub fn resource_routes<R: Resource>() -> Router<AppState> {
    use handlers::resource::{create, delete, list, show, update, update_status};

    let router = Router::new()
        .route("/", get(list::<R>).post(create::<R>).delete(delete::<R>))
        .route("/{id}", get(show::<R>).put(update::<R>));

    if R::STATUSES.is_empty() {
        router
    } else {
        router.route("/status", post(update_status::<R>))
    }
}

fn mount<R: Resource>(path: &'static str) -> Mount {
    Mount {
        doc: ResourceDoc {
            path,
            name: R::NAME,
            has_status: !R::STATUSES.is_empty(),
        },
        router: resource_routes::<R>(),
    }
}

pub fn resources() -> Vec<Mount> {
    vec![
        mount::<Users>("/users"),
        mount::<BlogPosts>("/blog/posts"),
        mount::<BlogCategories>("/blog/categories"),
        mount::<BlogTags>("/blog/tags"),
        mount::<ShopItems>("/shop/items"),
        mount::<ShopOrders>("/shop/orders"),
        mount::<ShopReviews>("/shop/reviews"),
        mount::<Banners>("/banners"),
        mount::<Badges>("/badges"),
        mount::<Popups>("/popups"),
        mount::<Configs>("/configs"),
        mount::<FcmTokens>("/fcm/tokens"),
        mount::<FcmMessages>("/fcm/messages"),
        mount::<FcmAlarms>("/fcm/alarms"),
        mount::<Addresses>("/addresses"),
        mount::<Companies>("/companies"),
        mount::<Points>("/points"),
        mount::<Settings>("/settings"),
        mount::<Boards>("/boards"),
        mount::<Comments>("/comments"),
        mount::<Categories>("/categories"),
    ]
}

pub fn routes() -> Router<AppState> {
    let base = Router::new()
        .nest("/auth", auth_routes())
        .route("/health", get(handlers::health::health));

    resources()
        .into_iter()
        .fold(base, |router, m| router.nest(m.doc.path, m.router))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me))
        .route("/oauth/{provider}", get(handlers::auth::oauth_redirect))
}
