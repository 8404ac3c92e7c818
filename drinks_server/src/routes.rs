//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any I/O (database calls, fetching signing keys) must be expressed
//! as futures so that the worker can handle other requests in the meantime.
use actix_web::{get, web, HttpResponse, Responder};
use drinks_engine::{DrinkApi, DrinkManagement, ModifyDrinkRequest, NewDrinkRequest};
use log::*;

use crate::{
    auth::{GrantedPermissions, Permission},
    data_objects::{DeletedResponse, DrinksResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $bound:path where requires [$($permissions:expr),+]) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $bound + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($permissions),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $bound:path) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $bound + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Registers the drinks routes, backed by the storage backend `B`, together with the extractor configuration that
/// renders malformed bodies and ids with the JSON error format.
///
/// The app must also provide `web::Data<DrinkApi<B>>` and `web::Data<TokenVerifier>`.
pub fn configure_drink_routes<B: DrinkManagement + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health)
        .service(DrinksRoute::<B>::new())
        .service(DrinksDetailRoute::<B>::new())
        .service(CreateDrinkRoute::<B>::new())
        .service(UpdateDrinkRoute::<B>::new())
        .service(DeleteDrinkRoute::<B>::new());
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Could not deserialize request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        debug!("💻️ Invalid path {}. {err}", req.path());
        ServerError::NoRecordFound(format!("{} does not exist", req.path())).into()
    })
}

/// Fallback for any request that does not match a route.
pub async fn not_found() -> Result<HttpResponse, ServerError> {
    Err(ServerError::NoRecordFound("The requested resource does not exist".into()))
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Drinks  ----------------------------------------------------
route!(drinks => Get "/drinks" impl DrinkManagement);
/// Route handler for the public drinks menu.
///
/// No authentication is required. Drinks are returned in the short view: ingredient colors and parts only.
pub async fn drinks<B: DrinkManagement>(api: web::Data<DrinkApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET drinks");
    let drinks = api.short_list().await.map_err(|e| {
        debug!("💻️ Could not fetch drinks. {e}");
        ServerError::BackendError(e.to_string())
    })?;
    Ok(HttpResponse::Ok().json(DrinksResponse::new(drinks)))
}

route!(drinks_detail => Get "/drinks-detail" impl DrinkManagement where requires [Permission::GetDrinksDetail]);
/// Route handler for the detailed drinks list. Drinks are returned in the long view, including ingredient names.
pub async fn drinks_detail<B: DrinkManagement>(
    permissions: GrantedPermissions,
    api: web::Data<DrinkApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET drinks-detail with permissions {permissions}");
    let drinks = api.long_list().await?;
    Ok(HttpResponse::Ok().json(DrinksResponse::new(drinks)))
}

route!(create_drink => Post "/drinks" impl DrinkManagement where requires [Permission::PostDrinks]);
/// Route handler for adding a drink to the catalog.
///
/// The body must contain a `title` and a `recipe`. The recipe may be a list of ingredients, a single ingredient, or a
/// string holding either of those serialized as JSON.
pub async fn create_drink<B: DrinkManagement>(
    body: web::Json<NewDrinkRequest>,
    api: web::Data<DrinkApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST drinks");
    let drink = api.create_drink(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DrinksResponse::new(vec![drink])))
}

route!(update_drink => Patch "/drinks/{id}" impl DrinkManagement where requires [Permission::PatchDrinks]);
/// Route handler for modifying a drink. `title` and `recipe` are both optional and are applied independently.
pub async fn update_drink<B: DrinkManagement>(
    path: web::Path<i64>,
    body: web::Json<ModifyDrinkRequest>,
    api: web::Data<DrinkApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PATCH drink #{id}");
    let drink = api.update_drink(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DrinksResponse::new(vec![drink])))
}

route!(delete_drink => Delete "/drinks/{id}" impl DrinkManagement where requires [Permission::DeleteDrinks]);
pub async fn delete_drink<B: DrinkManagement>(
    path: web::Path<i64>,
    api: web::Data<DrinkApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE drink #{id}");
    let deleted = api.delete_drink(id).await?;
    Ok(HttpResponse::Ok().json(DeletedResponse::new(deleted)))
}
