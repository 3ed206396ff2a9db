pub mod assignments;
pub mod current_user;
pub mod delegates;
pub mod schools;
pub mod users;

use actix_web::{
    web, Error, HttpRequest, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    error::JsonPayloadError,
    http::Method,
    middleware::Next,
};

use crate::errors::AppError;
use crate::schemas::ApiErrorResponse;

/// CSRF protection for mutation endpoints.
///
/// Rejects POST/PUT/PATCH requests that don't have Content-Type: application/json.
/// Browsers cannot send cross-origin JSON with cookies via a simple form POST,
/// so the header check stands in for a CSRF token. GET and DELETE carry no body
/// and are exempt.
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == Method::POST || method == Method::PUT || method == Method::PATCH {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = ApiErrorResponse {
                error: "Content-Type must be application/json for mutation requests".to_string(),
                details: None,
            };
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Malformed or incomplete JSON bodies become ordinary validation errors.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    AppError::invalid(err.to_string()).into()
}

/// Configure `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error));
    cfg.service(
        web::scope("/api")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            // /users/me BEFORE /users/{id}
            .service(
                web::scope("/users")
                    .route("/me", web::get().to(current_user::read))
                    .route("/me", web::post().to(current_user::login))
                    .route("/me", web::delete().to(current_user::logout))
                    .route("", web::get().to(users::list))
                    .route("", web::post().to(users::create))
                    .route("/{id}", web::get().to(users::read))
                    .route("/{id}", web::put().to(users::update))
                    .route("/{id}", web::patch().to(users::partial_update))
                    .route("/{id}", web::delete().to(users::delete)),
            )
            .service(
                web::scope("/schools")
                    .route("", web::get().to(schools::list))
                    .route("", web::post().to(schools::create))
                    .route("/{id}", web::get().to(schools::read))
                    .route("/{id}", web::put().to(schools::update))
                    .route("/{id}", web::patch().to(schools::partial_update))
                    .route("/{id}", web::delete().to(schools::delete))
                    .route("/{id}/assignments", web::get().to(schools::assignments))
                    .route("/{id}/delegates", web::get().to(schools::delegates)),
            )
            .service(
                web::scope("/assignments")
                    .route("", web::get().to(assignments::list))
                    .route("", web::post().to(assignments::create))
                    .route("/{id}", web::get().to(assignments::read))
                    .route("/{id}", web::put().to(assignments::update))
                    .route("/{id}", web::patch().to(assignments::partial_update))
                    .route("/{id}", web::delete().to(assignments::delete)),
            )
            .service(
                web::scope("/delegates")
                    .route("", web::get().to(delegates::list))
                    .route("", web::post().to(delegates::create))
                    .route("/{id}", web::get().to(delegates::read))
                    .route("/{id}", web::put().to(delegates::update))
                    .route("/{id}", web::patch().to(delegates::partial_update))
                    .route("/{id}", web::delete().to(delegates::delete)),
            ),
    );
}
