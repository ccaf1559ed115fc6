use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::{error, trace};

use crate::services::RedirectService;

/// Fallback for every request no other route claimed
pub struct RedirectHandler;

impl RedirectHandler {
    pub async fn handle_redirect(
        req: HttpRequest,
        redirects: web::Data<RedirectService>,
    ) -> impl Responder {
        let path = req.path();

        match redirects.resolve(path).await {
            Ok(Some(redirect)) => {
                let status = StatusCode::from_u16(redirect.status_code)
                    .unwrap_or(StatusCode::MOVED_PERMANENTLY);
                HttpResponse::build(status)
                    .insert_header(("Location", redirect.to_path))
                    .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
                    .finish()
            }
            Ok(None) => {
                trace!("No redirect for path: {}", path);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Redirect lookup failed for {}: {}", path, e);
                HttpResponse::InternalServerError()
                    .insert_header(("Content-Type", "text/plain; charset=utf-8"))
                    .body("Internal Server Error")
            }
        }
    }

    fn not_found_response() -> HttpResponse {
        HttpResponse::NotFound()
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("Not Found")
    }
}

/// 兜底路由，必须最后注册
pub fn redirect_routes() -> actix_web::Resource {
    web::resource("/{path:.*}")
        .route(web::get().to(RedirectHandler::handle_redirect))
        .route(web::head().to(RedirectHandler::handle_redirect))
}
