use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use log::error;

use crate::domain::search::PageRequest;
use crate::dto::api::{MemberPageResponse, MemberSearchParams};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::search::{PageMode, search_members, search_members_page};

fn parse_params(req: &HttpRequest) -> Result<MemberSearchParams, HttpResponse> {
    serde_html_form::from_str::<MemberSearchParams>(req.query_string()).map_err(|e| {
        error!("Failed to parse member search parameters: {e}");
        HttpResponse::BadRequest().body(e.to_string())
    })
}

fn page_request(params: &MemberSearchParams) -> Result<PageRequest, HttpResponse> {
    params
        .page_request()
        .map_err(|e| error_response(&ServiceError::from(e)))
}

fn paged_members(req: &HttpRequest, repo: &DieselRepository, mode: PageMode) -> HttpResponse {
    let params = match parse_params(req) {
        Ok(params) => params,
        Err(response) => return response,
    };
    let page = match page_request(&params) {
        Ok(page) => page,
        Err(response) => return response,
    };

    match search_members_page(repo, &params.filter(), &page, mode) {
        Ok(page) => HttpResponse::Ok().json(MemberPageResponse::from(page)),
        Err(e) => {
            error!("Failed to load member page: {e}");
            error_response(&e)
        }
    }
}

/// Lists every matching member without paging.
#[get("/v1/members")]
pub async fn api_v1_members(req: HttpRequest, repo: web::Data<DieselRepository>) -> impl Responder {
    let params = match parse_params(&req) {
        Ok(params) => params,
        Err(response) => return response,
    };

    match search_members(repo.get_ref(), &params.filter()) {
        Ok(members) => HttpResponse::Ok().json(members),
        Err(e) => {
            error!("Failed to search members: {e}");
            error_response(&e)
        }
    }
}

/// Paged search loading content and total together.
#[get("/v2/members")]
pub async fn api_v2_members(req: HttpRequest, repo: web::Data<DieselRepository>) -> impl Responder {
    paged_members(&req, repo.get_ref(), PageMode::Simple)
}

/// Paged search that skips the count query when the page is already short.
#[get("/v3/members")]
pub async fn api_v3_members(req: HttpRequest, repo: web::Data<DieselRepository>) -> impl Responder {
    paged_members(&req, repo.get_ref(), PageMode::Optimized)
}
