use actix_web::error::PayloadError;
use actix_web::http::Method;
use actix_web::web::Query;
use actix_web::{web, HttpRequest, HttpResponse};
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::str::FromStr;

use crate::access_gate::AccessGate;
use crate::directives::ProxyDirectives;
use crate::header_bag::HeaderBag;
use crate::http_client::ClientSet;
use crate::redirect;

const CORS_HEADERS: [(&str, &str); 2] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "*"),
];

pub struct AppState {
    pub gate: AccessGate,
    pub clients: ClientSet,
    pub proxy_path: String,
    pub mirror_method: bool,
}

pub async fn relay(
    req: HttpRequest,
    payload: web::Payload,
    data: web::Data<AppState>,
) -> HttpResponse {
    let referer = req
        .headers()
        .get("referer")
        .and_then(|value| value.to_str().ok());

    if !data.gate.allows(referer) {
        return HttpResponse::Forbidden().finish();
    }

    let query_pairs = match Query::<Vec<(String, String)>>::from_query(req.query_string()) {
        Ok(query_params) => query_params.into_inner(),
        Err(err) => {
            error!("Unable to parse query parameters {}", err);
            Vec::new()
        }
    };

    let directives = ProxyDirectives::from_query_pairs(&query_pairs);

    let target = match directives.target_url.as_deref() {
        Some(raw) if !raw.is_empty() => redirect::decode_component(raw),
        _ => return HttpResponse::BadRequest().body("Missing url"),
    };

    let target_url = match reqwest::Url::parse(&target) {
        Ok(url) => url,
        Err(err) => {
            debug!("Rejecting unparsable target '{}': {}", target, err);
            return HttpResponse::BadRequest().body("Invalid url");
        }
    };

    let request_headers = build_request_headers(&req, &directives, &target_url);

    let method = if data.mirror_method {
        req.method().clone()
    } else {
        Method::GET
    };

    let mut builder = data
        .clients
        .select(directives.follow_redirect)
        .request(method.clone(), target_url)
        .headers(to_header_map(&request_headers));

    if data.mirror_method && method == Method::POST {
        match read_body(payload).await {
            Ok(body) => builder = builder.body(body),
            Err(err) => {
                error!("Reading request body failed {}", err);
                return HttpResponse::BadRequest().finish();
            }
        }
    }

    match builder.send().await {
        Ok(upstream) => {
            debug!("Upstream answered {} for {}", upstream.status(), target);
            build_response(upstream, &directives, &data.proxy_path, &query_pairs)
        }
        Err(err) => {
            error!("Upstream fetch failed {}", err);
            HttpResponse::BadGateway().finish()
        }
    }
}

// Directive-supplied headers and the derived host always win over forwarded
// inbound headers of the same name; the delete list is applied last.
fn build_request_headers(
    req: &HttpRequest,
    directives: &ProxyDirectives,
    target_url: &reqwest::Url,
) -> HeaderBag {
    let mut forced = HeaderBag::new();
    forced.insert("host", &host_of(target_url));

    for (name, value) in &directives.append_req_headers {
        forced.insert(name, value);
    }

    let composed = if directives.ignore_req_headers {
        forced
    } else {
        HeaderBag::compose(&[&inbound_headers(req), &forced])
    };

    composed.without(&directives.delete_req_headers)
}

fn build_response(
    upstream: reqwest::Response,
    directives: &ProxyDirectives,
    proxy_path: &str,
    original_query: &[(String, String)],
) -> HttpResponse {
    let status = upstream.status();

    let append_pairs: Vec<(&str, &str)> = directives
        .append_res_headers
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    let composed = HeaderBag::compose(&[
        &upstream_headers(&upstream),
        &HeaderBag::from_pairs(CORS_HEADERS),
        &HeaderBag::from_pairs(append_pairs),
    ]);

    // Any location entry turns the whole response into a bare redirect
    // carrying the upstream status; nothing else from the composed bag is
    // applied to it.
    if let Some(location) = composed.get("location") {
        let target = redirect::resolve_location(
            location,
            directives.redirect_with_proxy,
            proxy_path,
            original_query,
        );

        return HttpResponse::build(status)
            .insert_header(("location", target.as_str()))
            .finish();
    }

    // Plain relay otherwise: apply the delete list and stream the body
    // through.
    let headers = composed.without(&directives.delete_res_headers);
    let mut response = HttpResponse::build(status);

    for (name, value) in headers.iter() {
        response.append_header((name, value));
    }

    response.streaming(upstream.bytes_stream())
}

fn inbound_headers(req: &HttpRequest) -> HeaderBag {
    let mut bag = HeaderBag::new();

    for (name, value) in req.headers() {
        if let Ok(text) = value.to_str() {
            bag.insert(name.as_str(), text);
        }
    }

    bag
}

fn upstream_headers(response: &reqwest::Response) -> HeaderBag {
    let mut bag = HeaderBag::new();

    for (name, value) in response.headers() {
        if let Ok(text) = value.to_str() {
            bag.insert(name.as_str(), text);
        }
    }

    bag
}

fn host_of(url: &reqwest::Url) -> String {
    let host = url.host_str().unwrap_or_default();

    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn to_header_map(bag: &HeaderBag) -> HeaderMap {
    let mut header_map = HeaderMap::new();

    for (name, value) in bag.iter() {
        let header_info = (HeaderName::from_str(name), HeaderValue::from_str(value));

        if let (Ok(name), Ok(value)) = header_info {
            header_map.insert(name, value);
        }
    }

    header_map
}

async fn read_body(mut payload: web::Payload) -> Result<Bytes, PayloadError> {
    let mut buffer = BytesMut::new();

    while let Some(chunk) = payload.next().await {
        buffer.extend_from_slice(&chunk?);
    }

    Ok(buffer.freeze())
}
