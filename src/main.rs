mod access_gate;
mod directives;
mod header_bag;
mod http_client;
mod proxy_handler;
mod redirect;
mod std_logger;

use std::io::{Error, ErrorKind, Result};

use actix_web::{web, App, HttpServer};
use clap::Parser;
use log::info;

use access_gate::AccessGate;
use http_client::HttpClientConfig;
use proxy_handler::AppState;
use std_logger::StdLogger;

#[derive(Parser, Debug)]
#[command(name = "relay-proxy", version, about = "Query-driven HTTP forwarding relay")]
struct ServerArgs {
    #[arg(long, env = "PORT", default_value_t = 3002)]
    port: u16,

    #[arg(long, env = "HTTP_BIND", default_value = "0.0.0.0")]
    bind: String,

    #[arg(long, env = "HTTP_WORKER_COUNT", default_value_t = 4)]
    workers: usize,

    // Comma-separated referer allowlist; unset leaves the gate open.
    #[arg(long, env = "ALLOWED_DOMAINS")]
    allowed_domains: Option<String>,

    // Own path used when rewriting upstream Location headers back through
    // the relay.
    #[arg(long, env = "PROXY_PATH", default_value = "/")]
    proxy_path: String,

    #[arg(long, env = "MIRROR_METHOD")]
    mirror_method: bool,

    #[arg(long, env = "HTTP_PROXY_URL")]
    egress_proxy: Option<String>,

    #[arg(long, env = "HTTP_PROXY_USER")]
    egress_proxy_user: Option<String>,

    #[arg(long, env = "HTTP_PROXY_PASS")]
    egress_proxy_pass: Option<String>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: log::LevelFilter,
}

static LOGGER: StdLogger = StdLogger;

#[actix_web::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();

    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(args.log_level))
        .map_err(|err| Error::new(ErrorKind::Other, err))?;

    let client_config = HttpClientConfig {
        egress_proxy: args.egress_proxy,
        user: args.egress_proxy_user,
        pass: args.egress_proxy_pass,
    };

    let clients = client_config
        .build_client_set()
        .map_err(|err| Error::new(ErrorKind::Other, err))?;

    let gate = AccessGate::from_domain_list(args.allowed_domains.as_deref());

    if gate.is_open() {
        info!("Referer allowlist not configured, accepting all callers.");
    } else {
        info!(
            "Referer allowlist active: {}",
            args.allowed_domains.as_deref().unwrap_or_default()
        );
    }

    let state = web::Data::new(AppState {
        gate,
        clients,
        proxy_path: args.proxy_path,
        mirror_method: args.mirror_method,
    });

    info!("Relay listening on {}:{}", args.bind, args.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .default_service(web::to(proxy_handler::relay))
    })
    .workers(args.workers)
    .bind((args.bind, args.port))?
    .run()
    .await
}
