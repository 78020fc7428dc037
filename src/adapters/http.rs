//! HTTP configuration server (device only).
//!
//! Handlers run on the ESP-IDF httpd task. They never touch the
//! [`AppService`](crate::app::service::AppService) directly: forms go into
//! [`CONFIG_INBOX`] and the page is rendered from the last
//! [`STATUS_BOARD`] snapshot published by the control loop.

use embedded_svc::http::Method;
use embedded_svc::io::Write;
use esp_idf_svc::http::server::{Configuration as HttpConfiguration, EspHttpServer};
use log::{info, warn};

use crate::app::remote::{CONFIG_INBOX, RemoteResponse, STATUS_BOARD, query_of};

pub fn start_server() -> anyhow::Result<EspHttpServer<'static>> {
    let conf = HttpConfiguration {
        stack_size: 8 * 1024,
        ..Default::default()
    };
    let mut server = EspHttpServer::new(&conf)?;

    server.fn_handler::<anyhow::Error, _>("/", Method::Get, |req| {
        let page = STATUS_BOARD.current().render_page();
        req.into_response(200, None, &[("Content-Type", "text/html")])?
            .write_all(page.as_bytes())?;
        Ok(())
    })?;

    server.fn_handler::<anyhow::Error, _>("/status", Method::Get, |req| {
        let body = STATUS_BOARD.current().to_json()?;
        req.into_response(200, None, &[("Content-Type", "application/json")])?
            .write_all(&body)?;
        Ok(())
    })?;

    server.fn_handler::<anyhow::Error, _>("/config", Method::Get, |req| {
        let response = CONFIG_INBOX.submit_query(query_of(req.uri()));
        match response {
            RemoteResponse::SeeOther(location) => {
                req.into_response(303, Some("See Other"), &[("Location", location)])?;
            }
            RemoteResponse::Busy => {
                warn!("HTTP: config inbox full, request dropped");
                req.into_status_response(503)?;
            }
        }
        Ok(())
    })?;

    info!("HTTP: config server listening");
    Ok(server)
}
