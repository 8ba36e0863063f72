//! `tiny_http` listener with a fixed pool of worker threads.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tiny_http::{Header, Request, Response, Server, StatusCode};
use tracing::{error, info, info_span};

use super::routes::{ApiRequest, ApiResponse, Router};
use crate::constants::{API_KEY_HEADER, RECV_TIMEOUT_MS};

fn create_header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str().to_string())
}

fn to_api_request(request: &Request) -> ApiRequest {
    ApiRequest {
        method: request.method().as_str().to_ascii_uppercase(),
        url: request.url().to_string(),
        api_key: header_value(request, API_KEY_HEADER),
        origin: header_value(request, "Origin"),
    }
}

fn respond(request: Request, api: ApiResponse) {
    let mut response =
        Response::from_string(api.body).with_status_code(StatusCode(api.status));
    if let Some(header) = create_header("Content-Type", api.content_type) {
        response = response.with_header(header);
    }
    for (name, value) in &api.headers {
        if let Some(header) = create_header(name, value) {
            response = response.with_header(header);
        }
    }
    if let Err(e) = request.respond(response) {
        error!("Failed to write response: {}", e);
    }
}

fn worker_loop(server: Arc<Server>, router: Arc<Router>, shutdown: Arc<AtomicBool>) {
    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }
        match server.recv_timeout(Duration::from_millis(RECV_TIMEOUT_MS)) {
            Ok(Some(request)) => {
                let api_request = to_api_request(&request);
                let request_id = uuid::Uuid::new_v4();
                let span = info_span!(
                    "request",
                    id = %request_id,
                    method = %api_request.method,
                    url = %api_request.url
                );
                let _guard = span.enter();

                let start = Instant::now();
                let api_response = router.handle(&api_request);
                info!(
                    status = api_response.status,
                    elapsed_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0),
                    "Handled request"
                );
                respond(request, api_response);
            }
            Ok(None) => {}
            Err(e) => {
                error!("Listener failed: {}", e);
                break;
            }
        }
    }
}

/// Running server. Dropping the handle stops the workers.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Flag that stops the workers once set
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// Block until every worker exits.
    pub fn wait(mut self) {
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }

    pub fn shutdown(self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.wait();
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

/// Bind `addr` and start `workers` threads sharing the listener.
pub fn start(addr: &str, workers: usize, router: Arc<Router>) -> io::Result<ServerHandle> {
    let server = Server::http(addr).map_err(|e| io::Error::other(e.to_string()))?;
    let local = server
        .server_addr()
        .to_ip()
        .ok_or_else(|| io::Error::other("listener has no IP address"))?;
    let server = Arc::new(server);
    let shutdown = Arc::new(AtomicBool::new(false));

    let mut handles = Vec::with_capacity(workers);
    for index in 0..workers.max(1) {
        let server = server.clone();
        let router = router.clone();
        let shutdown = shutdown.clone();
        let handle = thread::Builder::new()
            .name(format!("http-worker-{}", index))
            .spawn(move || worker_loop(server, router, shutdown))?;
        handles.push(handle);
    }
    info!(addr = %local, workers = handles.len(), "Listening");

    Ok(ServerHandle {
        addr: local,
        shutdown,
        workers: handles,
    })
}
