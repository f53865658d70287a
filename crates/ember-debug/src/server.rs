//! HTTP control server implementation.

use crate::{ControlState, ParamPatch};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Method, Request, Response, Server};

#[derive(Debug, thiserror::Error)]
pub enum ControlServerError {
    #[error("Failed to bind to port {port}: {error}")]
    BindError { port: u16, error: String },
}

/// HTTP server for the control API.
/// Runs on a background thread to avoid blocking the render loop.
pub struct ControlServer {
    port: u16,
    actual_port: Option<u16>,
    handle: Option<JoinHandle<()>>,
}

#[derive(Serialize, Deserialize)]
struct Command {
    command: String,
    /// Preset name for `load_scene`, e.g. "fireball" or "classic".
    #[serde(default)]
    preset: Option<ember_scene::ScenePreset>,
}

#[derive(Serialize)]
struct CommandResponse {
    executed: bool,
    command: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    uptime_seconds: f64,
}

impl ControlServer {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            actual_port: None,
            handle: None,
        }
    }

    pub fn start(&mut self, state: Arc<Mutex<ControlState>>) -> Result<(), ControlServerError> {
        let server = Server::http(format!("127.0.0.1:{}", self.port)).map_err(|e| {
            ControlServerError::BindError {
                port: self.port,
                error: e.to_string(),
            }
        })?;

        let actual_port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .unwrap_or(self.port);
        self.actual_port = Some(actual_port);

        let handle = thread::spawn(move || {
            Self::run_server(server, state);
        });

        self.handle = Some(handle);
        Ok(())
    }

    pub fn stop(&mut self) {
        // tiny_http doesn't support graceful shutdown, so we just detach the
        // thread. It terminates when the process ends.
        if let Some(handle) = self.handle.take() {
            std::mem::forget(handle);
        }
    }

    pub fn actual_port(&self) -> u16 {
        self.actual_port.unwrap_or(self.port)
    }

    fn run_server(server: Server, state: Arc<Mutex<ControlState>>) {
        for request in server.incoming_requests() {
            if let Err(e) = Self::handle_request(request, &state) {
                eprintln!("Control server error: {}", e);
            }
        }
    }

    fn handle_request(
        mut request: Request,
        state: &Arc<Mutex<ControlState>>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let response = match (request.method(), request.url()) {
            (&Method::Get, "/health") => {
                let control_state = state.lock().unwrap();
                let response = HealthResponse {
                    status: "ok".to_string(),
                    uptime_seconds: control_state.uptime_seconds,
                };
                json_response(serde_json::to_string(&response)?)
            }
            (&Method::Get, "/metrics") => {
                let control_state = state.lock().unwrap();
                json_response(serde_json::to_string(&*control_state)?)
            }
            (&Method::Get, "/params") => {
                let control_state = state.lock().unwrap();
                json_response(serde_json::to_string(&control_state.params)?)
            }
            (&Method::Post, "/params") => {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body)?;
                let patch: ParamPatch = serde_json::from_str(&body)?;

                let mut control_state = state.lock().unwrap();
                patch.apply(&mut control_state.params);
                if !patch.is_empty() {
                    control_state.params_dirty = true;
                }
                // Echo the resulting (clamped) parameters.
                json_response(serde_json::to_string(&control_state.params)?)
            }
            (&Method::Post, "/command") => {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body)?;
                let command: Command = serde_json::from_str(&body)?;

                let executed = {
                    let mut control_state = state.lock().unwrap();
                    match command.command.as_str() {
                        "quit" => {
                            control_state.quit_requested = true;
                            true
                        }
                        "reset_scene" => {
                            control_state.reset_requested = true;
                            true
                        }
                        "load_scene" => {
                            control_state.load_requested = true;
                            control_state.load_preset = command.preset;
                            true
                        }
                        _ => false,
                    }
                };

                let response = CommandResponse {
                    executed,
                    command: command.command,
                };
                json_response(serde_json::to_string(&response)?)
            }
            _ => Response::from_string("Not Found").with_status_code(404),
        };

        request.respond(response)?;
        Ok(())
    }
}

fn json_response(json: String) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(json).with_header(
        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
    )
}

impl Drop for ControlServer {
    fn drop(&mut self) {
        self.stop();
    }
}
