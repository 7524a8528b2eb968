/*
 * Copyright © 2024, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{Json, Router, http::StatusCode, response::{IntoResponse, Response}};
use serde::{Deserialize,Serialize};
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use odin_common::{info,error};

pub mod errors;
use errors::{OdinServerError,OdinServerResult};

type Result<T> = OdinServerResult<T>;

pub const DEFAULT_PORT: u16 = 3001;

#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
pub struct ServerConfig {
    pub sock_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default()->Self {
        ServerConfig { sock_addr: SocketAddr::new( IpAddr::V4( Ipv4Addr::LOCALHOST), DEFAULT_PORT) }
    }
}

impl ServerConfig {
    pub fn url (&self)->String {
        format!("http://{}", self.sock_addr)
    }

    pub fn with_port (&self, port: u16)->Self {
        ServerConfig { sock_addr: SocketAddr::new( self.sock_addr.ip(), port) }
    }
}

/// bind the configured socket and serve `router` from a new task until `shutdown` is cancelled.
/// Binding happens before spawning so that an unavailable port is reported to the caller.
/// Returns the actually bound address (which differs from the configured one for port 0)
pub async fn spawn_server_task (config: &ServerConfig, name: &str, router: Router, shutdown: CancellationToken)
                                ->Result<(SocketAddr, JoinHandle<Result<()>>)>
{
    let listener = TcpListener::bind( config.sock_addr).await.map_err( |e| OdinServerError::BindError( config.sock_addr, e))?;
    let local_addr = listener.local_addr()?;

    // note this won't do anything unless there also is a tracing subscriber set somewhere
    let router = if cfg!(feature="trace_server") { router.layer( TraceLayer::new_for_http()) } else { router };
    let router_svc = router.into_make_service_with_connect_info::<SocketAddr>();

    let name = name.to_string();
    info!("{} serving on http://{}", name, local_addr);

    let jh = tokio::spawn( async move {
        let res = axum::serve( listener, router_svc)
            .with_graceful_shutdown( async move { shutdown.cancelled().await })
            .await;

        match res {
            Ok(()) => { info!("{} terminated", name); Ok(()) }
            Err(e) => { error!("{} failed: {}", name, e); Err( OdinServerError::ServeError( e.to_string())) }
        }
    });

    Ok( (local_addr, jh) )
}

//--- handler utility functions

/// handler error that is reported to the client as `{"error": msg}` with the given status
#[derive(Debug,Clone,PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub msg: String,
}

impl ApiError {
    pub fn new (status: StatusCode, msg: impl ToString)->Self { ApiError { status, msg: msg.to_string() } }

    pub fn bad_request (msg: impl ToString)->Self { Self::new( StatusCode::BAD_REQUEST, msg) }
    pub fn not_found (msg: impl ToString)->Self { Self::new( StatusCode::NOT_FOUND, msg) }
    pub fn conflict (msg: impl ToString)->Self { Self::new( StatusCode::CONFLICT, msg) }
    pub fn internal (msg: impl ToString)->Self { Self::new( StatusCode::INTERNAL_SERVER_ERROR, msg) }
}

impl IntoResponse for ApiError {
    fn into_response (self)->Response {
        (self.status, Json( serde_json::json!({ "error": self.msg }))).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt (&self, f: &mut std::fmt::Formatter<'_>)->std::fmt::Result {
        write!( f, "{}: {}", self.status, self.msg)
    }
}

pub type ApiResult<T> = std::result::Result<Json<T>,ApiError>;
