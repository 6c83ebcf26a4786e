use medi_risk::ModelError;
use std::net::SocketAddr;
use thiserror::Error;

/// Failures that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("cannot load model: {0}")]
    Model(#[from] ModelError),
    #[error("invalid page template: {0}")]
    Template(#[from] minijinja::Error),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server terminated: {0}")]
    Serve(#[source] std::io::Error),
}
