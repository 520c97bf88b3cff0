//! Transcriptic API client library for Rust.
//!
//! A thin, blocking client for the
//! [Transcriptic](https://secure.transcriptic.com) laboratory automation API:
//! projects, runs, containers and aliquots, protocols and datasets.
//!
//! Every call sends one HTTP request carrying the `X-User-Email` and
//! `X-User-Token` headers and hands back the raw [`Response`]. Bodies are not
//! parsed and non-2xx statuses are not turned into errors; inspect
//! `response.status()` and read the body yourself.
//!
//! # Quick Start
//!
//! ```no_run
//! use transcriptic_client::{ClientConfig, CreateRunParams, TranscripticClient};
//!
//! let config = ClientConfig::from_env().unwrap();
//! let client = TranscripticClient::from_config(&config).unwrap();
//!
//! let runs = client.get_runs("kz-lab", "p1").unwrap();
//! println!("{}", runs.text().unwrap());
//!
//! let protocol = serde_json::json!({ "refs": {}, "instructions": [] });
//! let created = client
//!     .create_run("kz-lab", "p1", &CreateRunParams::new(protocol, "Run A"))
//!     .unwrap();
//! println!("{}", created.status());
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod request;

// Re-export the main public types at the crate root for convenience.
pub use client::TranscripticClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{Result, TranscripticError};
pub use request::{ApiRequest, CreateRunParams, QueryValue};
pub use reqwest::blocking::Response;
pub use reqwest::Method;
