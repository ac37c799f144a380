//! # flora-client
//!
//! Flora REST API 的 Rust 客户端：构建请求、执行认证扩展、映射响应，并支持异步与并行执行。
//!
//! Client library for Flora REST APIs. It turns operation descriptors into
//! HTTP requests, lets applications plug in authorization, maps responses to
//! payloads or typed errors, and runs operations one at a time or in parallel.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flora_client::{FloraClient, OperationDescriptor};
//!
//! #[tokio::main]
//! async fn main() -> flora_client::Result<()> {
//!     let client = FloraClient::new("https://api.example.com/")?;
//!
//!     let op = OperationDescriptor::new("article")
//!         .id(133)
//!         .select("id,title,author.name")
//!         .filter("status=published");
//!
//!     let payload = client.execute(op).await?;
//!     println!("{:?}", payload.as_json());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client, builder, async and parallel dispatch |
//! | [`descriptor`] | Operation descriptors and parameter-map parsing |
//! | [`select`] | Nested select specification and its string form |
//! | [`factory`] | Operation to HTTP request translation |
//! | [`query`] | Query-string and form encoding |
//! | [`request`] | The outgoing request value |
//! | [`auth`] | Authorization extension point |
//! | [`response`] | Response mapping and payloads |
//! | [`transport`] | Transport trait and the reqwest implementation |
//! | [`config`] | Client configuration |
//! | [`env`] | Clock and process environment seams |
//! | [`error`] | Error types |
//! | [`error_code`] | HTTP status classification |

pub mod auth;
pub mod client;
pub mod config;
pub mod descriptor;
pub mod env;
pub mod error;
pub mod error_code;
pub mod factory;
pub mod query;
pub mod request;
pub mod response;
pub mod select;
pub mod transport;

pub use auth::AuthProvider;
pub use client::{FloraClient, FloraClientBuilder, PendingOperation};
pub use descriptor::{ItemId, OperationDescriptor};
pub use error::{Error, ErrorContext};
pub use error_code::ErrorKind;
pub use request::ApiRequest;
pub use response::Payload;
pub use select::{stringify_select, Select, SelectSpec};

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
