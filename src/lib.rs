//! Backend relay that exchanges Salesforce OAuth 2.0 authorization codes and refresh tokens on
//! behalf of a browser frontend, keeping the confidential client secret on the server.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod config;
pub mod error;
pub mod grant;
pub mod http;
pub mod obs;
pub mod relay;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
// The binary target reports startup failures through `color_eyre`.
use color_eyre as _;
#[cfg(test)]
use {httpmock as _, tower as _};
