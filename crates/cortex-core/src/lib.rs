#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Shared error taxonomy and extractors for the gateway
//!
//! Every adapter funnels failures through [`ProxyError`], which renders
//! the uniform `{"error": "..."}` JSON body the browser client expects.

mod error;
mod extract;

pub use error::{ProxyError, Result};
pub use extract::{FilePart, JsonBody, UploadForm, read_upload};
