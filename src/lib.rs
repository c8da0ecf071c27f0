//! OneSky Client - Async Rust client for the OneSky translation API
//!
//! This library shapes and dispatches requests to the OneSky string
//! input/output API: submitting source strings and phrase collections,
//! recording translations, retrieving translated output, and tagging
//! file imports/exports with their format.
//!
//! All the logic lives in parameter normalization; transport concerns are
//! behind the [`Transport`] trait, implemented over reqwest by
//! [`HttpTransport`].
//!
//! ```no_run
//! use onesky_client::{HttpTransport, TranslationClient};
//!
//! # async fn demo() -> onesky_client::Result<()> {
//! let transport = HttpTransport::from_env()?;
//! let client = TranslationClient::new(42, transport);
//!
//! client
//!     .submit_phrases(vec![("greeting", "Hello"), ("farewell", "Goodbye")], None)
//!     .await?;
//! let translations = client.fetch_output_for_locale("ja").await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod core;

// Re-export key types for convenience
pub use self::core::{
    client::TranslationClient,
    config::ClientConfig,
    errors::{ClientError, Result},
    models::{FileFormat, PhraseValue, StringRecord},
    transport::{HttpTransport, Params, Transport},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
