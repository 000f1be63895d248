//! # Reinhardt Styled
//!
//! Server-side style collection for Reinhardt components.
//!
//! During a server render, styled components inject their CSS into a
//! stylesheet. This crate collects that CSS per request and serializes it
//! into `<style>` tags (or [`Page`] elements) that are inlined into the
//! response.
//!
//! ## Overview
//!
//! - [`StyleRegistry`]: owns the master stylesheet and the live clones handed
//!   to collectors
//! - [`ServerStyleSheet`]: one render pass; clones the registry sheet, scopes
//!   rendering to the clone, then serializes it
//! - [`StyleSheetManager`]: binds a sheet while a subtree renders
//! - [`ServerTag`]: the insertion-ordered component registry behind each
//!   `<style>` tag
//! - [`StyleOptions`]: strict validation and minification switches
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_styled::{
//!     ServerStyleSheet, StyleEnv, StyleOptions, StyleRegistry, StyledComponent,
//! };
//!
//! let registry = StyleRegistry::server(StyleEnv::new(StyleOptions::production()));
//! let button = StyledComponent::new("Button", "button", "sc-a1", ".sc-a1{color:red}");
//!
//! let mut sheet = ServerStyleSheet::new(&registry);
//! let body = sheet
//!     .collect_styles(|| button.render("Save").unwrap())?
//!     .render_to_string();
//! let styles = sheet.get_style_tags();
//! ```
//!
//! ## Attributes
//!
//! Serialized tags carry `type="text/css"`, [`SC_ATTR`] with the
//! space-separated style names, [`LOCAL_ATTR`] with `"true"` or `"false"`,
//! and `nonce` when the configured [`NonceSource`] yields one.

pub mod config;
pub mod error;
pub mod manager;
pub mod minify;
pub mod nonce;
pub mod page;
pub mod registry;
pub mod server;
pub mod sheet;
pub mod ssr;
pub mod styled;
pub mod tag;

pub use config::{StyleEnv, StyleOptions};
pub use error::{StyleError, StyleResult};
pub use manager::{StyleSheetManager, use_sheet};
pub use minify::{CssMinifier, Minifier};
pub use nonce::{CspNonce, NonceSource};
pub use page::{IntoPage, Page, PageElement};
pub use registry::StyleRegistry;
pub use server::ServerStyleSheet;
pub use sheet::{SheetHandle, StyleSheet, TagConstructor};
pub use ssr::{SsrOptions, StyledRenderer};
pub use styled::StyledComponent;
pub use tag::{ComponentRecord, LOCAL_ATTR, SC_ATTR, ServerTag, Tag};
