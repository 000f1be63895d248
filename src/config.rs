//! Style collection settings.
//!
//! `StyleOptions` replaces the build-mode checks of a classic CSS-in-JS
//! runtime with explicit flags, so both behaviours can be exercised in the
//! same binary. The struct deserializes from a settings file section:
//!
//! ```toml
//! [styles]
//! strict_validation = false
//! minify = true
//! ```

use crate::minify::{CssMinifier, Minifier};
use crate::nonce::NonceSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Options controlling validation and serialization of collected styles.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOptions {
	/// Reject duplicate `add_component` calls and injections into unknown
	/// components.
	#[serde(default = "default_strict_validation")]
	pub strict_validation: bool,

	/// Minify CSS bodies when serializing tags.
	#[serde(default = "default_minify")]
	pub minify: bool,
}

fn default_strict_validation() -> bool {
	cfg!(debug_assertions)
}

fn default_minify() -> bool {
	!cfg!(debug_assertions)
}

impl Default for StyleOptions {
	fn default() -> Self {
		Self {
			strict_validation: default_strict_validation(),
			minify: default_minify(),
		}
	}
}

impl StyleOptions {
	/// Creates options matching the current build profile.
	pub fn new() -> Self {
		Self::default()
	}

	/// Strict validation, verbatim CSS.
	pub fn development() -> Self {
		Self {
			strict_validation: true,
			minify: false,
		}
	}

	/// No validation, minified CSS.
	pub fn production() -> Self {
		Self {
			strict_validation: false,
			minify: true,
		}
	}

	/// Sets strict validation.
	pub fn strict_validation(mut self, enable: bool) -> Self {
		self.strict_validation = enable;
		self
	}

	/// Sets CSS minification.
	pub fn minify(mut self, enable: bool) -> Self {
		self.minify = enable;
		self
	}
}

/// Serialization environment shared by every tag of a stylesheet.
///
/// Bundles the options with the nonce and minifier collaborators. Tags keep
/// an `Arc<StyleEnv>` so clones share the same collaborators.
#[derive(Clone)]
pub struct StyleEnv {
	options: StyleOptions,
	nonce: Arc<dyn NonceSource>,
	minifier: Arc<dyn Minifier>,
}

impl fmt::Debug for StyleEnv {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StyleEnv")
			.field("options", &self.options)
			.field("nonce", &"<source>")
			.field("minifier", &"<minifier>")
			.finish()
	}
}

impl Default for StyleEnv {
	fn default() -> Self {
		Self::new(StyleOptions::default())
	}
}

impl StyleEnv {
	/// Creates an environment without a nonce, using [`CssMinifier`].
	pub fn new(options: StyleOptions) -> Self {
		Self {
			options,
			nonce: Arc::new(()),
			minifier: Arc::new(CssMinifier::new()),
		}
	}

	/// Sets the nonce source queried on every serialization.
	pub fn with_nonce(mut self, source: impl NonceSource + 'static) -> Self {
		self.nonce = Arc::new(source);
		self
	}

	/// Replaces the minifier.
	pub fn with_minifier(mut self, minifier: impl Minifier + 'static) -> Self {
		self.minifier = Arc::new(minifier);
		self
	}

	/// Returns the options.
	pub fn options(&self) -> &StyleOptions {
		&self.options
	}

	/// Returns the current nonce, treating an empty value as absent.
	pub fn nonce(&self) -> Option<String> {
		self.nonce.nonce().filter(|n| !n.is_empty())
	}

	/// Applies the minifier when `minify` is enabled.
	pub fn finish_css(&self, css: String) -> String {
		if self.options.minify {
			self.minifier.minify(&css)
		} else {
			css
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::nonce::CspNonce;
	use rstest::rstest;

	#[rstest]
	fn test_development_and_production_presets() {
		let dev = StyleOptions::development();
		assert!(dev.strict_validation);
		assert!(!dev.minify);

		let prod = StyleOptions::production();
		assert!(!prod.strict_validation);
		assert!(prod.minify);
	}

	#[rstest]
	fn test_builder_overrides() {
		let opts = StyleOptions::production().strict_validation(true).minify(false);
		assert_eq!(opts, StyleOptions::development());
	}

	#[rstest]
	fn test_deserialize_missing_fields_uses_profile_defaults() {
		let opts: StyleOptions = serde_json::from_str("{}").unwrap();
		assert_eq!(opts, StyleOptions::default());

		let opts: StyleOptions = serde_json::from_str(r#"{"minify": true}"#).unwrap();
		assert!(opts.minify);
		assert_eq!(opts.strict_validation, cfg!(debug_assertions));
	}

	#[rstest]
	fn test_env_empty_nonce_is_absent() {
		let env = StyleEnv::new(StyleOptions::development()).with_nonce(CspNonce::new(""));
		assert_eq!(env.nonce(), None);

		let env = StyleEnv::new(StyleOptions::development()).with_nonce(CspNonce::new("n0"));
		assert_eq!(env.nonce(), Some("n0".to_string()));
	}

	#[rstest]
	fn test_finish_css_respects_minify_flag() {
		let css = "a { color: red; }\n".to_string();
		let dev = StyleEnv::new(StyleOptions::development());
		assert_eq!(dev.finish_css(css.clone()), css);

		let prod = StyleEnv::new(StyleOptions::production());
		assert_eq!(prod.finish_css(css), "a{color:red}");
	}
}
