//! Path parsing and canned API responses.

use srlinux_types::{GROUP_NAME, GROUP_VERSION, PLURAL};
use wiremock::ResponseTemplate;

/// A request path under the Srlinux collection.
#[derive(Debug, PartialEq, Eq)]
pub struct ResourcePath<'a> {
	pub namespace: &'a str,
	pub name: Option<&'a str>,
	pub subresource: Option<&'a str>,
}

/// Split `/apis/{group}/{version}/namespaces/{ns}/{plural}[/{name}[/{sub}]]`.
///
/// Returns `None` for anything else.
pub fn parse_resource_path(path: &str) -> Option<ResourcePath<'_>> {
	let rest = path
		.trim_end_matches('/')
		.strip_prefix(&format!("/apis/{GROUP_NAME}/{GROUP_VERSION}/namespaces/"))?;
	let mut segments = rest.split('/');

	let namespace = segments.next().filter(|s| !s.is_empty())?;
	if segments.next()? != PLURAL {
		return None;
	}
	let name = segments.next();
	let subresource = segments.next();
	if segments.next().is_some() {
		return None;
	}

	Some(ResourcePath {
		namespace,
		name,
		subresource,
	})
}

/// Regex matching every path [`parse_resource_path`] accepts.
pub fn resource_path_regex() -> String {
	format!(
		r"^/apis/{}/{GROUP_VERSION}/namespaces/[^/]+/{PLURAL}(/[^/]+){{0,2}}/?$",
		GROUP_NAME.replace('.', r"\.")
	)
}

/// `metav1.Status` failure response.
pub fn status_failure(code: u16, reason: &str, message: String) -> ResponseTemplate {
	ResponseTemplate::new(code).set_body_json(serde_json::json!({
		"kind": "Status",
		"apiVersion": "v1",
		"metadata": {},
		"status": "Failure",
		"message": message,
		"reason": reason,
		"code": code
	}))
}

pub fn not_found(name: &str) -> ResponseTemplate {
	status_failure(
		404,
		"NotFound",
		format!("{PLURAL}.{GROUP_NAME} \"{name}\" not found"),
	)
}

pub fn already_exists(name: &str) -> ResponseTemplate {
	status_failure(
		409,
		"AlreadyExists",
		format!("{PLURAL}.{GROUP_NAME} \"{name}\" already exists"),
	)
}
