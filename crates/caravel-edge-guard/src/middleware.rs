// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Axum middleware adapter for the edge guard.
//!
//! Extracts the request facts (path, query, cookies) from each request,
//! asks the owning [`AreaGuard`] for a decision and either forwards the
//! request or answers with a temporary redirect.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use axum::{middleware::from_fn_with_state, Router};
//! use caravel_edge_guard::{guard_layer, EdgeGuard};
//!
//! let guard = Arc::new(EdgeGuard::from_config(&config, &navigation));
//! let app: Router = site_routes().layer(from_fn_with_state(guard, guard_layer));
//! ```

use std::sync::Arc;

use axum::{
	body::Body,
	extract::State,
	http::Request,
	middleware::Next,
	response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use crate::cookies::{cookie_value, has_cookie};
use crate::decision::{EdgeGuard, GuardDecision, GuardRequest};

/// Guard middleware for the site router.
///
/// Requests outside every guarded area pass through untouched. Redirects are
/// issued as 307 so the browser replays the method against the new location.
#[instrument(
	name = "edge_guard",
	skip(guard, request, next),
	fields(path = %request.uri().path(), area = tracing::field::Empty)
)]
pub async fn guard_layer(
	State(guard): State<Arc<EdgeGuard>>,
	request: Request<Body>,
	next: Next,
) -> Response {
	let path = request.uri().path();
	let area = match guard.area_for(path) {
		Some(area) => area,
		None => return next.run(request).await,
	};
	tracing::Span::current().record("area", area.policy().name.as_str());

	let headers = request.headers();
	let has_token = has_cookie(headers, area.token_cookie());
	let snapshot = cookie_value(headers, area.snapshot_cookie());

	let facts = GuardRequest {
		path,
		query: request.uri().query(),
		has_token,
		snapshot: snapshot.as_deref(),
	};

	match area.decide(&facts) {
		GuardDecision::Continue => next.run(request).await,
		GuardDecision::Redirect(target) => Redirect::temporary(&target).into_response(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{middleware, routing::get, Router};
	use caravel_edge_cipher::CipherKey;
	use caravel_edge_config::AreaConfig;
	use caravel_edge_permissions::{NavNode, RequiredPermission, RoutePermissionIndex};
	use http::header::{COOKIE, LOCATION};
	use http::StatusCode;
	use tower::ServiceExt;

	use crate::decision::AreaGuard;

	const SECRET: &str = "middleware test secret";

	fn navigation() -> Vec<NavNode> {
		vec![
			NavNode::new("Customers", "/admin/customers")
				.with_permission(RequiredPermission::new("customers").with_action("view")),
			NavNode::new("Bookings", "/admin/bookings")
				.with_permission(RequiredPermission::new("bookings").with_action("view")),
		]
	}

	fn test_guard() -> Arc<EdgeGuard> {
		let key = CipherKey::derive(SECRET);
		Arc::new(EdgeGuard::new(vec![
			AreaGuard::new(
				AreaConfig::admin_defaults(),
				key.clone(),
				RoutePermissionIndex::build(&navigation()),
			),
			AreaGuard::new(
				AreaConfig::account_defaults(),
				key,
				RoutePermissionIndex::build(&[]),
			),
		]))
	}

	async fn dummy_handler() -> &'static str {
		"ok"
	}

	fn app() -> Router {
		Router::new()
			.route("/admin/customers", get(dummy_handler))
			.route("/admin/bookings", get(dummy_handler))
			.route("/admin/login", get(dummy_handler))
			.route("/account/trips", get(dummy_handler))
			.route("/pricing", get(dummy_handler))
			.layer(middleware::from_fn_with_state(test_guard(), guard_layer))
	}

	fn location(response: &Response) -> &str {
		response
			.headers()
			.get(LOCATION)
			.expect("redirect carries a Location header")
			.to_str()
			.unwrap()
	}

	#[tokio::test]
	async fn unauthenticated_admin_requests_are_redirected_to_login() {
		let request = Request::builder()
			.uri("/admin/customers")
			.body(Body::empty())
			.unwrap();

		let response = app().oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
		assert!(location(&response).starts_with("/admin/login?callbackUrl="));
	}

	#[tokio::test]
	async fn granted_requests_reach_the_handler() {
		let request = Request::builder()
			.uri("/admin/customers")
			.header(
				COOKIE,
				"caravel_admin_session=tok; caravel_admin_session_grants={\"customers\":[\"view\"]}",
			)
			.body(Body::empty())
			.unwrap();

		let response = app().oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
	}

	#[tokio::test]
	async fn denied_requests_are_redirected_to_the_access_denied_page() {
		let request = Request::builder()
			.uri("/admin/bookings")
			.header(
				COOKIE,
				"caravel_admin_session=tok; caravel_admin_session_grants={\"customers\":[\"view\"]}",
			)
			.body(Body::empty())
			.unwrap();

		let response = app().oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
		assert_eq!(location(&response), "/admin/access-denied");
	}

	#[tokio::test]
	async fn signed_in_visitors_on_the_login_page_are_bounced_to_the_dashboard() {
		let request = Request::builder()
			.uri("/admin/login")
			.header(COOKIE, "caravel_admin_session=tok")
			.body(Body::empty())
			.unwrap();

		let response = app().oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
		assert_eq!(location(&response), "/admin/dashboard");
	}

	#[tokio::test]
	async fn the_account_area_needs_only_a_session() {
		let request = Request::builder()
			.uri("/account/trips")
			.header(COOKIE, "caravel_account_session=tok")
			.body(Body::empty())
			.unwrap();

		let response = app().oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
	}

	#[tokio::test]
	async fn unguarded_paths_pass_straight_through() {
		let request = Request::builder()
			.uri("/pricing")
			.body(Body::empty())
			.unwrap();

		let response = app().oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
	}

	#[tokio::test]
	async fn the_login_redirect_query_survives_the_seal() {
		let request = Request::builder()
			.uri("/admin/bookings?tab=upcoming")
			.body(Body::empty())
			.unwrap();

		let response = app().oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

		let location = location(&response).to_string();
		let token = location.split_once("callbackUrl=").unwrap().1;
		let cipher = caravel_edge_cipher::PathCipher::new(
			CipherKey::derive(SECRET),
			AreaConfig::admin_defaults().auth_routes,
		);
		assert_eq!(
			cipher.open(token).as_deref(),
			Some("/admin/bookings?tab=upcoming")
		);
	}
}
