use crate::db::UserDirectory;
use async_trait::async_trait;
use beaker_http::{Error, Handler, Request, Response, Result, SegmentValue};
use beaker_urls::UrlReverser;
use std::collections::BTreeSet;
use std::sync::Arc;

/// `/` — links to every profile, built through the reverser
pub struct IndexHandler {
	pub directory: Arc<UserDirectory>,
	pub urls: Arc<UrlReverser>,
}

#[async_trait]
impl Handler for IndexHandler {
	async fn handle(&self, _request: Request) -> Result<Response> {
		let mut items = String::new();
		for username in self.directory.usernames() {
			let url = self
				.urls
				.reverse_with("profile", &[("usernames", SegmentValue::from(username))])?;
			items.push_str(&format!("<li><a href=\"{url}\">{username}</a></li>"));
		}

		let everyone: Vec<String> = self.directory.usernames().map(str::to_string).collect();
		let all_url = self
			.urls
			.reverse_with("profile", &[("usernames", SegmentValue::List(everyone))])?;

		Ok(Response::html(format!(
			"<h1>User directory</h1>\
			 <ul>{items}</ul>\
			 <p><a href=\"{all_url}\">View everyone</a></p>"
		)))
	}
}

/// `/user/<list:usernames>/` — one page for several users at once
///
/// The converter hands over the raw token list; set semantics live here:
/// duplicates are collapsed and the result is rendered in sorted order. Any
/// unknown username fails the whole request with a 404.
pub struct ProfileHandler {
	pub directory: Arc<UserDirectory>,
	pub urls: Arc<UrlReverser>,
}

#[async_trait]
impl Handler for ProfileHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		let usernames = request
			.path_params
			.get_list("usernames")
			.ok_or_else(|| Error::Validation("missing usernames parameter".into()))?;

		let unique: BTreeSet<&str> = usernames.iter().map(String::as_str).collect();

		let mut sections = String::new();
		for username in unique {
			let user = self
				.directory
				.get(username)
				.ok_or_else(|| Error::NotFound("users not found".into()))?;

			let mut quote_links = String::new();
			for quote_id in user.quotes.keys() {
				let url = self.urls.reverse_with(
					"quote",
					&[
						("username", SegmentValue::from(username)),
						("quote_id", SegmentValue::Int(*quote_id)),
					],
				)?;
				quote_links.push_str(&format!(
					"<li><a href=\"{url}\">quote {quote_id}</a></li>"
				));
			}

			sections.push_str(&format!(
				"<section><h1>{}</h1>\
				 <img src=\"{}\" alt=\"{username}\">\
				 <p>tel: {}</p>\
				 <ul>{quote_links}</ul></section>",
				user.full_name, user.image, user.tel
			));
		}

		Ok(Response::html(sections))
	}
}

/// `/user/<username>/<int:quote_id>/` — a single quote
pub struct QuoteHandler {
	pub directory: Arc<UserDirectory>,
}

#[async_trait]
impl Handler for QuoteHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		let username = request
			.path_params
			.get_str("username")
			.ok_or_else(|| Error::Validation("missing username parameter".into()))?;
		let quote_id = request
			.path_params
			.get_int("quote_id")
			.ok_or_else(|| Error::Validation("missing quote_id parameter".into()))?;

		let user = self
			.directory
			.get(username)
			.ok_or_else(|| Error::NotFound(format!("no user {username:?}")))?;
		let quote = user.quotes.get(&quote_id).ok_or_else(|| {
			Error::NotFound(format!("no quote {quote_id} for {username:?}"))
		})?;

		Ok(Response::html(format!(
			"<h1>{}</h1><blockquote>{quote}</blockquote>",
			user.full_name
		)))
	}
}

/// `/file/<path:filename>/` — echoes a slash-spanning argument
pub struct FilePathHandler;

#[async_trait]
impl Handler for FilePathHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		let filename = request
			.path_params
			.get_str("filename")
			.ok_or_else(|| Error::Validation("missing filename parameter".into()))?;
		Ok(Response::text(format!("Received path argument: {filename}")))
	}
}

/// `/reg/<regex(...):name>/` — reports which prefix route captured the name
pub struct PrefixedNameHandler {
	pub letter: char,
}

#[async_trait]
impl Handler for PrefixedNameHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		let name = request
			.path_params
			.get_str("name")
			.ok_or_else(|| Error::Validation("missing name parameter".into()))?;
		Ok(Response::text(format!(
			"Argument starting with '{}': {name}",
			self.letter
		)))
	}
}
