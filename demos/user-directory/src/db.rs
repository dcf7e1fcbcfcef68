use std::collections::BTreeMap;

/// One directory entry
#[derive(Debug, Clone)]
pub struct User {
	pub full_name: String,
	pub image: String,
	pub tel: String,
	pub quotes: BTreeMap<i64, String>,
}

/// In-memory user store, passed to handlers as shared context
///
/// BTreeMaps keep iteration order stable so rendered pages are
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
	users: BTreeMap<String, User>,
}

impl UserDirectory {
	/// Directory pre-loaded with the demo data set
	pub fn sample() -> Self {
		let mut users = BTreeMap::new();
		users.insert(
			"alice".to_string(),
			User {
				full_name: "Alice Martin".to_string(),
				image: "/static/img/alice.png".to_string(),
				tel: "555-0101".to_string(),
				quotes: BTreeMap::from([
					(1, "The best way out is always through.".to_string()),
					(2, "Simplicity is the soul of efficiency.".to_string()),
				]),
			},
		);
		users.insert(
			"bruno".to_string(),
			User {
				full_name: "Bruno Costa".to_string(),
				image: "/static/img/bruno.png".to_string(),
				tel: "555-0102".to_string(),
				quotes: BTreeMap::from([(
					1,
					"Make it work, make it right, make it fast.".to_string(),
				)]),
			},
		);
		users.insert(
			"clara".to_string(),
			User {
				full_name: "Clara Reyes".to_string(),
				image: "/static/img/clara.png".to_string(),
				tel: "555-0103".to_string(),
				quotes: BTreeMap::from([
					(1, "Deleted code is debugged code.".to_string()),
					(2, "First, solve the problem.".to_string()),
					(3, "Then, write the code.".to_string()),
				]),
			},
		);
		Self { users }
	}

	pub fn get(&self, username: &str) -> Option<&User> {
		self.users.get(username)
	}

	/// Usernames in sorted order
	pub fn usernames(&self) -> impl Iterator<Item = &str> {
		self.users.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.users.len()
	}

	pub fn is_empty(&self) -> bool {
		self.users.is_empty()
	}
}
