//! Opaque continuation tokens carrying a complete [`SearchRequest`].
//!
//! A token is the hex encoding of a version byte followed by the binary-serialized request.
//! The same token is accepted as `scrollID` (resume paging) and `qs` (replay the search).

use serde::Serialize;

use crate::{Error, Result, SearchRequest};

const CURSOR_VERSION: u8 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrollPager {
	pub cursor: u32,
	pub total: u64,
	pub rows: u32,
	#[serde(rename = "scrollID")]
	pub scroll_id: String,
}

pub fn encode(sr: &SearchRequest) -> Result<String> {
	let mut payload = vec![CURSOR_VERSION];

	bincode::serialize_into(&mut payload, sr)
		.map_err(|err| Error::Encoding { message: format!("Unable to encode search request: {err}") })?;

	Ok(hex::encode(payload))
}

/// Decodes a token and marks the request as paging so aggregations are not recomputed.
pub fn decode(token: &str) -> Result<SearchRequest> {
	let bytes = hex::decode(token.trim())
		.map_err(|err| Error::Cursor { message: format!("token is not valid hex: {err}") })?;
	let Some((&version, payload)) = bytes.split_first() else {
		return Err(Error::Cursor { message: "token is empty".to_string() });
	};

	if version != CURSOR_VERSION {
		return Err(Error::Cursor { message: format!("unsupported token version {version}") });
	}

	let mut sr: SearchRequest = bincode::deserialize(payload)
		.map_err(|err| Error::Cursor { message: format!("token payload is corrupt: {err}") })?;

	sr.paging = true;

	Ok(sr)
}

impl SearchRequest {
	/// Advances `start` by one page and returns the pager for the page just served.
	///
	/// The returned `scroll_id` is empty when `total` is zero, when the page size is zero, or
	/// when the next page would start past the end of the result set.
	pub fn next_scroll_id(&mut self, total: u64) -> Result<ScrollPager> {
		if total == 0 {
			return Ok(ScrollPager::default());
		}

		let mut pager = ScrollPager {
			cursor: self.start,
			total,
			rows: self.response_size,
			scroll_id: String::new(),
		};

		if self.response_size == 0 {
			return Ok(pager);
		}

		self.start = self.start.saturating_add(self.response_size);

		if u64::from(self.start) >= total {
			return Ok(pager);
		}

		pager.scroll_id = encode(self)?;

		Ok(pager)
	}
}
