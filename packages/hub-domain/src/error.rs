pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Parse error: {message}")]
	Parse { message: String },
	#[error("Invalid cursor: {message}")]
	Cursor { message: String },
	#[error("Encoding error: {message}")]
	Encoding { message: String },
	#[error("Namespace error: {message}")]
	Namespace { message: String },
}
