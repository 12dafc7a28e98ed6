pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Namespace error: {message}")]
	Namespace { message: String },
	#[error("Upstream error: {message}")]
	Upstream { message: String },
	#[error("Encoding error: {message}")]
	Encoding { message: String },
	#[error("Invalid response: {message}")]
	InvalidResponse { message: String },
}
impl From<hub_domain::Error> for Error {
	fn from(err: hub_domain::Error) -> Self {
		match err {
			hub_domain::Error::Parse { message } | hub_domain::Error::Cursor { message } => {
				Self::InvalidRequest { message }
			},
			hub_domain::Error::Namespace { message } => Self::Namespace { message },
			hub_domain::Error::Encoding { message } => Self::Encoding { message },
		}
	}
}
