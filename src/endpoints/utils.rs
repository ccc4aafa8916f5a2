use std::fmt::{Debug, Display};
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{Error, HttpResponse, Result};

/// Turns any displayable error into an empty response with `status_code`.
pub trait IntoHttpError<T> {
	fn map_error(self, status_code: StatusCode) -> Result<T>;
}

impl<T, E: Display + Debug + 'static> IntoHttpError<T> for std::result::Result<T, E> {
	fn map_error(self, status_code: StatusCode) -> Result<T> {
		self.map_err(|err| Error::from(InternalError::from_response(err, HttpResponse::new(status_code))))
	}
}
