//! Malware sample upload.

// self
use crate::{
	_prelude::*,
	dispatch::{Dispatcher, OutputMode, RequestSpec, ResponseOutcome},
	http::{FilePart, HttpTransport},
};

/// Multipart field carrying an uploaded sample.
pub const SAMPLE_FIELD: &str = "file";

/// Malware endpoints.
pub struct Malwares<'a, C>
where
	C: ?Sized + HttpTransport,
{
	dispatcher: &'a Dispatcher<C>,
	output: OutputMode,
}
impl<'a, C> Malwares<'a, C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates the façade over `dispatcher`.
	pub fn new(dispatcher: &'a Dispatcher<C>) -> Self {
		Self { dispatcher, output: OutputMode::default() }
	}

	/// Selects how successful bodies are returned.
	pub fn with_output(mut self, output: OutputMode) -> Self {
		self.output = output;

		self
	}

	/// Uploads a sample as a multipart POST.
	pub fn upload(&self, file: FilePart) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;
		let resource = format!("{}{}", paths.malwares, paths.malwares_upload);

		self.dispatcher
			.dispatch(RequestSpec::get(resource).with_file(file).with_output(self.output))
	}

	/// Uploads raw bytes under `file_name` in the [`SAMPLE_FIELD`] part.
	pub fn upload_sample(&self, file_name: &str, bytes: Vec<u8>) -> Result<ResponseOutcome> {
		self.upload(FilePart::new(SAMPLE_FIELD, file_name, bytes))
	}
}
impl<C> Debug for Malwares<'_, C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Malwares").field("output", &self.output).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::*,
		http::{Method, OutboundBody},
	};

	#[test]
	fn upload_sends_a_multipart_post() {
		let dispatcher = test_dispatcher(StubTransport::default());

		dispatcher
			.malwares()
			.upload_sample("sample.exe", b"MZ\x90\x00".to_vec())
			.expect("Upload should dispatch.");

		let request = dispatcher.transport().last_request().expect("A request should be sent.");

		assert_eq!(request.method, Method::Post);
		assert_eq!(request.url.as_str(), "https://community.blueliv.com/api/v1/malwares/upload");

		let OutboundBody::Multipart { fields, files } = request.body else {
			panic!("Uploads should be multipart.");
		};

		assert!(fields.is_empty());
		assert_eq!(files.len(), 1);
		assert_eq!(files[0].field, SAMPLE_FIELD);
		assert_eq!(files[0].file_name, "sample.exe");
		assert_eq!(files[0].bytes, b"MZ\x90\x00".to_vec());
	}
}
