//! Demonstrates an IoC search and a spark lookup with the default reqwest transport, against a
//! local mock of the Blueliv API.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use blueliv_api::{Category, Dispatcher, OutputMode, SearchQuery, Settings};

fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start();
	let search_mock = server.mock(|when, then| {
		when.method(GET).path("/api/v1/search/iocs").query_param("search", "evil.com");
		then.status(200)
			.header("content-type", "application/json")
			.body(r#"[{"id":1,"type":"DOMAIN","content":"evil.com"}]"#);
	});
	let spark_mock = server.mock(|when, then| {
		when.method(GET).path("/api/v1/sparks/42");
		then.status(200)
			.header("content-type", "application/json")
			.body(r#"{"id":42,"tlp":"green"}"#);
	});
	let settings = Settings::builder().base_url(server.url("/api/v1")).token("demo-token").build()?;
	let dispatcher = Dispatcher::new(settings)?;
	let query = SearchQuery::new("evil.com").with_limit(10).with_output(OutputMode::Text);
	let found = dispatcher.search(Category::Iocs, &query)?.into_result()?;

	println!("Search result: {found:?}.");

	let spark = dispatcher.sparks().get("42")?.into_result()?;

	println!("Spark: {spark:?}.");
	println!("Requests sent: {}.", dispatcher.request_count());

	search_mock.assert();
	spark_mock.assert();

	Ok(())
}
