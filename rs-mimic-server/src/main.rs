use std::env;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use log::{error, info, warn};

use serde::Deserialize;
use rs_mimic_core::extraction::{save_user_messages, sentences_from_messages, user_identifier};
use rs_mimic_core::{MimicConfig, MimicError, TextGenerator};

/// Address used when `MIMIC_BIND` is not set.
const DEFAULT_BIND: &str = "127.0.0.1:5000";

type SharedGenerator = web::Data<TextGenerator>;

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	name: Option<String>,
}

/// Body of the `/v1/extract` endpoint: messages already fetched from the
/// chat platform for one user.
#[derive(Deserialize)]
struct ExtractBody {
	user_id: u64,
	messages: Vec<String>,
}

/// Maps a core error to an HTTP response, keeping "no such corpus" distinct
/// from server-side failures.
fn error_response(e: &MimicError) -> HttpResponse {
	match e {
		MimicError::NotFound { identifier, .. } => {
			HttpResponse::NotFound().body(format!("No corpus named '{identifier}'"))
		}
		MimicError::InvalidIdentifier(_) | MimicError::InvalidConfig(_) | MimicError::InvalidOrder(_) => {
			HttpResponse::BadRequest().body(e.to_string())
		}
		MimicError::Io { .. } | MimicError::CacheUnavailable => {
			error!("{e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP GET endpoint `/v1/generate?name=<identifier>`
///
/// Generates one sentence from the named corpus. An empty body means the
/// corpus holds no usable sentence start.
#[get("/v1/generate")]
async fn get_generated(data: SharedGenerator, query: web::Query<GenerateParams>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim().to_owned(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	// The corpus read on a cache miss is blocking I/O
	let generator = data.clone();
	let result = web::block(move || generator.generate_text(&name)).await;

	match result {
		Ok(Ok(text)) => HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(text),
		Ok(Err(e)) => error_response(&e),
		Err(e) => {
			error!("generation task failed: {e}");
			HttpResponse::InternalServerError().body("Generation failed")
		}
	}
}

/// HTTP GET endpoint `/v1/corpora`: identifiers available on disk.
#[get("/v1/corpora")]
async fn get_corpora(data: SharedGenerator) -> impl Responder {
	match data.list_corpora() {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(e) => error_response(&e),
	}
}

/// HTTP GET endpoint `/v1/cached`: models in memory, least recently used first.
#[get("/v1/cached")]
async fn get_cached(data: SharedGenerator) -> impl Responder {
	match data.cached_identifiers() {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(e) => error_response(&e),
	}
}

/// HTTP PUT endpoint `/v1/extract`
///
/// Splits the posted messages into sentences, stores them as the corpus of
/// the user and drops any cached model of that corpus.
#[put("/v1/extract")]
async fn put_extract(data: SharedGenerator, body: web::Json<ExtractBody>) -> impl Responder {
	let ExtractBody { user_id, messages } = body.into_inner();

	let generator = data.clone();
	let result = web::block(move || {
		let sentences = sentences_from_messages(generator.tokenizer(), &messages);
		save_user_messages(&generator.config().corpus_dir, user_id, &sentences)?;
		let identifier = user_identifier(user_id);
		generator.forget(&identifier)?;
		Ok::<_, MimicError>((identifier, sentences.len()))
	})
	.await;

	match result {
		Ok(Ok((identifier, count))) => {
			info!("extracted {count} sentences into '{identifier}'");
			HttpResponse::Ok().body(identifier)
		}
		Ok(Err(e)) => error_response(&e),
		Err(e) => {
			error!("extraction task failed: {e}");
			HttpResponse::InternalServerError().body("Extraction failed")
		}
	}
}

/// HTTP GET endpoint `/v1/config`: active configuration as JSON.
#[get("/v1/config")]
async fn get_config(data: SharedGenerator) -> impl Responder {
	HttpResponse::Ok().json(data.config())
}

/// Registers every endpoint; shared by `main` and the tests.
fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated)
		.service(get_corpora)
		.service(get_cached)
		.service(put_extract)
		.service(get_config);
}

/// Main entry point for the server.
///
/// Reads the configuration from the environment, builds the shared
/// `TextGenerator` (its model cache is internally synchronized) and starts
/// an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to `MIMIC_BIND` (default 127.0.0.1:5000).
/// - Log level is controlled by `RUST_LOG` (default `info`).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = MimicConfig::from_env().map_err(std::io::Error::other)?;
	if !config.corpus_dir.is_dir() {
		warn!("corpus directory {} does not exist yet", config.corpus_dir.display());
	}
	info!("serving corpora from {} ({config:?})", config.corpus_dir.display());

	let generator = TextGenerator::from_config(config).map_err(std::io::Error::other)?;
	let shared_generator = web::Data::new(generator);
	let bind = env::var("MIMIC_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_owned());

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_generator.clone())
			.configure(configure)
	})
		.workers(num_cpus::get())
		.bind(bind)?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::StatusCode;
	use actix_web::test;
	use std::fs;
	use std::path::PathBuf;

	fn scratch_dir(name: &str) -> PathBuf {
		let dir = env::temp_dir().join(format!("rs_mimic_server_{}_{}", name, std::process::id()));
		let _ = fs::remove_dir_all(&dir);
		fs::create_dir_all(&dir).unwrap();
		dir
	}

	fn shared(dir: &PathBuf) -> SharedGenerator {
		let config = MimicConfig { corpus_dir: dir.clone(), order: 2, ..MimicConfig::default() };
		web::Data::new(TextGenerator::from_config(config).unwrap())
	}

	#[actix_web::test]
	async fn generate_known_and_unknown_corpus() {
		let dir = scratch_dir("generate");
		fs::write(dir.join("alice.txt"), "Curiouser and curiouser!").unwrap();
		let app = test::init_service(App::new().app_data(shared(&dir)).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/generate?name=alice").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);
		let body = test::read_body(resp).await;
		assert_eq!(body, "Curiouser and curiouser!");

		let req = test::TestRequest::get().uri("/v1/generate?name=bob").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::NOT_FOUND);

		let req = test::TestRequest::get().uri("/v1/generate").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

		fs::remove_dir_all(&dir).unwrap();
	}

	#[actix_web::test]
	async fn extract_then_list_and_generate() {
		let dir = scratch_dir("extract");
		let app = test::init_service(App::new().app_data(shared(&dir)).configure(configure)).await;

		let req = test::TestRequest::put()
			.uri("/v1/extract")
			.set_json(extract_request(42, &["Ola mundo."]))
			.to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);
		assert_eq!(test::read_body(resp).await, "user_messages_42");

		let req = test::TestRequest::get().uri("/v1/corpora").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "user_messages_42");

		let req = test::TestRequest::get().uri("/v1/generate?name=user_messages_42").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "Ola mundo.");

		let req = test::TestRequest::get().uri("/v1/cached").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "user_messages_42");

		fs::remove_dir_all(&dir).unwrap();
	}

	#[actix_web::test]
	async fn config_is_served_as_json() {
		let dir = scratch_dir("config");
		let app = test::init_service(App::new().app_data(shared(&dir)).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/config").to_request();
		let config: MimicConfig = test::call_and_read_body_json(&app, req).await;
		assert_eq!(config.order, 2);
		assert_eq!(config.corpus_dir, dir);

		fs::remove_dir_all(&dir).unwrap();
	}

	fn extract_request(user_id: u64, messages: &[&str]) -> ExtractRequest {
		ExtractRequest {
			user_id,
			messages: messages.iter().map(|m| m.to_string()).collect(),
		}
	}

	#[derive(serde::Serialize)]
	struct ExtractRequest {
		user_id: u64,
		messages: Vec<String>,
	}
}
