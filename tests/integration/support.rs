use certfetch::config::{Config, DEFAULT_FIELD_PREFIX};
use certfetch::{BatchOrchestrator, Field, HttpTransport};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const DETAIL_PATH: &str = "/certificadosdgb/certificadoremesadetalles/";

/// Creates a test configuration pointing at the mock portal
pub fn create_test_config(server: &MockServer, batch_size: u64) -> Config {
    let mut config = Config::default();
    config.portal.base_url = format!("{}{}", server.uri(), DETAIL_PATH);
    config.portal.request_timeout_ms = 250;
    config.retry.max_attempts = 4;
    config.retry.backoff_ms = 0;
    config.batch.batch_size = batch_size;
    config.batch.max_workers = 4;
    config
}

pub fn orchestrator(config: &Config) -> BatchOrchestrator<HttpTransport> {
    BatchOrchestrator::from_config(config).expect("Failed to build orchestrator")
}

/// Renders a detail page the way the portal lays out certificate fields
pub fn certificate_page(folio: &str, omit: Option<Field>) -> String {
    let values = [
        (Field::InstitutionName, "CENTRO DE BACHILLERATO TECNOLOGICO 12"),
        (Field::StudentName, "JOSE ANTONIO REYES MORA"),
        (Field::WorkKey, "15DCT0012H"),
        (Field::Rvoe, "SIN RVOE"),
        (Field::Enrollment, "17150123"),
        (Field::GradeAverage, "8.9"),
        (Field::Period, "2017-2020"),
        (Field::CertificateType, "CERTIFICADO DE TERMINACION"),
        (Field::Folio, folio),
    ];

    let id_prefix = DEFAULT_FIELD_PREFIX.trim_start_matches('#');
    let rows: String = values
        .iter()
        .filter(|(field, _)| Some(*field) != omit)
        .map(|(field, value)| {
            format!(
                r#"<div class="row"><label>{}</label><span id="{}{}_{}_id">{}</span></div>"#,
                field,
                id_prefix,
                field.token(),
                field.token(),
                value
            )
        })
        .collect();

    format!(
        "<html><head><title>Detalle de certificado</title></head><body>{}</body></html>",
        rows
    )
}

/// Serves `body` for `identifier`
pub async fn mount_page(server: &MockServer, identifier: u64, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("{}{}", DETAIL_PATH, identifier)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}
