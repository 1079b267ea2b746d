//! OpenAPI specification generation and app factory.

use crate::{
    config::AppConfig,
    handlers::{WEATHER_FORECAST_PATH, add_weather_endpoints, get_weather_forecast},
    middleware::{BearerAuthentication, HttpsRedirection, RequestIdMiddleware},
    routing::{BEARER_SCHEME, ProducesResponse, RouteGroupBuilder, RouteTable},
    services::auth::BearerTokenValidator,
};
use actix_web::{
    App, HttpResponse,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use paperclip::actix::{OpenApiExt, api_v2_operation, web};
use paperclip::v2::models::{DefaultApiRaw, Info};
use serde_json::{Value, json};
use std::sync::Arc;

pub const SWAGGER_UI_PATH: &str = "/swagger";
pub const SWAGGER_JSON_PATH: &str = "/swagger/v1/swagger.json";

const SWAGGER_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Minimal Weather API - OpenAPI</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 0; background: #f5f5f5; color: #333; }
        .container { max-width: 800px; margin: 40px auto; padding: 20px; background: #fff; border-radius: 8px; }
        pre { background: #eee; padding: 20px; border-radius: 4px; overflow-x: auto; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Minimal Weather API</h1>
        <pre id="openapi">Loading...</pre>
    </div>
    <script>
        fetch('/swagger/v1/swagger.json')
            .then(response => response.json())
            .then(data => {
                document.getElementById('openapi').textContent = JSON.stringify(data, null, 2);
            })
            .catch(error => {
                document.getElementById('openapi').textContent = 'Error loading spec: ' + error;
            });
    </script>
</body>
</html>"#;

/// The finished OpenAPI document served in development
#[derive(Clone, Debug)]
pub struct OpenApiDocument(pub Value);

/// Creates the base OpenAPI specification; paths are filled in by paperclip
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Minimal Weather API".into(),
            version: "v1".into(),
            description: Some(
                "Mock weather forecasts behind JWT bearer authentication.\n\n\
                Send `Authorization: Bearer <token>` with a token signed by one of the \
                configured signing keys, issued by the matching issuer and addressed to \
                one of the valid audiences."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Swagger 2.0 security definition for the bearer scheme
pub fn bearer_security_definition() -> Value {
    json!({
        "type": "apiKey",
        "name": "Authorization",
        "in": "header",
        "description": "JWT Authorization header using the Bearer scheme. Example: \"Bearer {token}\""
    })
}

/// Merge the finalized route metadata into a generated document
///
/// Operation ids, tags and security requirements come from each endpoint's
/// OpenAPI operation. The bearer security definition is added when any
/// operation references it.
pub fn apply_route_metadata(mut document: Value, routes: &RouteTable) -> Value {
    let mut uses_bearer = false;

    for endpoint in routes.endpoints() {
        let Some(operation) = endpoint.operation() else {
            continue;
        };
        let method = endpoint.method().as_str().to_lowercase();
        let Some(target) = document
            .get_mut("paths")
            .and_then(|paths| paths.get_mut(endpoint.pattern()))
            .and_then(|item| item.get_mut(&method))
            .and_then(Value::as_object_mut)
        else {
            tracing::debug!(endpoint = %endpoint, "No generated operation to annotate");
            continue;
        };

        if let Some(operation_id) = &operation.operation_id {
            target.insert("operationId".to_string(), json!(operation_id));
        }

        if !operation.tags.is_empty() {
            let tags = target
                .entry("tags")
                .or_insert_with(|| json!([]));
            if let Some(tags) = tags.as_array_mut() {
                for tag in &operation.tags {
                    if !tags.iter().any(|t| t == tag.as_str()) {
                        tags.push(json!(tag));
                    }
                }
            }
        }

        for produced in endpoint.produces() {
            merge_produces(target, produced);
        }

        if !operation.security.is_empty() {
            uses_bearer |= operation
                .security
                .iter()
                .any(|requirement| requirement.contains_key(BEARER_SCHEME));
            target.insert("security".to_string(), json!(operation.security));
        }
    }

    if uses_bearer {
        if let Some(root) = document.as_object_mut() {
            let definitions = root
                .entry("securityDefinitions")
                .or_insert_with(|| json!({}));
            if let Some(definitions) = definitions.as_object_mut() {
                definitions.insert(BEARER_SCHEME.to_string(), bearer_security_definition());
            }
        }
    }

    document
}

/// Record a declared response on a generated operation
///
/// The content type joins the operation's `produces` list. A status the
/// generator did not document gets a response entry of its own.
fn merge_produces(operation: &mut serde_json::Map<String, Value>, produced: &ProducesResponse) {
    let produces = operation
        .entry("produces")
        .or_insert_with(|| json!([]));
    if let Some(produces) = produces.as_array_mut() {
        if !produces.iter().any(|p| p == produced.content_type.as_str()) {
            produces.push(json!(produced.content_type));
        }
    }

    let responses = operation
        .entry("responses")
        .or_insert_with(|| json!({}));
    if let Some(responses) = responses.as_object_mut() {
        let description = StatusCode::from_u16(produced.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or(produced.schema);
        responses
            .entry(produced.status.to_string())
            .or_insert_with(|| json!({ "description": description }));
    }
}

/// OpenAPI document endpoint
#[api_v2_operation(skip)]
pub async fn swagger_json(document: web::Data<OpenApiDocument>) -> HttpResponse {
    HttpResponse::Ok().json(&document.0)
}

/// OpenAPI viewer page
#[api_v2_operation(skip)]
pub async fn swagger_ui() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html")
        .body(SWAGGER_HTML)
}

/// Finalize the application's route metadata
pub fn build_routes() -> RouteTable {
    let mut group = RouteGroupBuilder::new("/");
    add_weather_endpoints(&mut group);
    RouteTable::new(group.build())
}

/// Creates the application with its full middleware stack
///
/// App-level middleware, outermost first: HTTPS redirection, request IDs.
/// Bearer authentication wraps each resource whose route metadata requires
/// it. The OpenAPI document and viewer are mounted only in the Development
/// environment.
pub fn create_app(
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + use<>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let routes = Arc::new(build_routes());
    let validator = BearerTokenValidator::new(&config.jwt_bearer);

    // The guard sits on the resource so it runs after routing, whatever form
    // the request path arrived in
    let weather = web::resource(WEATHER_FORECAST_PATH)
        .wrap(BearerAuthentication::for_route(
            validator,
            &routes,
            WEATHER_FORECAST_PATH,
        ))
        .route(web::get().to(get_weather_forecast));

    let app = App::new()
        .wrap(RequestIdMiddleware)
        .wrap(HttpsRedirection::new(config.https.clone()))
        .wrap_api_with_spec(create_openapi_spec())
        .service(weather);

    let app = if config.environment.is_development() {
        app.with_raw_json_spec(|app, spec| {
            let document = OpenApiDocument(apply_route_metadata(spec, &routes));
            app.app_data(web::Data::new(document))
                .service(web::resource(SWAGGER_JSON_PATH).route(web::get().to(swagger_json)))
                .service(web::resource(SWAGGER_UI_PATH).route(web::get().to(swagger_ui)))
        })
    } else {
        app
    };

    app.build()
}
