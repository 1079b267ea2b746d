//! Weather forecast endpoint handler and route registration.

use crate::{
    models::{AuthenticatedUser, WeatherForecast},
    routing::{EndpointConventionBuilder, RouteGroupBuilder, add_openapi_security_requirement},
    services::forecast::generate_forecast,
};
use actix_web::{HttpMessage, HttpRequest, web};
use chrono::Local;
use paperclip::actix::api_v2_operation;

pub const WEATHER_FORECAST_PATH: &str = "/weatherforecast";

/// Map the weather routes onto `group`
///
/// Every route in the group requires an authorized caller and is documented
/// with the bearer security requirement.
pub fn add_weather_endpoints(group: &mut RouteGroupBuilder) -> &mut RouteGroupBuilder {
    group.with_openapi().require_authorization();
    add_openapi_security_requirement(group);

    group
        .map_get(WEATHER_FORECAST_PATH)
        .with_name("GetWeatherForecast")
        .with_tags(&["Weather"])
        .produces(200, "WeatherForecast");

    group
}

/// Weather forecast endpoint
///
/// Returns five days of randomly generated forecast data starting tomorrow.
#[api_v2_operation(
    summary = "Weather Forecast Endpoint",
    description = "Returns a five-day forecast with randomly generated temperatures and summaries. Requires a bearer token in the Authorization header.",
    tags("Weather"),
    responses(
        (status = 200, description = "Successful response", body = Vec<WeatherForecast>),
        (status = 401, description = "Unauthorized - Missing or invalid bearer token")
    )
)]
pub async fn get_weather_forecast(req: HttpRequest) -> web::Json<Vec<WeatherForecast>> {
    let forecast = generate_forecast(&mut rand::thread_rng(), Local::now().date_naive());

    if let Some(user) = req.extensions().get::<AuthenticatedUser>() {
        tracing::debug!(subject = %user.subject, "Generated weather forecast");
    }

    web::Json(forecast)
}
