//! Tracked city handlers.
//!
//! Every mutating handler redirects back to the list with `303 See Other`,
//! whatever happened to the individual cities.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::{info, instrument};

use skycast_core::TrackedCityId;

use crate::db::TrackedCityRepository;
use crate::error::{AppError, Result};
use crate::models::{NewCity, TrackedCity};
use crate::state::AppState;

/// Tracked city display data for templates.
#[derive(Clone)]
pub struct CityView {
    pub id: i64,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub temperature: Option<String>,
    pub updated_at: Option<String>,
}

impl From<&TrackedCity> for CityView {
    fn from(city: &TrackedCity) -> Self {
        Self {
            id: city.id.as_i64(),
            name: city.name.to_string(),
            latitude: format!("{:.4}", city.coordinates.latitude()),
            longitude: format!("{:.4}", city.coordinates.longitude()),
            temperature: city.weather.map(|w| format!("{:.1} °C", w.temperature)),
            updated_at: city
                .weather
                .map(|w| w.updated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        }
    }
}

impl CityView {
    /// Temperature text, or a dash before the first successful refresh.
    #[must_use]
    pub fn temperature_label(&self) -> &str {
        self.temperature.as_deref().unwrap_or("-")
    }

    #[must_use]
    pub fn updated_label(&self) -> &str {
        self.updated_at.as_deref().unwrap_or("-")
    }
}

/// City list page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub cities: Vec<CityView>,
}

/// Add-city form data.
///
/// Coordinates arrive as text so that bad numbers get the same 400 as
/// out-of-range ones.
#[derive(Debug, Deserialize)]
pub struct AddCityForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
}

impl AddCityForm {
    fn into_new_city(self) -> Result<NewCity> {
        let latitude = parse_coordinate(&self.latitude, "latitude")?;
        let longitude = parse_coordinate(&self.longitude, "longitude")?;
        Ok(NewCity::parse(&self.name, latitude, longitude)?)
    }
}

fn parse_coordinate(raw: &str, field: &str) -> Result<f64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{field} must be a number")))
}

/// Display the tracked city list.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let cities = TrackedCityRepository::new(state.pool()).list().await?;

    Ok(IndexTemplate {
        cities: cities.iter().map(CityView::from).collect(),
    })
}

/// Track a new city.
#[instrument(skip_all, fields(name = %form.name))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddCityForm>) -> Result<Redirect> {
    let city = form.into_new_city()?;
    let created = TrackedCityRepository::new(state.pool()).create(&city).await?;
    info!(id = %created.id, "City added");

    Ok(Redirect::to("/"))
}

/// Stop tracking a city. Unknown ids are ignored.
#[instrument(skip_all, fields(id))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Redirect> {
    tracing::Span::current().record("id", id);
    let removed = TrackedCityRepository::new(state.pool())
        .delete(TrackedCityId::new(id))
        .await?;
    if removed {
        info!("City removed");
    } else {
        info!("City not found, nothing removed");
    }

    Ok(Redirect::to("/"))
}

/// Replace the tracked list with the default cities.
#[instrument(skip_all)]
pub async fn reset(State(state): State<AppState>) -> Result<Redirect> {
    let created = TrackedCityRepository::new(state.pool())
        .reset_to_defaults()
        .await?;
    info!(created, "Cities reset to defaults");

    Ok(Redirect::to("/"))
}

/// Refresh weather for every tracked city.
#[instrument(skip_all)]
pub async fn update(State(state): State<AppState>) -> Result<Redirect> {
    state.refresh().refresh_all(state.pool()).await?;

    Ok(Redirect::to("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use skycast_core::{CityName, Coordinates};

    use super::*;
    use crate::models::WeatherReading;

    fn form(name: &str, latitude: &str, longitude: &str) -> AddCityForm {
        AddCityForm {
            name: name.to_string(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
        }
    }

    #[test]
    fn test_form_parses_valid_input() {
        let city = form(" Lyon ", "45.76", " 4.84").into_new_city().unwrap();
        assert_eq!(city.name.as_str(), "Lyon");
        assert!((city.coordinates.longitude() - 4.84).abs() < f64::EPSILON);
    }

    #[test]
    fn test_form_rejects_non_numeric() {
        let err = form("Lyon", "north", "4.84").into_new_city().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("latitude")));
    }

    #[test]
    fn test_form_rejects_out_of_range_and_blank() {
        assert!(matches!(
            form("Lyon", "45.76", "200").into_new_city(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            form("   ", "45.76", "4.84").into_new_city(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            form("Lyon", "NaN", "4.84").into_new_city(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_city_view_formats_reading() {
        let city = TrackedCity {
            id: TrackedCityId::new(3),
            name: CityName::parse("Lyon").unwrap(),
            coordinates: Coordinates::new(45.76, 4.84).unwrap(),
            weather: Some(WeatherReading {
                temperature: 18.5,
                updated_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            }),
        };

        let view = CityView::from(&city);
        assert_eq!(view.id, 3);
        assert_eq!(view.latitude, "45.7600");
        assert_eq!(view.temperature.as_deref(), Some("18.5 °C"));
        assert_eq!(view.updated_at.as_deref(), Some("2026-03-01 12:00:00 UTC"));
    }

    #[test]
    fn test_index_renders_cities() {
        let page = IndexTemplate {
            cities: vec![CityView {
                id: 1,
                name: "Lyon".into(),
                latitude: "45.7600".into(),
                longitude: "4.8400".into(),
                temperature: None,
                updated_at: None,
            }],
        }
        .render()
        .unwrap();

        assert!(page.contains("Lyon"));
        assert!(page.contains("/cities/remove/1"));
        assert!(page.contains("<td>-</td>"));
    }
}
