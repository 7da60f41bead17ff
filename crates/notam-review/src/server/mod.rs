//! HTTP form server for notam-review.
//!
//! A thin axum app: login, one review form per record, and the navigation
//! actions (previous/save/next/exit). Each request re-reads and rewrites the
//! user's feedback file; there is no shared mutable state.

pub mod pages;

use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::Error;
use crate::record::{Feedback, ImpactLevel, UserRow};
use crate::store::UserStore;

/// Error wrapper mapping store and form failures onto HTTP responses.
#[derive(Debug)]
pub struct AppError(Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = format!(
            "<h1>Something went wrong</h1><p>{}</p>",
            html_escape::encode_text(&self.0.to_string())
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<Config>,
}

/// Build the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(login_page))
        .route("/session", post(start_session))
        .route("/review/{user}", get(review_page).post(review_submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the form server until shutdown.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(config: Config) -> Result<(), Error> {
    let addr = config.bind_addr();
    let state = AppState {
        config: Arc::new(config),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Review form listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn login_page(State(state): State<AppState>) -> Html<String> {
    let password_required = state.config.server.access_password.is_some();
    Html(pages::login_page(password_required, None))
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    #[serde(default)]
    password: Option<String>,
}

async fn start_session(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let password_required = state.config.server.access_password.is_some();

    if let Some(expected) = &state.config.server.access_password {
        if form.password.as_deref() != Some(expected.as_str()) {
            return Ok(Html(pages::login_page(password_required, Some("Wrong password")))
                .into_response());
        }
    }

    let username = match crate::store::normalize_username(&form.username) {
        Ok(name) => name,
        Err(err) => {
            return Ok(
                Html(pages::login_page(password_required, Some(&err.to_string())))
                    .into_response(),
            );
        }
    };

    info!("Session started for '{}'", username);
    Ok(Redirect::to(&format!("/review/{username}")).into_response())
}

#[derive(Debug, Deserialize)]
struct ReviewQuery {
    /// Position override; defaults to the stored cursor.
    i: Option<usize>,
    /// Set after a save redirect to show the confirmation banner.
    #[serde(default)]
    saved: Option<u8>,
}

async fn review_page(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(query): Query<ReviewQuery>,
) -> Result<Html<String>, AppError> {
    let store = UserStore::open(&state.config, &user)?;
    let index = query.i.or_else(|| store.cursor()).unwrap_or(0);
    let progress = store.progress();

    match store.get(index) {
        Ok(row) => Ok(Html(pages::review_page(
            store.username(),
            index,
            progress,
            row,
            query.saved == Some(1),
        ))),
        Err(err) if err.is_row_out_of_range() => {
            Ok(Html(pages::completion_page(store.username(), progress)))
        }
        Err(err) => Err(err.into()),
    }
}

/// The review form submission. Every action carries the full field set; only
/// `save` reads the feedback fields.
#[derive(Debug, Deserialize)]
struct ReviewForm {
    action: String,
    index: usize,
    #[serde(default)]
    fb_style: Option<u8>,
    #[serde(default)]
    correct_category: Option<String>,
    #[serde(default)]
    fb_corrected_category: Option<String>,
    #[serde(default)]
    fb_realism: Option<u8>,
    #[serde(default)]
    fb_impact_med: Option<String>,
    #[serde(default)]
    fb_impact_tech: Option<String>,
    #[serde(default)]
    fb_impact_land: Option<String>,
    #[serde(default)]
    fb_notes: Option<String>,
}

/// Build a [`Feedback`] from the submitted form, falling back to the record's
/// own impact levels for missing dropdown values.
fn feedback_from_form(form: &ReviewForm, row: &UserRow) -> Result<Feedback, Error> {
    let impact = |submitted: &Option<String>, class_value: &str| -> Result<ImpactLevel, Error> {
        match submitted.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value.parse(),
            _ => Ok(class_value.parse().unwrap_or(ImpactLevel::Low)),
        }
    };

    let category_correct = form.correct_category.as_deref() != Some("no");
    let corrected_category = form
        .fb_corrected_category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string);

    Ok(Feedback {
        style_agrees: form.fb_style != Some(1),
        category_correct,
        corrected_category,
        realism_high: form.fb_realism != Some(1),
        impact_med: impact(&form.fb_impact_med, &row.class_impact_med)?,
        impact_tech: impact(&form.fb_impact_tech, &row.class_impact_tech)?,
        impact_land: impact(&form.fb_impact_land, &row.class_impact_land)?,
        notes: form.fb_notes.clone().unwrap_or_default().trim().to_string(),
    })
}

async fn review_submit(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Result<Response, AppError> {
    let mut store = UserStore::open(&state.config, &user)?;
    let user = store.username().to_string();
    let index = form.index;

    match form.action.as_str() {
        "prev" => {
            let target = index.saturating_sub(1);
            Ok(Redirect::to(&format!("/review/{user}?i={target}")).into_response())
        }
        "next" => {
            let target = index + 1;
            Ok(Redirect::to(&format!("/review/{user}?i={target}")).into_response())
        }
        "save" => {
            let feedback = feedback_from_form(&form, store.get(index)?)?;
            store.record_feedback(index, &feedback)?;
            Ok(Redirect::to(&format!("/review/{user}?i={index}&saved=1")).into_response())
        }
        "exit" => {
            store.set_cursor(index)?;
            Ok(Html(pages::goodbye_page(&user, index)).into_response())
        }
        other => Err(Error::internal(format!("unknown form action '{other}'")).into()),
    }
}
