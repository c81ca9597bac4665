use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    AppState, csrf,
    error::{AppError, AppResult},
    forms::{AddMovieForm, EditMovieForm, FieldErrors},
    models::IdQuery,
    ranking, templates,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/add", get(add_form).post(add_search))
        .route("/select", get(select))
        .route("/edit", get(edit_form).post(edit_submit))
        .route("/delete", get(delete))
        .with_state(state)
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let movies = match ranking::refresh(&state.store).await {
        Ok(movies) => movies,
        Err(err) => {
            warn!(error = %err, "collection unavailable, showing empty list");
            Vec::new()
        },
    };
    Html(templates::index_page(&movies))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddQuery {
    title: String,
}

pub async fn add_form(jar: CookieJar, Query(q): Query<AddQuery>) -> (CookieJar, Html<String>) {
    let (jar, token) = csrf::ensure_token(jar);
    (jar, Html(templates::add_page(q.title.trim(), &FieldErrors::default(), &token)))
}

pub async fn add_search(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<AddMovieForm>,
) -> AppResult<(CookieJar, Html<String>)> {
    let expected = csrf::token(&jar);
    match form.validate(expected.as_deref()) {
        Ok(valid) => {
            let candidates = state.tmdb.search_movie(&valid.title).await?;
            debug!(title = %valid.title, candidates = candidates.len(), "rendering search results");
            Ok((jar, Html(templates::select_page(&valid.title, &candidates))))
        },
        Err(errors) => {
            debug!(?errors, "add form rejected");
            let (jar, token) = csrf::ensure_token(jar);
            Ok((jar, Html(templates::add_page(&form.title, &errors, &token))))
        },
    }
}

pub async fn select(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IdQuery>,
) -> AppResult<Redirect> {
    let detail = state.tmdb.get_movie(q.id).await?;
    let movie = detail.into_new_movie(state.tmdb.image_url())?;

    if state.store.find_by_title(&movie.title).await?.is_some() {
        return Err(AppError::DuplicateTitle(movie.title));
    }

    let title = movie.title.clone();
    let id = state.store.create(movie).await?;
    info!(id = id, tmdb_id = q.id, title = %title, "imported movie");

    Ok(Redirect::to(&format!("/edit?id={id}")))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(q): Query<IdQuery>,
) -> AppResult<(CookieJar, Html<String>)> {
    let movie = state.store.get(q.id).await?;
    let rating = movie.rating.map(|r| r.to_string()).unwrap_or_default();
    let review = movie.review.clone().unwrap_or_default();

    let (jar, token) = csrf::ensure_token(jar);
    let body = templates::edit_page(&movie, &rating, &review, &FieldErrors::default(), &token);
    Ok((jar, Html(body)))
}

pub async fn edit_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(q): Query<IdQuery>,
    Form(form): Form<EditMovieForm>,
) -> AppResult<Response> {
    let movie = state.store.get(q.id).await?;

    let expected = csrf::token(&jar);
    match form.validate(expected.as_deref()) {
        Ok(valid) => {
            state.store.update_review(movie.id, valid.rating, valid.review).await?;
            info!(id = movie.id, rating = valid.rating, "updated review");
            Ok(Redirect::to("/").into_response())
        },
        Err(errors) => {
            debug!(id = movie.id, ?errors, "edit form rejected");
            let (jar, token) = csrf::ensure_token(jar);
            let body = templates::edit_page(&movie, &form.rating, &form.review, &errors, &token);
            Ok((jar, Html(body)).into_response())
        },
    }
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IdQuery>,
) -> AppResult<Redirect> {
    state.store.delete(q.id).await?;
    info!(id = q.id, "deleted movie");
    Ok(Redirect::to("/"))
}
