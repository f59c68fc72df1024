use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    AppState,
    error::AppResult,
    input::{self, MovieInput},
    models::{Movie, MovieForm},
    templates::{self, FormTarget, ListView, OpenForm},
    watchlist::{self, SortOrder, ViewMode},
};

const VIEW_COOKIE: &str = "view_mode";

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    q: String,
    sort: Option<String>,
    view: Option<String>,
    form: Option<String>,
    edit: Option<String>,
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(q): Query<ListQuery>,
) -> AppResult<(CookieJar, Html<String>)> {
    let requested = q.view.as_deref().and_then(ViewMode::from_code);
    let view = requested
        .or_else(|| jar.get(VIEW_COOKIE).and_then(|c| ViewMode::from_code(c.value())))
        .unwrap_or_default();

    let jar = match requested {
        Some(mode) => jar.add(
            Cookie::build((VIEW_COOKIE, mode.as_code()))
                .path("/")
                .max_age(time::Duration::days(365)),
        ),
        None => jar,
    };

    let movies = state.api.list().await.map_err(|err| {
        warn!(api_url = %state.config.api_url, error = %err, "failed to load movies");
        anyhow!("Failed to load movies. Please check if the backend is running.")
    })?;

    let list = ListView {
        search: q.q.clone(),
        sort: q.sort.as_deref().map(SortOrder::from_code).unwrap_or_default(),
        view,
    };
    let visible = watchlist::filter_and_sort(&movies, &list.search, list.sort);
    let cancel_href = list.href(list.view, None);

    let editing = q
        .edit
        .as_deref()
        .map(|raw| i32::try_from(input::coerce_int(raw)).unwrap_or(0))
        .and_then(|id| movies.iter().find(|m| m.id == id));

    let form = match (editing, q.form.as_deref()) {
        (Some(movie), _) => {
            Some((MovieForm::from_movie(movie, &cancel_href), FormTarget::Update(movie.id)))
        },
        (None, Some("new")) => {
            let form = MovieForm { redirect: cancel_href.clone(), ..MovieForm::default() };
            Some((form, FormTarget::Create))
        },
        _ => None,
    };
    let open = form.as_ref().map(|(form, target)| OpenForm {
        form,
        target: *target,
        cancel_href: cancel_href.clone(),
        alert: None,
    });

    Ok((jar, Html(templates::list_page(&list, &visible, open))))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Form(form): Form<MovieForm>,
) -> Response {
    match state.api.create(&form.to_input(Vec::new())).await {
        Ok(id) => {
            info!(id = id, "movie added from watchlist");
            Redirect::to(form.redirect_path()).into_response()
        },
        Err(err) => {
            warn!(error = %err, "failed to add movie");
            form_failure(&form, FormTarget::Create)
        },
    }
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<MovieForm>,
) -> Response {
    let result = async {
        // The form has no review fields; carry the stored ones over.
        let reviews = state.api.get(id).await?.map(|m| m.reviews).unwrap_or_default();
        state.api.update(id, &form.to_input(reviews)).await
    }
    .await;

    match result {
        Ok(()) => {
            info!(id = id, "movie updated from watchlist");
            Redirect::to(form.redirect_path()).into_response()
        },
        Err(err) => {
            warn!(id = id, error = %err, "failed to update movie");
            form_failure(&form, FormTarget::Update(id))
        },
    }
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    state.api.delete(id).await.map_err(|err| {
        warn!(id = id, error = %err, "failed to delete movie");
        anyhow!("Failed to delete movie")
    })?;
    info!(id = id, "movie deleted from watchlist");
    Ok(Redirect::to("/"))
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    edit: Option<String>,
}

pub async fn movie_detail(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    Query(q): Query<DetailQuery>,
) -> AppResult<Response> {
    let id = i32::try_from(input::coerce_int(&raw_id)).unwrap_or(0);
    let Some(movie) = load_movie(&state, id).await? else {
        return Ok(not_found());
    };

    let page = if q.edit.is_some() {
        let form = MovieForm::from_movie(&movie, &format!("/movie/{}", movie.id));
        let open = OpenForm {
            form: &form,
            target: FormTarget::Update(movie.id),
            cancel_href: format!("/movie/{}", movie.id),
            alert: None,
        };
        templates::detail_page(&movie, Some(open), None)
    } else {
        templates::detail_page(&movie, None, None)
    };
    Ok(Html(page).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    text: String,
}

pub async fn add_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<ReviewForm>,
) -> AppResult<Response> {
    let Some(movie) = load_movie(&state, id).await? else {
        return Ok(not_found());
    };
    let Some(updated) = watchlist::append_review(&movie, &form.text, jiff::Timestamp::now()) else {
        return Ok(Redirect::to(&format!("/movie/{id}")).into_response());
    };

    Ok(save_reviews(&state, &movie, &updated, "Failed to add review").await)
}

pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(i32, usize)>,
) -> AppResult<Response> {
    let Some(movie) = load_movie(&state, id).await? else {
        return Ok(not_found());
    };
    let updated = watchlist::remove_review(&movie, index);

    Ok(save_reviews(&state, &movie, &updated, "Failed to delete review").await)
}

/// Persists a review change by overwriting the whole record. Two editors
/// working on the same movie can overwrite each other's reviews.
async fn save_reviews(
    state: &AppState,
    before: &Movie,
    updated: &Movie,
    failure: &str,
) -> Response {
    match state.api.update(updated.id, &MovieInput::from(updated)).await {
        Ok(()) => {
            info!(id = updated.id, reviews = updated.reviews.len(), "reviews saved");
            Redirect::to(&format!("/movie/{}", updated.id)).into_response()
        },
        Err(err) => {
            warn!(id = updated.id, error = %err, "failed to save reviews");
            let page = templates::detail_page(before, None, Some(failure));
            (StatusCode::BAD_GATEWAY, Html(page)).into_response()
        },
    }
}

async fn load_movie(state: &AppState, id: i32) -> AppResult<Option<Movie>> {
    state.api.get(id).await.map_err(|err| {
        warn!(id = id, error = %err, "failed to load movie");
        anyhow!("Movie not found").into()
    })
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(templates::not_found_page())).into_response()
}

/// Re-renders the submitted form with an alert so nothing typed is lost.
fn form_failure(form: &MovieForm, target: FormTarget) -> Response {
    let page = templates::form_page(&OpenForm {
        form,
        target,
        cancel_href: form.redirect_path().to_string(),
        alert: Some("Failed to save movie"),
    });
    (StatusCode::BAD_GATEWAY, Html(page)).into_response()
}

#[cfg(test)]
mod tests {
    use reqwest::redirect::Policy;

    use super::*;
    use crate::{models::Review, test_support};

    fn browser() -> reqwest::Client {
        reqwest::Client::builder().redirect(Policy::limited(5)).build().unwrap()
    }

    #[tokio::test]
    async fn add_search_and_sort_from_the_list_page() {
        let (_dir, base, state) = test_support::spawn_app().await;
        let http = browser();

        for (title, rating) in [("Arrival", "9"), ("Zodiac", "7.7"), ("Blade Runner", "10")] {
            let resp = http
                .post(format!("{base}/movies"))
                .form(&[("title", title), ("rating", rating), ("redirect", "/")])
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }
        assert_eq!(state.store.list().await.unwrap().len(), 3);

        let resp = http.get(format!("{base}/?sort=rating-high")).send().await.unwrap();
        let page = resp.text().await.unwrap();
        let blade = page.find("Blade Runner").unwrap();
        let arrival = page.find("Arrival").unwrap();
        let zodiac = page.find("Zodiac").unwrap();
        assert!(blade < arrival && arrival < zodiac);

        let page = http.get(format!("{base}/?q=zod")).send().await.unwrap().text().await.unwrap();
        assert!(page.contains("Zodiac"));
        assert!(!page.contains("Arrival"));
    }

    #[tokio::test]
    async fn view_mode_is_remembered() {
        let (_dir, base, _state) = test_support::spawn_app().await;

        let resp = browser().get(format!("{base}/?view=list")).send().await.unwrap();
        let cookie = resp.headers().get("set-cookie").unwrap().to_str().unwrap().to_string();
        assert!(cookie.starts_with("view_mode=list"));
    }

    #[tokio::test]
    async fn edit_form_keeps_existing_reviews() {
        let (_dir, base, state) = test_support::spawn_app().await;
        let review = Review { text: "Great".into(), date: "2024-01-01T00:00:00.000Z".into() };
        let id = state
            .store
            .create(&MovieInput {
                title: "Dune".into(),
                reviews: vec![review.clone()],
                ..MovieInput::default()
            })
            .await
            .unwrap();

        let redirect = format!("/movie/{id}");
        let resp = browser()
            .post(format!("{base}/movies/{id}"))
            .form(&[
                ("title", "Dune: Part One"),
                ("rating", "8.5"),
                ("redirect", redirect.as_str()),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.text().await.unwrap().contains("Dune: Part One"));

        let movie = state.store.get(id).await.unwrap().unwrap();
        assert_eq!(movie.rating, 8.5);
        assert_eq!(movie.reviews, vec![review]);
    }

    #[tokio::test]
    async fn reviews_are_appended_and_removed() {
        let (_dir, base, state) = test_support::spawn_app().await;
        let id = state
            .store
            .create(&MovieInput { title: "Heat".into(), ..MovieInput::default() })
            .await
            .unwrap();
        let http = browser();

        for text in ["First", "Second", "   "] {
            let resp = http
                .post(format!("{base}/movie/{id}/reviews"))
                .form(&[("text", text)])
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }
        let texts = |m: &Movie| m.reviews.iter().map(|r| r.text.clone()).collect::<Vec<_>>();
        let movie = state.store.get(id).await.unwrap().unwrap();
        assert_eq!(texts(&movie), vec!["First", "Second"]);
        assert!(movie.reviews[0].timestamp().is_some());

        let page = http
            .post(format!("{base}/movie/{id}/reviews/0/delete"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(page.contains("Second"));
        let movie = state.store.get(id).await.unwrap().unwrap();
        assert_eq!(texts(&movie), vec!["Second"]);
    }

    #[tokio::test]
    async fn missing_movie_page_is_not_found() {
        let (_dir, base, _state) = test_support::spawn_app().await;

        for path in ["/movie/99", "/movie/abc"] {
            let resp = browser().get(format!("{base}{path}")).send().await.unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            assert!(resp.text().await.unwrap().contains("Back to Watchlist"));
        }
    }

    #[tokio::test]
    async fn deleting_from_the_page_removes_the_movie() {
        let (_dir, base, state) = test_support::spawn_app().await;
        let id = state
            .store
            .create(&MovieInput { title: "Alien".into(), ..MovieInput::default() })
            .await
            .unwrap();

        let resp = browser().post(format!("{base}/movies/{id}/delete")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(state.store.get(id).await.unwrap().is_none());
    }
}
