use maud::{DOCTYPE, Markup, html};

use crate::{
    models::{Movie, MovieForm, Review},
    watchlist::{self, SortOrder, ViewMode},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
const PLACEHOLDER_GRADIENT: &str = "background: linear-gradient(135deg, #667eea 0%, #764ba2 100%)";
const CONFIRM_DELETE: &str = "return confirm('Are you sure you want to delete this movie?')";

/// State of the list page toolbar, carried through every link on the page.
#[derive(Clone, Debug, Default)]
pub struct ListView {
    pub search: String,
    pub sort: SortOrder,
    pub view: ViewMode,
}

impl ListView {
    pub fn href(&self, view: ViewMode, extra: Option<(&str, &str)>) -> String {
        let mut href = format!(
            "/?q={}&sort={}&view={}",
            urlencoding::encode(&self.search),
            self.sort.as_code(),
            view.as_code()
        );
        if let Some((key, value)) = extra {
            href.push_str(&format!("&{key}={}", urlencoding::encode(value)));
        }
        href
    }
}

/// Which operation a submitted movie form performs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormTarget {
    Create,
    Update(i32),
}

impl FormTarget {
    fn action(self) -> String {
        match self {
            FormTarget::Create => "/movies".to_string(),
            FormTarget::Update(id) => format!("/movies/{id}"),
        }
    }
}

pub struct OpenForm<'a> {
    pub form: &'a MovieForm,
    pub target: FormTarget,
    pub cancel_href: String,
    pub alert: Option<&'a str>,
}

pub fn list_page(view: &ListView, movies: &[&Movie], form: Option<OpenForm<'_>>) -> String {
    page(
        "My Movie Watchlist",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-6xl mx-auto px-6 py-10" {
                    header {
                        h1 class="text-3xl font-bold text-gray-900" { "My Movie Watchlist" }
                    }

                    (toolbar(view))

                    @if let Some(open) = form {
                        (movie_form(&open))
                    }

                    @if movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No movies found. Add your first movie to get started!" }
                        }
                    } @else {
                        div class=(grid_class(view.view)) {
                            @for movie in movies { (movie_card(view, movie)) }
                        }
                    }
                }
            }
        },
    )
}

pub fn form_page(open: &OpenForm<'_>) -> String {
    page(
        "Save Movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-10" { (movie_form(open)) }
            }
        },
    )
}

pub fn detail_page(movie: &Movie, form: Option<OpenForm<'_>>, alert: Option<&str>) -> String {
    let reviews: &[Review] = &movie.reviews;
    let actors = watchlist::actor_names(&movie.actors);

    page(
        &movie.title,
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-10" {
                    a class="text-sm text-blue-600 hover:text-blue-800" href="/" { "← Back to Watchlist" }

                    @if let Some(alert) = alert {
                        (alert_banner(alert))
                    }

                    @if let Some(open) = form {
                        (movie_form(&open))
                    } @else {
                        div class="mt-6 bg-white shadow rounded-lg p-8 flex gap-8" {
                            div class="w-48 h-72 shrink-0" { (poster(movie, "text-6xl")) }
                            div {
                                h1 class="text-3xl font-bold text-gray-900" { (movie.title) }
                                p class="mt-2 text-lg text-gray-700" { (rating_label(movie.rating)) }
                                p class="mt-4 text-gray-700" { (movie.description) }
                                div class="mt-6 flex gap-3" {
                                    a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href=(format!("/movie/{}?edit=1", movie.id)) { "Edit Movie" }
                                    form method="post" action=(format!("/movies/{}/delete", movie.id)) onsubmit=(CONFIRM_DELETE) {
                                        button class="rounded-md bg-red-600 px-4 py-2 font-semibold text-white hover:bg-red-700" type="submit" { "Delete Movie" }
                                    }
                                }
                            }
                        }

                        section class="mt-6 bg-white shadow rounded-lg p-8" {
                            h2 class="text-xl font-semibold text-gray-900" { "Plot Summary" }
                            p class="mt-2 text-gray-700" {
                                @if movie.plot.is_empty() { "No plot summary available." } @else { (movie.plot) }
                            }
                        }

                        section class="mt-6 bg-white shadow rounded-lg p-8" {
                            h2 class="text-xl font-semibold text-gray-900" { "Cast" }
                            @if actors.is_empty() {
                                p class="mt-2 text-gray-700" { "No cast information available." }
                            } @else {
                                div class="mt-2 flex flex-wrap gap-2" {
                                    @for actor in &actors {
                                        span class="rounded-full bg-gray-100 px-3 py-1 text-sm text-gray-700" { (actor) }
                                    }
                                }
                            }
                        }

                        section class="mt-6 bg-white shadow rounded-lg p-8" {
                            h2 class="text-xl font-semibold text-gray-900" { "Reviews" }
                            form class="mt-4 space-y-2" method="post" action=(format!("/movie/{}/reviews", movie.id)) {
                                textarea class="w-full rounded-md border border-gray-300 px-3 py-2" name="text" rows="3" placeholder="Write your review..." {}
                                button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Add Review" }
                            }
                            @if reviews.is_empty() {
                                p class="mt-4 text-gray-500" { "No reviews yet. Be the first to review!" }
                            } @else {
                                ul class="mt-4 space-y-3" {
                                    @for (idx, review) in reviews.iter().enumerate() {
                                        li class="border-l-4 border-blue-500 pl-4" {
                                            p class="text-gray-800" { (review.text) }
                                            div class="mt-1 flex items-center gap-4 text-sm text-gray-500" {
                                                span { (review_date(review)) }
                                                form method="post" action=(format!("/movie/{}/reviews/{}/delete", movie.id, idx)) {
                                                    button class="text-red-600 hover:text-red-800" type="submit" { "Delete" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn not_found_page() -> String {
    error_page("Movie not found")
}

pub fn error_page(message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back to Watchlist" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn toolbar(view: &ListView) -> Markup {
    let toggle = |mode: ViewMode, icon: &str, title: &str| {
        let class = if mode == view.view {
            "rounded-md bg-blue-600 px-3 py-2 text-white"
        } else {
            "rounded-md bg-white px-3 py-2 text-gray-700 border border-gray-300"
        };
        html! { a class=(class) href=(view.href(mode, None)) title=(title) { (icon) } }
    };

    html! {
        div class="mt-6 flex flex-wrap items-center justify-between gap-4" {
            form class="flex flex-wrap items-center gap-3" method="get" action="/" {
                input class="w-72 rounded-md border border-gray-300 px-3 py-2" type="text" name="q" value=(view.search) placeholder="Search movies...";
                select class="rounded-md border border-gray-300 px-3 py-2" name="sort" onchange="this.form.submit()" {
                    @for order in SortOrder::ALL {
                        option value=(order.as_code()) selected[order == view.sort] { (order.label()) }
                    }
                }
                input type="hidden" name="view" value=(view.view.as_code());
                button class="rounded-md border border-gray-300 bg-white px-3 py-2 text-gray-700" type="submit" { "Search" }
            }
            div class="flex items-center gap-2" {
                (toggle(ViewMode::Poster, "🎬", "Poster Mode"))
                (toggle(ViewMode::List, "📋", "List Mode"))
                a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href=(view.href(view.view, Some(("form", "new")))) { "+ Add Movie" }
            }
        }
    }
}

fn movie_card(view: &ListView, movie: &Movie) -> Markup {
    let detail = format!("/movie/{}", movie.id);
    let edit = view.href(view.view, Some(("edit", &movie.id.to_string())));

    html! {
        div class="bg-white shadow rounded-lg overflow-hidden" {
            @match view.view {
                ViewMode::Poster => {
                    a class="block h-72" href=(detail) { (poster(movie, "text-5xl")) }
                    div class="p-4" {
                        h3 class="font-semibold text-gray-900" { (movie.title) }
                        p class="text-sm text-gray-600" { (rating_label(movie.rating)) }
                    }
                },
                ViewMode::List => {
                    div class="flex gap-4 p-4" {
                        a class="block w-24 h-36 shrink-0" href=(detail) { (poster(movie, "text-3xl")) }
                        div {
                            h3 class="text-lg font-semibold text-gray-900" { a href=(detail) { (movie.title) } }
                            p class="mt-1 text-sm text-gray-600" { (movie.description) }
                            div class="mt-2 flex gap-4 text-sm text-gray-500" {
                                span { (rating_label(movie.rating)) }
                                span { "👥 " (movie.actors) }
                            }
                        }
                    }
                },
            }
            div class="flex gap-2 px-4 pb-4" {
                a class="text-sm text-blue-600 hover:text-blue-800" href=(edit) { "Edit" }
                form method="post" action=(format!("/movies/{}/delete", movie.id)) onsubmit=(CONFIRM_DELETE) {
                    button class="text-sm text-red-600 hover:text-red-800" type="submit" { "Delete" }
                }
            }
        }
    }
}

fn poster(movie: &Movie, initial_size: &str) -> Markup {
    html! {
        @if movie.poster_url.is_empty() {
            div class="h-full w-full rounded flex items-center justify-center" style=(PLACEHOLDER_GRADIENT) {
                span class=(format!("{initial_size} font-bold text-white")) { (watchlist::poster_initial(&movie.title)) }
            }
        } @else {
            img class="h-full w-full rounded object-cover" src=(movie.poster_url) alt=(movie.title);
        }
    }
}

fn movie_form(open: &OpenForm<'_>) -> Markup {
    let form = open.form;
    let field = "mt-1 w-full rounded-md border border-gray-300 px-3 py-2";
    let (heading, submit) = match open.target {
        FormTarget::Create => ("Add New Movie", "Add"),
        FormTarget::Update(_) => ("Edit Movie", "Update"),
    };

    html! {
        div class="mt-6 bg-white shadow rounded-lg p-8" {
            div class="flex items-center justify-between" {
                h2 class="text-xl font-semibold text-gray-900" { (heading) }
                a class="text-2xl text-gray-500 hover:text-gray-700" href=(open.cancel_href) { "×" }
            }
            @if let Some(alert) = open.alert {
                (alert_banner(alert))
            }
            form class="mt-6 space-y-4" method="post" action=(open.target.action()) {
                input type="hidden" name="redirect" value=(form.redirect);
                label class="block text-sm font-medium text-gray-700" {
                    "Title *"
                    input class=(field) type="text" name="title" value=(form.title) required;
                }
                label class="block text-sm font-medium text-gray-700" {
                    "Description"
                    textarea class=(field) name="description" rows="3" { (form.description) }
                }
                label class="block text-sm font-medium text-gray-700" {
                    "Plot Summary"
                    textarea class=(field) name="plot" rows="4" { (form.plot) }
                }
                label class="block text-sm font-medium text-gray-700" {
                    "Actors (comma-separated)"
                    input class=(field) type="text" name="actors" value=(form.actors) placeholder="e.g., Actor 1, Actor 2, Actor 3";
                }
                label class="block text-sm font-medium text-gray-700" {
                    "Rating (0-10)"
                    input class=(field) type="number" name="rating" value=(form.rating) min="0" max="10" step="0.1";
                }
                label class="block text-sm font-medium text-gray-700" {
                    "Poster URL"
                    input class=(field) type="url" name="poster_url" value=(form.poster_url) placeholder="https://example.com/poster.jpg";
                }
                div class="flex justify-end gap-3" {
                    a class="rounded-md border border-gray-300 px-4 py-2 text-gray-700" href=(open.cancel_href) { "Cancel" }
                    button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { (submit) }
                }
            }
        }
    }
}

fn alert_banner(message: &str) -> Markup {
    html! {
        div class="mt-4 rounded-md border border-red-300 bg-red-50 px-4 py-3 text-red-800" role="alert" { (message) }
    }
}

fn grid_class(view: ViewMode) -> &'static str {
    match view {
        ViewMode::Poster => "mt-8 grid gap-6 grid-cols-2 md:grid-cols-4",
        ViewMode::List => "mt-8 space-y-4",
    }
}

fn rating_label(rating: f64) -> String {
    format!("⭐ {rating}/10")
}

fn review_date(review: &Review) -> String {
    match review.timestamp() {
        Some(ts) => ts.strftime("%Y-%m-%d").to_string(),
        None => review.date.clone(),
    }
}
