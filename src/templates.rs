use maud::{DOCTYPE, Markup, html};

use crate::{csrf, entities::movie, forms::FieldErrors, tmdb::SearchCandidate};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const INVALID_INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-red-500 px-3 py-2 focus:border-red-500 focus:outline-none focus:ring-1 focus:ring-red-500";
const BUTTON_CLASS: &str =
    "w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";

pub fn index_page(movies: &[movie::Model]) -> String {
    page(
        "My Top Movies",
        html! {
            div class="max-w-4xl mx-auto px-6 py-12" {
                div class="flex items-start justify-between gap-6" {
                    div {
                        h1 class="text-3xl font-bold text-gray-900" { "My Top Movies" }
                        p class="mt-2 text-gray-600" { "Ranked by your own ratings." }
                    }
                    a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/add" { "Add Movie" }
                }

                @if movies.is_empty() {
                    div class="mt-10 bg-white shadow rounded-lg p-8" {
                        p class="text-gray-600" { "Your collection is empty." }
                    }
                } @else {
                    div class="mt-10 space-y-4" {
                        @for movie in movies {
                            (movie_card(movie))
                        }
                    }
                }
            }
        },
    )
}

pub fn add_page(title: &str, errors: &FieldErrors, csrf_token: &str) -> String {
    page(
        "Add Movie",
        html! {
            (form_shell("Add Movie", html! {
                form class="mt-8 space-y-6" method="post" action="/add" {
                    (csrf_input(csrf_token, errors))
                    div {
                        label class="block text-sm font-medium text-gray-700" for="title" { "Movie Title" }
                        input class=(input_class(errors, "title")) name="title" id="title" value=(title) required;
                        (field_errors(errors, "title"))
                    }
                    button class=(BUTTON_CLASS) type="submit" { "Add Movie" }
                }
            }))
        },
    )
}

pub fn select_page(query: &str, candidates: &[SearchCandidate]) -> String {
    page(
        "Select Movie",
        html! {
            div class="max-w-2xl mx-auto px-6 py-12" {
                div class="bg-white shadow rounded-lg p-8" {
                    h1 class="text-2xl font-bold text-gray-900" { "Select Movie" }
                    p class="mt-2 text-gray-600" { "Results for \"" (query) "\"" }

                    @if candidates.is_empty() {
                        p class="mt-6 text-gray-600" { "No movies matched." }
                    } @else {
                        ul class="mt-6 divide-y divide-gray-200" {
                            @for candidate in candidates {
                                li class="py-3" {
                                    a class="text-blue-600 hover:text-blue-800" href=(format!("/select?id={}", candidate.id)) {
                                        (candidate.title)
                                        @if let Some(year) = candidate.year() {
                                            span class="ml-2 text-gray-500" { "(" (year) ")" }
                                        }
                                    }
                                    @if !candidate.original_title.is_empty() && candidate.original_title != candidate.title {
                                        p class="text-xs text-gray-500" { (candidate.original_title) }
                                    }
                                    @if !candidate.overview.is_empty() {
                                        p class="mt-1 text-sm text-gray-600 line-clamp-2" { (candidate.overview) }
                                    }
                                }
                            }
                        }
                    }

                    a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href=(format!("/add?title={}", urlencoding::encode(query))) { "Search again" }
                }
            }
        },
    )
}

pub fn edit_page(
    movie: &movie::Model,
    rating: &str,
    review: &str,
    errors: &FieldErrors,
    csrf_token: &str,
) -> String {
    page(
        "Edit Movie",
        html! {
            (form_shell(&movie.title, html! {
                p class="mt-2 text-gray-600" { "Update your rating and review." }
                form class="mt-8 space-y-6" method="post" action=(format!("/edit?id={}", movie.id)) {
                    (csrf_input(csrf_token, errors))
                    div {
                        label class="block text-sm font-medium text-gray-700" for="rating" { "Your Rating Out of 10 e.g. 7.5" }
                        input class=(input_class(errors, "rating")) name="rating" id="rating" value=(rating) required;
                        (field_errors(errors, "rating"))
                    }
                    div {
                        label class="block text-sm font-medium text-gray-700" for="review" { "Your Review" }
                        input class=(input_class(errors, "review")) name="review" id="review" value=(review) maxlength="255" required;
                        (field_errors(errors, "review"))
                    }
                    button class=(BUTTON_CLASS) type="submit" { "Done" }
                }
            }))
        },
    )
}

pub fn error_page(message: String) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
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
            body class="min-h-screen bg-gray-50" { (body) }
        }
    }
    .into_string()
}

fn form_shell(heading: &str, inner: Markup) -> Markup {
    html! {
        div class="max-w-2xl mx-auto px-6 py-12" {
            div class="bg-white shadow rounded-lg p-8" {
                h1 class="text-3xl font-bold text-gray-900" { (heading) }
                (inner)
            }
            a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href="/" { "Back to collection" }
        }
    }
}

fn csrf_input(token: &str, errors: &FieldErrors) -> Markup {
    html! {
        input type="hidden" name=(csrf::FIELD) value=(token);
        (field_errors(errors, csrf::FIELD))
    }
}

fn input_class(errors: &FieldErrors, field: &str) -> &'static str {
    if errors.has(field) { INVALID_INPUT_CLASS } else { INPUT_CLASS }
}

fn field_errors(errors: &FieldErrors, field: &str) -> Markup {
    html! {
        @for message in errors.for_field(field) {
            p class="mt-2 text-sm text-red-600" { (message) }
        }
    }
}

fn movie_card(movie: &movie::Model) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-6" {
            @if !movie.img_url.is_empty() {
                img class="w-24 rounded" src=(movie.img_url) alt=(format!("{} poster", movie.title));
            }
            div class="flex-1" {
                div class="flex items-start justify-between gap-4" {
                    h2 class="text-xl font-semibold text-gray-900" {
                        @if let Some(rank) = movie.ranking {
                            span class="mr-2 text-gray-400" { "#" (rank) }
                        }
                        (movie.title)
                        span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                    }
                    @if let Some(rating) = movie.rating {
                        span class="text-lg font-semibold text-yellow-600" { (format!("{rating:.1}")) }
                    }
                }
                @if let Some(review) = &movie.review {
                    p class="mt-2 italic text-gray-700" { "\"" (review) "\"" }
                }
                p class="mt-2 text-sm text-gray-600" { (movie.description) }
                div class="mt-4 flex gap-4 text-sm" {
                    a class="text-blue-600 hover:text-blue-800" href=(format!("/edit?id={}", movie.id)) { "Update" }
                    a class="text-red-600 hover:text-red-800" href=(format!("/delete?id={}", movie.id)) { "Delete" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inception() -> movie::Model {
        movie::Model {
            id: 7,
            title: "Inception".to_string(),
            year: 2010,
            description: "Dreams <within> dreams".to_string(),
            rating: Some(8.5),
            ranking: Some(1),
            review: Some("Great".to_string()),
            img_url: "https://image.tmdb.org/t/p/w185/inception.jpg".to_string(),
        }
    }

    #[test]
    fn index_lists_movies_with_actions() {
        let html = index_page(&[inception()]);
        assert!(html.contains("Inception"));
        assert!(html.contains("#1"));
        assert!(html.contains("8.5"));
        assert!(html.contains("/edit?id=7"));
        assert!(html.contains("/delete?id=7"));
        assert!(html.contains("Dreams &lt;within&gt; dreams"));
    }

    #[test]
    fn empty_index() {
        assert!(index_page(&[]).contains("Your collection is empty."));
    }

    #[test]
    fn forms_render_errors_and_token() {
        let mut errors = FieldErrors::default();
        errors.push("rating", "Not a valid float value.");
        let html = edit_page(&inception(), "abc", "Great", &errors, "tok");
        assert!(html.contains("Not a valid float value."));
        assert!(html.contains(r#"value="tok""#));
        assert!(html.contains(r#"action="/edit?id=7""#));
    }

    #[test]
    fn search_again_link_is_encoded() {
        let html = select_page("Fast & Furious", &[]);
        assert!(html.contains("/add?title=Fast%20%26%20Furious"));
        assert!(html.contains("No movies matched."));
    }
}
