use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use jiff::civil::Date;
use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::models::NewMovie;

const LANGUAGE: &str = "en-US";

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("metadata request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected metadata payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("movie {id} has no usable release date")]
    MissingReleaseDate { id: i32 },
}

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    image_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        image_url: String,
        rps: u32,
    ) -> Self {
        // Warn once on app load if using mock data
        if api_key.trim().is_empty() {
            tracing::warn!("Using mock TMDB data - no TMDB_API_KEY provided");
        }

        let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self { client, api_key, base_url, image_url, limiter }
    }

    /// Base URL that poster paths are appended to.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    fn is_mock(&self) -> bool {
        self.api_key.trim().is_empty()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// GET /search/movie, first page only.
    pub async fn search_movie(&self, query: &str) -> Result<Vec<SearchCandidate>, MetadataError> {
        if self.is_mock() {
            return Ok(mock::search(query));
        }

        self.limiter.until_ready().await;
        debug!(query = %query, "searching TMDB");

        let resp = self
            .client
            .get(self.url("/search/movie"))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", LANGUAGE),
                ("query", query),
                ("page", "1"),
            ])
            .send()
            .await?;

        let page: SearchResponse = handle_response(resp).await?;
        debug!(query = %query, results = page.results.len(), "TMDB search finished");
        Ok(page.results)
    }

    /// GET /movie/{id}
    pub async fn get_movie(&self, tmdb_id: i32) -> Result<MovieDetail, MetadataError> {
        if self.is_mock() {
            return mock::detail(tmdb_id);
        }

        self.limiter.until_ready().await;
        debug!(tmdb_id = tmdb_id, "fetching TMDB movie detail");

        let resp = self
            .client
            .get(self.url(&format!("/movie/{tmdb_id}")))
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .send()
            .await?;

        handle_response(resp).await
    }
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, MetadataError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(MetadataError::Status { status, body });
    }
    Ok(serde_json::from_str(&body)?)
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchCandidate>,
}

/// One row of a TMDB search result page.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchCandidate {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl SearchCandidate {
    pub fn year(&self) -> Option<i16> {
        self.release_date.as_deref().and_then(release_year)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MovieDetail {
    pub id: i32,
    pub original_title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
}

impl MovieDetail {
    pub fn into_new_movie(self, image_url: &str) -> Result<NewMovie, MetadataError> {
        let year = self
            .release_date
            .as_deref()
            .and_then(release_year)
            .ok_or(MetadataError::MissingReleaseDate { id: self.id })?;

        let img_url = match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{}{}", image_url.trim_end_matches('/'), path),
            _ => String::new(),
        };

        Ok(NewMovie {
            title: self.original_title,
            year: i32::from(year),
            description: self.overview,
            img_url,
        })
    }
}

fn release_year(s: &str) -> Option<i16> {
    s.trim().parse::<Date>().ok().map(|d| d.year())
}

mod mock {
    use reqwest::StatusCode;

    use super::{MetadataError, MovieDetail, SearchCandidate};

    struct Sample {
        id: i32,
        title: &'static str,
        release_date: &'static str,
        overview: &'static str,
        poster_path: &'static str,
    }

    const SAMPLES: &[Sample] = &[
        Sample {
            id: 27205,
            title: "Inception",
            release_date: "2010-07-15",
            overview: "Cobb, a skilled thief who commits corporate espionage by infiltrating \
                       the subconscious of his targets, is offered a chance to regain his old life.",
            poster_path: "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
        },
        Sample {
            id: 550,
            title: "Fight Club",
            release_date: "1999-10-15",
            overview: "A ticking-time-bomb insomniac and a slippery soap salesman channel \
                       primal male aggression into a shocking new form of therapy.",
            poster_path: "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
        },
        Sample {
            id: 4553,
            title: "Phone Booth",
            release_date: "2002-11-14",
            overview: "Publicist Stuart Shepard finds himself trapped in a phone booth, \
                       pinned down by an extortionist's sniper rifle.",
            poster_path: "/tjrX2oWRCM3Tvarz38zlZM7Uc10.jpg",
        },
    ];

    pub(super) fn search(query: &str) -> Vec<SearchCandidate> {
        let needle = query.trim().to_lowercase();
        SAMPLES
            .iter()
            .filter(|s| s.title.to_lowercase().contains(&needle))
            .map(|s| SearchCandidate {
                id: s.id,
                title: s.title.to_string(),
                original_title: s.title.to_string(),
                release_date: Some(s.release_date.to_string()),
                overview: s.overview.to_string(),
                poster_path: Some(s.poster_path.to_string()),
            })
            .collect()
    }

    pub(super) fn detail(id: i32) -> Result<MovieDetail, MetadataError> {
        let Some(s) = SAMPLES.iter().find(|s| s.id == id) else {
            return Err(MetadataError::Status {
                status: StatusCode::NOT_FOUND,
                body: format!("mock TMDB has no movie {id}"),
            });
        };
        Ok(MovieDetail {
            id: s.id,
            original_title: s.title.to_string(),
            poster_path: Some(s.poster_path.to_string()),
            release_date: Some(s.release_date.to_string()),
            overview: s.overview.to_string(),
        })
    }
}
