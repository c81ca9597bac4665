use std::{cmp::Ordering, collections::HashMap};

use tracing::debug;

use crate::{entities::movie, error::AppResult, store::MovieStore};

/// Assigns every movie a distinct rank from its rating and returns them
/// highest rank first. The best-rated movie gets `ranking == len`, the
/// worst gets 1. Unrated movies sort below every rated one, and among equal
/// ratings the movie added earlier ranks higher.
pub fn compute_rankings(mut movies: Vec<movie::Model>) -> Vec<movie::Model> {
    movies.sort_by(|a, b| cmp_rating(a.rating, b.rating).then_with(|| b.id.cmp(&a.id)));
    for (idx, movie) in movies.iter_mut().enumerate() {
        movie.ranking = Some(idx as i32 + 1);
    }
    movies.reverse();
    movies
}

fn cmp_rating(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Recomputes ranks, writes back the ones that moved and returns the
/// collection highest rank first.
pub async fn refresh(store: &MovieStore) -> AppResult<Vec<movie::Model>> {
    let current = store.list_by_rating().await?;
    let previous: HashMap<i32, Option<i32>> = current.iter().map(|m| (m.id, m.ranking)).collect();

    let ranked = compute_rankings(current);
    let changed: Vec<(i32, i32)> = ranked
        .iter()
        .filter_map(|m| {
            let rank = m.ranking?;
            (previous.get(&m.id).copied().flatten() != Some(rank)).then_some((m.id, rank))
        })
        .collect();

    debug!(total = ranked.len(), changed = changed.len(), "recomputed rankings");
    store.set_rankings(&changed).await?;

    store.list_by_ranking().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{sample, store};

    fn movie(id: i32, rating: Option<f64>) -> movie::Model {
        movie::Model {
            id,
            title: format!("Movie {id}"),
            year: 2000,
            description: String::new(),
            rating,
            ranking: None,
            review: None,
            img_url: String::new(),
        }
    }

    fn ranks(movies: &[movie::Model]) -> Vec<(i32, Option<i32>)> {
        movies.iter().map(|m| (m.id, m.ranking)).collect()
    }

    #[test]
    fn highest_rating_gets_highest_rank() {
        let ranked = compute_rankings(vec![
            movie(1, Some(6.1)),
            movie(2, Some(9.3)),
            movie(3, Some(2.0)),
            movie(4, Some(7.7)),
        ]);

        assert_eq!(ranks(&ranked), vec![(2, Some(4)), (4, Some(3)), (1, Some(2)), (3, Some(1))]);
    }

    #[test]
    fn equal_ratings_get_distinct_ranks() {
        let ranked = compute_rankings(vec![
            movie(1, Some(8.0)),
            movie(2, Some(8.0)),
            movie(3, Some(5.0)),
        ]);

        assert_eq!(ranks(&ranked), vec![(1, Some(3)), (2, Some(2)), (3, Some(1))]);

        // Input order does not matter.
        let again = compute_rankings(vec![
            movie(3, Some(5.0)),
            movie(2, Some(8.0)),
            movie(1, Some(8.0)),
        ]);
        assert_eq!(ranks(&again), ranks(&ranked));
    }

    #[test]
    fn unrated_movies_rank_last() {
        let ranked = compute_rankings(vec![movie(1, None), movie(2, Some(0.5)), movie(3, None)]);
        assert_eq!(ranks(&ranked), vec![(2, Some(3)), (1, Some(2)), (3, Some(1))]);
    }

    #[test]
    fn empty_collection() {
        assert!(compute_rankings(Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn refresh_persists_ranks() {
        let store = store().await;
        let low = store.create(sample("Low", 2001)).await.unwrap();
        let high = store.create(sample("High", 2002)).await.unwrap();
        let mid = store.create(sample("Mid", 2003)).await.unwrap();
        store.update_review(low, 3.0, "meh".into()).await.unwrap();
        store.update_review(high, 9.5, "wow".into()).await.unwrap();
        store.update_review(mid, 6.0, "ok".into()).await.unwrap();

        let listed = refresh(&store).await.unwrap();
        assert_eq!(ranks(&listed), vec![(high, Some(3)), (mid, Some(2)), (low, Some(1))]);

        assert_eq!(store.get(high).await.unwrap().ranking, Some(3));
        assert_eq!(store.get(low).await.unwrap().ranking, Some(1));

        // A new rating reshuffles on the next listing.
        store.update_review(low, 10.0, "rewatched".into()).await.unwrap();
        let listed = refresh(&store).await.unwrap();
        assert_eq!(ranks(&listed), vec![(low, Some(3)), (high, Some(2)), (mid, Some(1))]);
    }

    #[tokio::test]
    async fn refresh_with_tied_ratings_is_stable() {
        let store = store().await;
        let first = store.create(sample("First", 2001)).await.unwrap();
        let second = store.create(sample("Second", 2002)).await.unwrap();
        store.update_review(first, 7.0, "same".into()).await.unwrap();
        store.update_review(second, 7.0, "same".into()).await.unwrap();

        let once = ranks(&refresh(&store).await.unwrap());
        let twice = ranks(&refresh(&store).await.unwrap());
        assert_eq!(once, vec![(first, Some(2)), (second, Some(1))]);
        assert_eq!(once, twice);
    }
}
