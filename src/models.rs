use serde::Deserialize;

/// Fields known when a movie is first imported; rating and review come later.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub img_url: String,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i32,
}
