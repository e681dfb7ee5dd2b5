pub(crate) mod serpapi;

pub(crate) use serpapi::{SerpApiClient, SerpApiConfig, WebSource};
