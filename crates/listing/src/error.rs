use mooner_data::DataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("live feed unavailable: {0}")]
    LiveFeed(#[source] DataError),
}
