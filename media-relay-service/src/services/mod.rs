pub mod fetcher;
pub mod metrics;
pub mod mock;
pub mod providers;
pub mod relay;

pub use fetcher::{FetchError, HttpMediaFetcher, MediaFetcher};
pub use self::metrics::{get_metrics, init_metrics};
pub use providers::{InferenceProvider, ProviderError};
pub use relay::{MediaRelay, RelayError};
