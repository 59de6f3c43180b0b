pub mod caching;
pub mod freecurrency;
pub mod ipregistry;
pub mod util;

pub use caching::CachingRateProvider;
pub use freecurrency::FreeCurrencyProvider;
pub use ipregistry::CountryLocator;
