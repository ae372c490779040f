pub mod exchange_rate;
pub mod util;

pub use exchange_rate::ExchangeRateApiProvider;
