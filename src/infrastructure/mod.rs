pub mod http_client_factory;
pub mod observability;
pub mod request_issuer;

pub use http_client_factory::HttpClientFactory;
pub use request_issuer::HttpRequestIssuer;
