pub mod get;

pub use get::GetPublicationQuery;
