pub mod contact_sheet;
pub mod discovery;
pub mod extractor;
pub mod peeker;
pub mod timing;
