/**
 * Upload Module
 *
 * Multipart image uploads (avatars and chat images) and the local object
 * bucket they land in.
 */

pub mod bucket;
pub mod handlers;

pub use bucket::UploadBucket;
