pub mod sign_upload;
