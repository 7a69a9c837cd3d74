pub mod s3_upload_signer;
