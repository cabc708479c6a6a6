//! Basic Upload Example
//!
//! This example demonstrates how to:
//! - Create a client from `STORAGE_*` environment variables
//! - Upload a local file with metadata
//! - Share presigned and public links to the stored object
//! - Download and delete it again
//!
//! Usage: `cargo run --example basic_upload -- path/to/file`

use mos_storage::{MosError, StorageClient, UploadOptions};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), MosError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mos_storage=debug")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/sample.txt".to_string());

    println!("Creating client from environment...");
    let client = mos_storage::create_client_from_env()?;
    println!("  Bucket: {}", client.config().bucket);

    let options = UploadOptions::new()
        .with_metadata("source", "basic_upload")
        .with_metadata("uploaded_by", "demo");

    println!("Uploading {}...", path);
    let file = match client.objects().upload_file(&path, options).await {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Upload failed: {}", e);
            if let Some(body) = e.response_body() {
                eprintln!("  Server said: {}", body);
            }
            return Err(e);
        }
    };
    println!("  Stored as: {} ({})", file.name, file.size_formatted);

    let link = client
        .presign()
        .get_object_url(&file.name, Some(Duration::from_secs(15 * 60)))?;
    println!("Presigned download link (15 min): {}", link);
    println!("Public link: {}", client.presign().public_object_url(&file.name)?);

    let object = client.objects().download(&file.name, None).await?;
    println!("Downloaded {} bytes", object.body.len());

    client.objects().delete(&file.name, None).await?;
    println!("Deleted {}", file.name);

    Ok(())
}
