mod filesystem_validator;
mod test_utils;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use test_utils::*;

const TEST_FILES_COUNT: usize = 3;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("e2e_tests=debug,info")
        .init();

    println!("📁 Running file relay E2E tests...");
    run_relay_tests().await?;

    println!("\n✅ All E2E tests passed!");

    Ok(())
}

async fn run_relay_tests() -> Result<()> {
    let server_url =
        std::env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let upload_root = std::env::var("UPLOAD_ROOT")
        .map(PathBuf::from)
        .context("UPLOAD_ROOT must point at the server's upload root")?;
    let auth = UploadAuth {
        secret: std::env::var("RELAY_SECRET").context("RELAY_SECRET must be set")?,
        client_id: std::env::var("RELAY_CLIENT_ID").ok(),
    };

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(Path::parent)
        .context("Unexpected manifest location")?
        .to_path_buf();
    let client_binary = workspace_root.join("target").join("release").join("client");

    let test_data_dir = manifest_dir.join("test_data");
    let test_files_dir = test_data_dir.join("test_files");
    let downloads_dir = test_data_dir.join("downloads");
    std::fs::create_dir_all(&test_files_dir)?;
    std::fs::create_dir_all(&downloads_dir)?;

    println!("Server URL: {}", server_url);
    println!("Upload root: {:?}", upload_root);
    println!("Client binary: {:?}", client_binary);

    wait_for_server(&server_url).await?;

    let files = create_test_files(&test_files_dir, TEST_FILES_COUNT)?;
    let mut uploads: Vec<(PathBuf, String)> = Vec::new();

    let test_result = async {
        println!("\n📤 Testing upload...");
        for file in &files {
            let url = upload_file(&client_binary, file, &server_url, &auth)?;
            let identifier = identifier_from_url(&url)?;
            println!("Uploaded {:?} -> {}", file, url);
            uploads.push((file.clone(), identifier));
        }

        println!("\n🔍 Validating upload root...");
        filesystem_validator::validate_upload(&upload_root, &uploads)?;
        println!("✅ Upload root validation passed");

        println!("\n📥 Testing download...");
        for (file, identifier) in &uploads {
            let url = format!("{}/{}", server_url.trim_end_matches('/'), identifier);
            let output = downloads_dir.join(identifier);
            download_file(&client_binary, &url, &output)?;
            filesystem_validator::validate_downloaded_file(file, &output)?;
        }
        println!("✅ Download validation passed");

        println!("\n⏱️  Testing stale timestamp rejection...");
        let before = filesystem_validator::stored_identifiers(&upload_root)?;
        let (status, body) = upload_with_age(&server_url, &auth, 60).await?;
        if status != reqwest::StatusCode::BAD_REQUEST {
            anyhow::bail!("Stale upload returned {} - {}", status, body);
        }
        let after = filesystem_validator::stored_identifiers(&upload_root)?;
        if before != after {
            anyhow::bail!("Stale upload created a file in the upload root");
        }
        println!("✅ Stale upload rejected: {}", body.trim());

        println!("\n🔍 Testing unknown identifier...");
        let response = reqwest::get(format!("{}/zzzzzzzz", server_url.trim_end_matches('/')))
            .await
            .context("Failed to connect to server")?;
        if response.status() != reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("Unknown identifier returned {}", response.status());
        }
        println!("✅ Unknown identifier returns 404");

        Ok::<(), anyhow::Error>(())
    }
    .await;

    // Always cleanup, even on error
    if let Err(e) = cleanup_test_data(&test_data_dir, &upload_root, &uploads) {
        eprintln!("Warning: Failed to cleanup test data: {}", e);
    }

    test_result
}

fn cleanup_test_data(
    test_data_dir: &Path,
    upload_root: &Path,
    uploads: &[(PathBuf, String)],
) -> Result<()> {
    let keep_data = std::env::var("KEEP_TEST_DATA").unwrap_or_else(|_| "false".to_string());
    if keep_data == "true" {
        println!(
            "\n⚠️  Keeping test data (KEEP_TEST_DATA=true): {:?}",
            test_data_dir
        );
        return Ok(());
    }

    println!("\n🧹 Cleaning up test data: {:?}", test_data_dir);
    if test_data_dir.exists() {
        std::fs::remove_dir_all(test_data_dir).with_context(|| {
            format!("Failed to remove test data directory: {:?}", test_data_dir)
        })?;
    }

    for (_, identifier) in uploads {
        let stored = upload_root.join(identifier);
        if stored.exists() {
            std::fs::remove_file(&stored)
                .with_context(|| format!("Failed to remove stored file: {:?}", stored))?;
        }
    }
    println!("✅ Test data cleaned up");
    Ok(())
}
