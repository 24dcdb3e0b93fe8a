use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Check the upload root holds a byte-identical copy of every uploaded file
pub fn validate_upload(upload_root: &Path, uploads: &[(PathBuf, String)]) -> Result<()> {
    if !upload_root.is_dir() {
        anyhow::bail!("Upload root does not exist: {:?}", upload_root);
    }

    for (source, identifier) in uploads {
        let stored_path = upload_root.join(identifier);
        let stored = fs::read(&stored_path)
            .with_context(|| format!("Stored file missing: {:?}", stored_path))?;
        let original =
            fs::read(source).with_context(|| format!("Failed to read file: {:?}", source))?;

        if stored != original {
            anyhow::bail!(
                "Stored file {:?} differs from {:?} ({} vs {} bytes)",
                stored_path,
                source,
                stored.len(),
                original.len()
            );
        }

        let temp_path = upload_root.join(format!(".{}.part", identifier));
        if temp_path.exists() {
            anyhow::bail!("Temp file left behind: {:?}", temp_path);
        }
    }

    println!(
        "  ✓ All {} files stored under their identifiers",
        uploads.len()
    );
    Ok(())
}

/// Check a downloaded copy matches the original
pub fn validate_downloaded_file(original: &Path, downloaded: &Path) -> Result<()> {
    let expected =
        fs::read(original).with_context(|| format!("Failed to read file: {:?}", original))?;
    let actual = fs::read(downloaded)
        .with_context(|| format!("Downloaded file missing: {:?}", downloaded))?;

    if expected != actual {
        anyhow::bail!(
            "Downloaded file {:?} differs from {:?}",
            downloaded,
            original
        );
    }

    println!("  ✓ {:?} matches the original", downloaded);
    Ok(())
}

/// Names of regular files in the upload root
pub fn stored_identifiers(upload_root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(upload_root)
        .with_context(|| format!("Failed to read upload root: {:?}", upload_root))?
    {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    Ok(names)
}
