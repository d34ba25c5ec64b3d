//! Document ingestion from JSON, JSONL or a directory of such files.

use anyhow::{bail, Context, Result};
use search_core::{DocId, DocumentStatus, Rating, SearchServer};
use serde::Deserialize;
use walkdir::WalkDir;

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    pub id: DocId,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

/// Collect `.json`/`.jsonl` files below `input`, or `input` itself when it is a file.
pub fn input_files(input: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        bail!("input path {} does not exist", input.display());
    }
    Ok(files)
}

pub fn read_docs(file: &Path) -> Result<Vec<InputDoc>> {
    if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
        let mut docs = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let doc = serde_json::from_str(&line).with_context(|| format!("{}:{}", file.display(), n + 1))?;
            docs.push(doc);
        }
        return Ok(docs);
    }
    let raw = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;
    let docs = match json {
        serde_json::Value::Array(arr) => {
            arr.into_iter().map(serde_json::from_value).collect::<serde_json::Result<Vec<InputDoc>>>()?
        }
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => bail!("{}: expected a document object or an array of documents", file.display()),
    };
    Ok(docs)
}

/// Load every document under `input` into `server`; returns the number added.
pub fn load(server: &mut SearchServer, input: &Path) -> Result<usize> {
    let mut added = 0;
    for file in input_files(input)? {
        for doc in read_docs(&file)? {
            server
                .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
                .with_context(|| format!("adding document {} from {}", doc.id, file.display()))?;
            added += 1;
        }
    }
    tracing::info!(added, "ingested documents");
    Ok(added)
}
